use crate::types::Article;

/// One fixed-size slice of a sorted record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// The page actually served, after clamping. 1-indexed.
    pub page: usize,
    pub total_pages: usize,
}

/// Slices `records` into fixed-size pages. Stateless and pure: there is no
/// cursor, and the same inputs always produce the same output.
///
/// `page_number` is 1-indexed and clamps to `[1, total_pages]`. An empty
/// input still reports page 1 of 1 with an empty slice.
pub fn page(records: &[Article], page_size: usize, page_number: usize) -> (&[Article], PageInfo) {
    let page_size = page_size.max(1);
    let total_pages = std::cmp::max(1, records.len().div_ceil(page_size));
    let page = page_number.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = std::cmp::min(start + page_size, records.len());
    let slice = if start >= records.len() {
        &records[0..0]
    } else {
        &records[start..end]
    };

    (slice, PageInfo { page, total_pages })
}
