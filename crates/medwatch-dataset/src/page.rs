//! Fixed-size pagination over a filtered record sequence.

use medwatch_contracts::error::{MedwatchError, MedwatchResult};

/// One page of a paginated sequence.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The rows on this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    /// Total page count for the filtered sequence.
    pub total_pages: usize,
}

/// Slice `filtered` into its `page`-th fixed-size page (1-based).
///
/// `total_pages = ceil(len / page_size)`. Page numbers outside
/// `[1, total_pages]` are rejected — there is no navigation past the
/// edges, and an empty sequence has no valid page at all.
pub fn paginate<T: Clone>(
    filtered: &[T],
    page_size: usize,
    page: usize,
) -> MedwatchResult<Page<T>> {
    if page_size == 0 {
        return Err(MedwatchError::Config {
            reason: "page size must be nonzero".to_string(),
        });
    }

    let total_pages = filtered.len().div_ceil(page_size);
    if page < 1 || page > total_pages {
        return Err(MedwatchError::PageOutOfRange { page, total_pages });
    }

    let start = (page - 1) * page_size;
    let end = usize::min(start + page_size, filtered.len());
    Ok(Page {
        items: filtered[start..end].to_vec(),
        page,
        total_pages,
    })
}
