//! Offset pagination for contact listings.

use crate::{
  Error, Result,
  settings::{MAX_RESULT_WINDOW, Pagination},
};

/// A resolved page: 1-based page number plus the derived offset and limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
  pub page:   usize,
  pub offset: usize,
  pub limit:  usize,
}

impl PageWindow {
  /// Resolve raw query-string values into a window.
  ///
  /// Missing, non-numeric and zero values fall back to the configured
  /// defaults. The page size is clamped to `max_page_size`, and a window
  /// reaching past [`MAX_RESULT_WINDOW`] is rejected.
  pub fn resolve(
    page: Option<&str>,
    page_size: Option<&str>,
    pagination: &Pagination,
  ) -> Result<Self> {
    let page = page.and_then(parse_positive).unwrap_or(pagination.default_page);
    let limit = page_size
      .and_then(parse_positive)
      .unwrap_or(pagination.default_page_size)
      .min(pagination.max_page_size);

    let out_of_window = |offset| Error::PageOutOfWindow {
      offset,
      limit,
      window: MAX_RESULT_WINDOW,
    };

    let offset = page
      .saturating_sub(1)
      .checked_mul(limit)
      .ok_or_else(|| out_of_window(usize::MAX))?;
    if offset.saturating_add(limit) > MAX_RESULT_WINDOW {
      return Err(out_of_window(offset));
    }

    Ok(Self { page, offset, limit })
  }
}

fn parse_positive(raw: &str) -> Option<usize> {
  raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
