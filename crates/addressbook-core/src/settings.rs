//! Process-wide defaults and the limits derived from them.
//!
//! Values are read once at startup (see the server's `ServerConfig`) and are
//! immutable afterwards; handlers receive them through shared state.

use serde::Deserialize;

/// Default HTTP port for the API server.
pub const DEFAULT_PORT: u16 = 8000;
/// Default hostname of the search engine.
pub const DEFAULT_SEARCH_HOST: &str = "localhost";
/// Default port of the search engine.
pub const DEFAULT_SEARCH_PORT: u16 = 9200;
/// Name of the contacts index. Must be lowercase for Elasticsearch.
pub const DEFAULT_INDEX_NAME: &str = "addressbooknewindex";

pub const DEFAULT_MIN_PHONE_DIGITS: usize = 7;
pub const DEFAULT_MAX_PHONE_DIGITS: usize = 12;

pub const DEFAULT_START_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_LOOKUP_LIMIT: usize = 100;

/// Elasticsearch's default `index.max_result_window`; `from + size` may not
/// exceed it.
pub const MAX_RESULT_WINDOW: usize = 10_000;

// ─── Phone ───────────────────────────────────────────────────────────────────

/// Inclusive digit-count bounds for a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PhoneRules {
  pub min_digits: usize,
  pub max_digits: usize,
}

impl Default for PhoneRules {
  fn default() -> Self {
    Self {
      min_digits: DEFAULT_MIN_PHONE_DIGITS,
      max_digits: DEFAULT_MAX_PHONE_DIGITS,
    }
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
  pub default_page:      usize,
  pub default_page_size: usize,
  /// Larger requested page sizes are clamped to this.
  pub max_page_size:     usize,
  /// Maximum number of matches returned by a by-name lookup.
  pub lookup_limit:      usize,
}

impl Default for Pagination {
  fn default() -> Self {
    Self {
      default_page:      DEFAULT_START_PAGE,
      default_page_size: DEFAULT_PAGE_SIZE,
      max_page_size:     DEFAULT_MAX_PAGE_SIZE,
      lookup_limit:      DEFAULT_LOOKUP_LIMIT,
    }
  }
}

// ─── Limits ──────────────────────────────────────────────────────────────────

/// Everything the request handlers need to know about configured limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
  pub phone:      PhoneRules,
  pub pagination: Pagination,
}
