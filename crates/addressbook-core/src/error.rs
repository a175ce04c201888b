//! Error types for `addressbook-core`.
//!
//! Every variant here is a caller mistake; none of them ever reaches a store.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
  #[error("Phone number must be positive and numeric.")]
  PhoneNotNumeric,

  #[error(
    "invalid phone number : must not be greater than {max} digits or lesser \
     than {min}"
  )]
  PhoneLength { min: usize, max: usize },

  #[error("new name must not be empty")]
  EmptyName,

  #[error(
    "requested page exceeds the result window: offset {offset} + page size \
     {limit} > {window}"
  )]
  PageOutOfWindow {
    offset: usize,
    limit:  usize,
    window: usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
