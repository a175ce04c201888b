//! Phone-number validation.
//!
//! The canonical representation is a string of ASCII digits. Inputs arrive
//! either as JSON numbers or JSON strings; both are rendered to text first and
//! then validated with the same rules, so the digit count is always the length
//! of that text.

use serde::{Deserialize, Deserializer};

use crate::{Error, Result, settings::PhoneRules};

/// Value substituted when a request carries no phone number. It is still
/// validated, so a missing phone is rejected by the length check.
pub const MISSING_PHONE: &str = "0";

/// A phone number as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PhoneInput {
  Number(serde_json::Number),
  Text(String),
}

impl PhoneInput {
  /// Render to text without any normalisation.
  pub fn canonical(&self) -> String {
    match self {
      Self::Number(n) => n.to_string(),
      Self::Text(s) => s.clone(),
    }
  }
}

/// A validated phone number: only ASCII digits, length within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }
}

/// Validate `input` against `rules`.
///
/// Checks run in order and the first failure wins:
/// 1. a missing or empty value becomes [`MISSING_PHONE`];
/// 2. every character must be an ASCII digit, which also rejects negatives
///    and fractions;
/// 3. the digit count must lie in `rules.min_digits..=rules.max_digits`.
pub fn validate(input: Option<&PhoneInput>, rules: &PhoneRules) -> Result<Phone> {
  let raw = input.map(PhoneInput::canonical).unwrap_or_default();
  let raw = if raw.is_empty() { MISSING_PHONE.to_owned() } else { raw };

  if !raw.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::PhoneNotNumeric);
  }

  let digits = raw.len();
  if digits < rules.min_digits || digits > rules.max_digits {
    return Err(Error::PhoneLength {
      min: rules.min_digits,
      max: rules.max_digits,
    });
  }

  Ok(Phone(raw))
}

/// Read a stored phone field that may be a number, a string, or null.
pub(crate) fn deserialize_lenient<'de, D>(
  deserializer: D,
) -> std::result::Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let input = Option::<PhoneInput>::deserialize(deserializer)?;
  Ok(input.as_ref().map(PhoneInput::canonical).unwrap_or_default())
}
