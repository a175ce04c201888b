//! Contact types: the sole entity of the address book.
//!
//! A contact has no generated identifier visible to callers; `name` is the
//! de-facto lookup key, although nothing enforces its uniqueness.

use serde::{Deserialize, Serialize};

use crate::phone::{Phone, PhoneInput};

// ─── Stored record ───────────────────────────────────────────────────────────

/// A stored contact document. Field names match the persisted index schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  #[serde(default)]
  pub name:     String,
  #[serde(default)]
  pub lastname: String,
  /// Canonical digit string; see [`crate::phone`].
  #[serde(default, deserialize_with = "crate::phone::deserialize_lenient")]
  pub phone:    String,
  #[serde(default)]
  pub address:  String,
  #[serde(default)]
  pub email:    String,
}

impl Contact {
  /// The one-line listing form: `"<name> <lastname> <phone>"`.
  pub fn summary(&self) -> String {
    format!("{} {} {}", self.name, self.lastname, self.phone)
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Wire form of a new contact. Every field is optional; `phone` may be a
/// JSON number or a JSON string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
  pub name:     Option<String>,
  pub lastname: Option<String>,
  pub phone:    Option<PhoneInput>,
  pub address:  Option<String>,
  pub email:    Option<String>,
}

impl ContactInput {
  /// Build the record to store once the phone number has been validated.
  pub fn into_contact(self, phone: Phone) -> Contact {
    Contact {
      name:     self.name.unwrap_or_default(),
      lastname: self.lastname.unwrap_or_default(),
      phone:    phone.into_string(),
      address:  self.address.unwrap_or_default(),
      email:    self.email.unwrap_or_default(),
    }
  }
}
