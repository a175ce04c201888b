//! Index definition for the contacts index.
//!
//! Field names and types must stay exactly as they are: existing indices were
//! created with this mapping.

use serde_json::{Value, json};

/// The five contact fields, all analysed `text`.
pub const FIELDS: [&str; 5] = ["name", "lastname", "phone", "address", "email"];

/// Request body for index creation.
pub fn index_body() -> Value {
  let properties: serde_json::Map<String, Value> = FIELDS
    .iter()
    .map(|f| ((*f).to_owned(), json!({ "type": "text" })))
    .collect();

  json!({
    "mappings": {
      "properties": properties
    }
  })
}
