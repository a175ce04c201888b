//! Request bodies and response parsing for the Elasticsearch query DSL.
//!
//! Kept free of any client calls so the shapes can be tested without a
//! cluster.

use addressbook_core::{contact::Contact, store::ContactQuery};
use serde_json::{Value, json};

use crate::{Error, Result};

/// Painless script for the rename; the new name is a parameter, never part
/// of the source.
const RENAME_SCRIPT: &str = "ctx._source.name = params.newname";

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Free-text query over every field, or `match_all` when there is no text.
pub fn text_query(text: Option<&str>) -> Value {
  match text {
    Some(q) => json!({ "query_string": { "query": q } }),
    None => json!({ "match_all": {} }),
  }
}

/// Documents whose `name` contains every analysed term of `name`.
pub fn name_query(name: &str) -> Value {
  json!({
    "match": {
      "name": { "query": name, "operator": "and" }
    }
  })
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

pub fn search_body(query: &ContactQuery) -> Value {
  json!({
    "query": text_query(query.text.as_deref()),
    "from":  query.offset,
    "size":  query.limit,
  })
}

pub fn count_body(name: &str) -> Value { json!({ "query": name_query(name) }) }

pub fn rename_body(name: &str, new_name: &str) -> Value {
  json!({
    "query": name_query(name),
    "script": {
      "source": RENAME_SCRIPT,
      "lang":   "painless",
      "params": { "newname": new_name }
    }
  })
}

pub fn delete_body(name: &str) -> Value { json!({ "query": name_query(name) }) }

// ─── Responses ───────────────────────────────────────────────────────────────

/// Pull the `_source` of every hit out of a search response.
pub fn parse_hits(body: &Value) -> Result<Vec<Contact>> {
  let hits = body
    .get("hits")
    .and_then(|h| h.get("hits"))
    .and_then(Value::as_array)
    .ok_or_else(|| Error::Response("search response has no hits.hits".into()))?;

  hits
    .iter()
    .filter_map(|hit| hit.get("_source"))
    .map(|source| Ok(serde_json::from_value(source.clone())?))
    .collect()
}

/// Read a numeric counter such as `count`, `updated` or `deleted`.
pub fn parse_counter(body: &Value, field: &str) -> Result<u64> {
  body
    .get(field)
    .and_then(Value::as_u64)
    .ok_or_else(|| Error::Response(format!("response has no numeric {field:?}")))
}

/// `*_by_query` responses list per-document failures even on HTTP 200.
pub fn check_bulk_failures(body: &Value) -> Result<()> {
  match body.get("failures").and_then(Value::as_array) {
    Some(failures) if !failures.is_empty() => {
      let conflicts = body
        .get("version_conflicts")
        .and_then(Value::as_u64)
        .unwrap_or(0);
      if conflicts > 0 {
        Err(Error::Conflict(format!("{conflicts} version conflict(s)")))
      } else {
        Err(Error::Response(format!(
          "{} document(s) failed: {}",
          failures.len(),
          Value::Array(failures.clone())
        )))
      }
    }
    _ => Ok(()),
  }
}

/// Elasticsearch reports a missing index as a 404 with this error type.
pub fn is_index_not_found(status: u16, body: &str) -> bool {
  status == 404 && body.contains("index_not_found_exception")
}

/// Error types the engine uses when it cannot parse a search query.
const QUERY_PARSE_ERRORS: [&str; 3] = [
  "search_phase_execution_exception",
  "query_shard_exception",
  "parse_exception",
];

/// The top-level `error.type` of an error response, if the body has one.
pub fn error_type(body: &str) -> Option<String> {
  let value: Value = serde_json::from_str(body).ok()?;
  value
    .get("error")
    .and_then(|e| e.get("type"))
    .and_then(Value::as_str)
    .map(str::to_owned)
}

pub fn is_query_parse_error(body: &str) -> bool {
  error_type(body).is_some_and(|t| QUERY_PARSE_ERRORS.contains(&t.as_str()))
}

/// Concurrent index creation loses with this error type.
pub fn is_already_exists(body: &str) -> bool {
  body.contains("resource_already_exists_exception")
}
