//! Handlers for `/contact` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contact` | Optional `page`, `pageSize`, `query`; returns summary strings |
//! | `GET`    | `/contact/{name}` | Free-text lookup; 200 even when nothing matches |
//! | `POST`   | `/contact` | Body: [`ContactInput`]; phone is validated first |
//! | `PUT`    | `/contact/{name}` | Body: `{"newname":"..."}`; renames every match |
//! | `DELETE` | `/contact/{name}` | Deletes every match |
//!
//! Update and delete count matches before mutating. The two steps are not
//! atomic: a match that disappears in between shows up as zero affected
//! documents and is answered with 404, and a document changed in between
//! makes the engine report a version conflict (409).

use addressbook_core::{
  contact::{Contact, ContactInput},
  page::PageWindow,
  phone,
  store::{ContactQuery, ContactStore},
};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::{AppState, envelope::Envelope, error::ApiError, payload::Payload};

// ─── Get by name ──────────────────────────────────────────────────────────────

/// `GET /contact/{name}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Envelope<Vec<Contact>>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let query = ContactQuery::lookup(&name, state.config.limits.pagination.lookup_limit);
  let contacts = state
    .store
    .search(&query)
    .await
    .map_err(ApiError::store(format!("Failed to look up {name}")))?;

  if contacts.is_empty() {
    return Ok(Envelope::success(format!(
      "No contacts found with the name: {name}"
    )));
  }
  Ok(Envelope::with_data(
    format!("Found {} contact(s) matching {name}", contacts.len()),
    contacts,
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// Kept as raw strings so that unparsable values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:      Option<String>,
  #[serde(rename = "pageSize")]
  pub page_size: Option<String>,
  /// Free-text query; absent means every contact.
  pub query:     Option<String>,
}

/// `GET /contact[?page=<n>][&pageSize=<n>][&query=<text>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Envelope<Vec<String>>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let window = PageWindow::resolve(
    params.page.as_deref(),
    params.page_size.as_deref(),
    &state.config.limits.pagination,
  )?;

  let query = ContactQuery {
    text:   params.query.filter(|q| !q.trim().is_empty()),
    offset: window.offset,
    limit:  window.limit,
  };
  let contacts = state
    .store
    .search(&query)
    .await
    .map_err(ApiError::store("Failed to list contacts"))?;

  let summaries: Vec<String> = contacts.iter().map(Contact::summary).collect();
  Ok(Envelope::with_data(
    format!("Page {} with {} contact(s)", window.page, summaries.len()),
    summaries,
  ))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contact`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Payload(input): Payload<ContactInput>,
) -> Result<Envelope<()>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let phone = phone::validate(input.phone.as_ref(), &state.config.limits.phone)?;
  let contact = input.into_contact(phone);
  let name = contact.name.clone();

  state
    .store
    .insert(contact)
    .await
    .map_err(ApiError::store(format!(
      "Something went wrong. Failed to create contact: {name}"
    )))?;

  tracing::info!(name = %name, "contact created");
  Ok(Envelope::success(format!("Contact {name} created successfully.")))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub newname: Option<String>,
}

/// `PUT /contact/{name}` with body `{"newname":"..."}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
  Payload(body): Payload<RenameBody>,
) -> Result<Envelope<()>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let context = format!("Something went wrong. Failed to update {name}");
  ensure_exists(&state, &name, &context).await?;

  let new_name = body
    .newname
    .filter(|n| !n.trim().is_empty())
    .ok_or(addressbook_core::Error::EmptyName)?;

  let updated = state
    .store
    .rename_all(&name, &new_name)
    .await
    .map_err(ApiError::store(context))?;
  if updated == 0 {
    return Err(does_not_exist(&name));
  }

  tracing::info!(name = %name, new_name = %new_name, updated, "contact renamed");
  Ok(Envelope::success(format!("{name} updated successfully.")))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contact/{name}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Envelope<()>, ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let context = format!("Something went wrong. Failed to delete {name}");
  ensure_exists(&state, &name, &context).await?;

  let deleted = state
    .store
    .delete_all(&name)
    .await
    .map_err(ApiError::store(context))?;
  if deleted == 0 {
    return Err(does_not_exist(&name));
  }

  tracing::info!(name = %name, deleted, "contact deleted");
  Ok(Envelope::success(format!("{name} deleted successfully.")))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn ensure_exists<S>(
  state: &AppState<S>,
  name: &str,
  context: &str,
) -> Result<(), ApiError>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let matches = state
    .store
    .count_named(name)
    .await
    .map_err(ApiError::store(context))?;
  if matches == 0 {
    return Err(does_not_exist(name));
  }
  Ok(())
}

fn does_not_exist(name: &str) -> ApiError {
  ApiError::NotFound(format!("{name} does not exist."))
}
