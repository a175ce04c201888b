//! Router-level tests against the in-memory store.

use addressbook_core::{
  contact::Contact,
  memory::MemoryStore,
  settings::{DEFAULT_INDEX_NAME, Limits},
  store::{ContactQuery, ContactStore, FailureKind, IndexStatus, StoreFailure},
};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiConfig, AppState, api_router};

fn config() -> ApiConfig {
  ApiConfig {
    index:  DEFAULT_INDEX_NAME.to_string(),
    limits: Limits::default(),
  }
}

fn make_state() -> AppState<MemoryStore> { AppState::new(MemoryStore::new(), config()) }

async fn send<S>(
  state: AppState<S>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value)
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, json)
}

fn user10() -> Value {
  json!({
    "name": "user10",
    "lastname": "last10",
    "address": "street",
    "email": "user@domain.com",
    "phone": 12324333334u64
  })
}

fn with_phone(phone: Value) -> Value {
  let mut body = user10();
  body["name"] = json!("user123");
  body["phone"] = phone;
  body
}

// ── Index bootstrap ──────────────────────────────────────────────────────────

#[tokio::test]
async fn root_creates_then_loads_index() {
  let state = make_state();

  let (status, body) = send(state.clone(), "GET", "/", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "success");
  let msg = body["message"].as_str().unwrap();
  assert!(msg.contains("created index addressbooknewindex"), "{msg}");

  let (status, body) = send(state, "GET", "/", None).await;
  assert_eq!(status, StatusCode::OK);
  let msg = body["message"].as_str().unwrap();
  assert!(msg.contains("loaded index addressbooknewindex"), "{msg}");
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_valid_contact_returns_200_and_is_retrievable() {
  let state = make_state();
  let (status, body) = send(state.clone(), "POST", "/contact", Some(user10())).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Contact user10 created successfully.");

  let (status, body) = send(state, "GET", "/contact/user10", None).await;
  assert_eq!(status, StatusCode::OK);
  let data = body["data"].as_array().unwrap();
  assert_eq!(data.len(), 1);
  assert_eq!(
    data[0],
    json!({
      "name": "user10",
      "lastname": "last10",
      "phone": "12324333334",
      "address": "street",
      "email": "user@domain.com"
    })
  );
}

#[tokio::test]
async fn create_accepts_trailing_slash_and_string_phone() {
  let state = make_state();
  let body = with_phone(json!("5551234"));
  let (status, _) = send(state.clone(), "POST", "/contact/", Some(body)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(state.store.len().await, 1);
}

#[tokio::test]
async fn create_allows_duplicates() {
  let state = make_state();
  for _ in 0..2 {
    let (status, _) = send(state.clone(), "POST", "/contact", Some(user10())).await;
    assert_eq!(status, StatusCode::OK);
  }
  let (_, body) = send(state, "GET", "/contact/user10", None).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_accepts_form_bodies() {
  let state = make_state();
  let req = Request::builder()
    .method("POST")
    .uri("/contact")
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from("name=formuser&lastname=x&phone=1234567"))
    .unwrap();
  let resp = api_router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);

  let found = state
    .store
    .search(&ContactQuery::lookup("formuser", 10))
    .await
    .unwrap();
  assert_eq!(found[0].phone, "1234567");
}

#[tokio::test]
async fn create_rejects_alphabetic_phone() {
  let state = make_state();
  let (status, body) =
    send(state.clone(), "POST", "/contact", Some(with_phone(json!("ABC12324333334")))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["status"], "error");
  assert_eq!(body["message"], "Phone number must be positive and numeric.");
  assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn create_rejects_too_long_phone() {
  let state = make_state();
  let (status, body) =
    send(state.clone(), "POST", "/contact", Some(with_phone(json!("92233720368547758")))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().contains("12 digits"));
  assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn create_rejects_too_short_phone() {
  let state = make_state();
  let (status, _) =
    send(state.clone(), "POST", "/contact", Some(with_phone(json!(123456)))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn create_rejects_negative_phone() {
  let state = make_state();
  for phone in [json!("-1234"), json!(-12345678)] {
    let (status, _) =
      send(state.clone(), "POST", "/contact", Some(with_phone(phone))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
  assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn create_without_phone_is_rejected() {
  let state = make_state();
  let (status, _) =
    send(state.clone(), "POST", "/contact", Some(json!({ "name": "nophone" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn create_with_malformed_body_is_400_envelope() {
  let state = make_state();
  let (status, body) =
    send(state, "POST", "/contact", Some(json!({ "phone": true }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["status"], "error");
}

// ── Get by name ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_unknown_name_returns_200_with_message() {
  let state = make_state();
  let (status, body) = send(state, "GET", "/contact/nobody", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "No contacts found with the name: nobody");
  assert!(body.get("data").is_none());
}

#[tokio::test]
async fn get_matches_other_fields_too() {
  let state = make_state();
  send(state.clone(), "POST", "/contact", Some(user10())).await;
  let (_, body) = send(state, "GET", "/contact/last10", None).await;
  assert_eq!(body["data"][0]["name"], "user10");
}

#[tokio::test]
async fn get_with_malformed_query_is_400() {
  let state = make_state();
  send(state.clone(), "GET", "/", None).await;
  let (status, body) = send(state, "GET", "/contact/user(", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["status"], "error");
}

// ── List ─────────────────────────────────────────────────────────────────────

async fn seed(state: &AppState<MemoryStore>, n: usize) {
  for i in 0..n {
    state
      .store
      .insert(Contact {
        name:     format!("user{i}"),
        lastname: format!("last{i}"),
        phone:    "1234567".into(),
        address:  "street".into(),
        email:    "u@example.com".into(),
      })
      .await
      .unwrap();
  }
}

#[tokio::test]
async fn list_defaults_to_ten_summaries() {
  let state = make_state();
  seed(&state, 15).await;
  let (status, body) = send(state, "GET", "/contact", None).await;
  assert_eq!(status, StatusCode::OK);
  let data = body["data"].as_array().unwrap();
  assert_eq!(data.len(), 10);
  assert_eq!(data[0], "user0 last0 1234567");
}

#[tokio::test]
async fn list_paginates() {
  let state = make_state();
  seed(&state, 15).await;
  let (_, body) = send(state.clone(), "GET", "/contact?page=1&pageSize=10", None).await;
  assert!(body["data"].as_array().unwrap().len() <= 10);

  let (_, body) = send(state, "GET", "/contact/?page=2&pageSize=10", None).await;
  let data = body["data"].as_array().unwrap();
  assert_eq!(data.len(), 5);
  assert_eq!(data[0], "user10 last10 1234567");
}

#[tokio::test]
async fn list_with_garbage_params_uses_defaults() {
  let state = make_state();
  seed(&state, 12).await;
  let (status, body) = send(state, "GET", "/contact?page=abc&pageSize=0", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn list_filters_by_query() {
  let state = make_state();
  seed(&state, 5).await;
  let (_, body) = send(state, "GET", "/contact?query=user3", None).await;
  assert_eq!(body["data"], json!(["user3 last3 1234567"]));
}

#[tokio::test]
async fn list_past_result_window_is_400() {
  let state = make_state();
  let (status, body) =
    send(state, "GET", "/contact?page=1000&pageSize=100", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["status"], "error");
}

// ── Update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_nonexistent_returns_404() {
  let state = make_state();
  seed(&state, 1).await;
  let (status, body) = send(
    state.clone(),
    "PUT",
    "/contact/invalidUser",
    Some(json!({ "name": "invalidUser", "newname": "newusername" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "invalidUser does not exist.");
  assert_eq!(state.store.count_named("newusername").await.unwrap(), 0);
}

#[tokio::test]
async fn update_nonexistent_without_newname_returns_404() {
  let state = make_state();
  let (status, body) =
    send(state.clone(), "PUT", "/contact/ghost", Some(json!({}))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "ghost does not exist.");
}

#[tokio::test]
async fn update_without_newname_is_400() {
  let state = make_state();
  send(state.clone(), "POST", "/contact", Some(user10())).await;
  let (status, _) =
    send(state.clone(), "PUT", "/contact/user10", Some(json!({ "name": "user10" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(state.store.count_named("user10").await.unwrap(), 1);
}

#[tokio::test]
async fn update_renames_every_match() {
  let state = make_state();
  send(state.clone(), "POST", "/contact", Some(user10())).await;
  send(state.clone(), "POST", "/contact", Some(user10())).await;

  let (status, body) =
    send(state.clone(), "PUT", "/contact/user10", Some(json!({ "newname": "user18" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "user10 updated successfully.");

  let (_, body) = send(state.clone(), "GET", "/contact/user18", None).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 2);
  let (_, body) = send(state, "GET", "/contact/user10", None).await;
  assert_eq!(body["message"], "No contacts found with the name: user10");
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_nonexistent_returns_404() {
  let state = make_state();
  seed(&state, 2).await;
  let (status, _) = send(state.clone(), "DELETE", "/contact/invalidUser", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(state.store.len().await, 2);
}

#[tokio::test]
async fn delete_removes_every_match() {
  let state = make_state();
  send(state.clone(), "POST", "/contact", Some(user10())).await;
  send(state.clone(), "POST", "/contact", Some(user10())).await;
  seed(&state, 1).await;

  let (status, body) = send(state.clone(), "DELETE", "/contact/user10", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "user10 deleted successfully.");
  assert_eq!(state.store.len().await, 1);

  let (_, body) = send(state, "GET", "/contact/user10", None).await;
  assert_eq!(body["message"], "No contacts found with the name: user10");
}

// ── End-to-end scenario ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_get_rename_delete_scenario() {
  let state = make_state();

  let (status, _) = send(state.clone(), "GET", "/", None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(state.clone(), "POST", "/contact/", Some(user10())).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(state.clone(), "GET", "/contact/user10", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(
    body["data"]
      .as_array()
      .unwrap()
      .iter()
      .any(|c| c["name"] == "user10")
  );

  let (status, _) =
    send(state.clone(), "PUT", "/contact/user10", Some(json!({ "newname": "user18" }))).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(state.clone(), "GET", "/contact/user10", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "No contacts found with the name: user10");

  let (status, _) = send(state.clone(), "DELETE", "/contact/user18", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(state.store.is_empty().await);
}

// ── Store failures ───────────────────────────────────────────────────────────

/// A store whose every call fails with the configured kind.
#[derive(Clone)]
struct FailingStore {
  kind: FailureKind,
}

#[derive(Debug, thiserror::Error)]
#[error("engine exploded: secret internals")]
struct Boom(FailureKind);

impl StoreFailure for Boom {
  fn kind(&self) -> FailureKind { self.0 }
}

impl ContactStore for FailingStore {
  type Error = Boom;

  async fn ensure_index(&self) -> Result<IndexStatus, Boom> { Err(Boom(self.kind)) }

  async fn search(&self, _query: &ContactQuery) -> Result<Vec<Contact>, Boom> {
    Err(Boom(self.kind))
  }

  async fn insert(&self, _contact: Contact) -> Result<(), Boom> { Err(Boom(self.kind)) }

  async fn count_named(&self, _name: &str) -> Result<u64, Boom> { Ok(1) }

  async fn rename_all(&self, _name: &str, _new_name: &str) -> Result<u64, Boom> {
    Err(Boom(self.kind))
  }

  async fn delete_all(&self, _name: &str) -> Result<u64, Boom> { Err(Boom(self.kind)) }
}

fn failing(kind: FailureKind) -> AppState<FailingStore> {
  AppState::new(FailingStore { kind }, config())
}

#[tokio::test]
async fn index_creation_failure_is_500() {
  let (status, body) = send(failing(FailureKind::Internal), "GET", "/", None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  let msg = body["message"].as_str().unwrap();
  assert!(msg.contains("Please try again later"), "{msg}");
  assert!(!msg.contains("secret internals"), "{msg}");
}

#[tokio::test]
async fn insert_failure_is_500() {
  let (status, body) =
    send(failing(FailureKind::Internal), "POST", "/contact", Some(user10())).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["message"].as_str().unwrap().contains("Failed to create contact: user10"));
}

#[tokio::test]
async fn list_failure_is_structured_500() {
  let (status, body) = send(failing(FailureKind::Internal), "GET", "/contact", None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn mutation_failures_are_500() {
  let body = Some(json!({ "newname": "x" }));
  let (status, _) = send(failing(FailureKind::Internal), "PUT", "/contact/a", body).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  let (status, _) = send(failing(FailureKind::Internal), "DELETE", "/contact/a", None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn conflicts_are_409() {
  let (status, _) = send(failing(FailureKind::Conflict), "DELETE", "/contact/a", None).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unavailable_engine_is_503() {
  let (status, _) = send(failing(FailureKind::Unavailable), "GET", "/contact/a", None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
