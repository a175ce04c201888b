//! [`EsStore`], the Elasticsearch implementation of [`ContactStore`].

use std::time::Duration;

use addressbook_core::{
  contact::Contact,
  settings::{DEFAULT_INDEX_NAME, DEFAULT_SEARCH_HOST, DEFAULT_SEARCH_PORT},
  store::{ContactQuery, ContactStore, IndexStatus},
};
use elasticsearch::{
  CountParts, DeleteByQueryParts, Elasticsearch, IndexParts, SearchParts,
  UpdateByQueryParts,
  http::{
    Url,
    response::Response,
    transport::{SingleNodeConnectionPool, TransportBuilder},
  },
  indices::{IndicesCreateParts, IndicesExistsParts},
  params::Refresh,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, Result, query, schema};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for [`EsStore`].
#[derive(Debug, Clone)]
pub struct EsConfig {
  /// Base URL of the single node, e.g. `http://localhost:9200`.
  pub url:              String,
  pub index:            String,
  /// Upper bound on every engine call; a slower answer becomes an error.
  pub request_timeout:  Duration,
  /// Make writes visible to search before acknowledging them.
  pub refresh_on_write: bool,
}

impl EsConfig {
  pub fn for_host(scheme: &str, host: &str, port: u16) -> Self {
    Self {
      url: format!("{scheme}://{host}:{port}"),
      ..Self::default()
    }
  }
}

impl Default for EsConfig {
  fn default() -> Self {
    Self {
      url:              format!("http://{DEFAULT_SEARCH_HOST}:{DEFAULT_SEARCH_PORT}"),
      index:            DEFAULT_INDEX_NAME.to_owned(),
      request_timeout:  Duration::from_secs(30),
      refresh_on_write: true,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by one Elasticsearch index.
///
/// Cloning is cheap; the inner transport is reference-counted.
#[derive(Debug, Clone)]
pub struct EsStore {
  client: Elasticsearch,
  config: EsConfig,
}

impl EsStore {
  /// Build the client. No request is sent until the first operation.
  pub fn new(config: EsConfig) -> Result<Self> {
    let url = config.url.parse::<Url>().map_err(|e| Error::InvalidUrl {
      url:     config.url.clone(),
      message: e.to_string(),
    })?;

    let transport = TransportBuilder::new(SingleNodeConnectionPool::new(url))
      .timeout(config.request_timeout)
      .build()?;

    tracing::debug!(url = %config.url, index = %config.index, "elasticsearch client ready");
    Ok(Self {
      client: Elasticsearch::new(transport),
      config,
    })
  }

  pub fn config(&self) -> &EsConfig { &self.config }

  fn index(&self) -> &str { &self.config.index }
}

/// Status code and body text of an unsuccessful response.
async fn status_and_body(response: Response) -> (u16, String) {
  let status = response.status_code().as_u16();
  let body = response.text().await.unwrap_or_default();
  (status, body)
}

impl ContactStore for EsStore {
  type Error = Error;

  async fn ensure_index(&self) -> Result<IndexStatus> {
    let index = self.index();

    let exists = self
      .client
      .indices()
      .exists(IndicesExistsParts::Index(&[index]))
      .send()
      .await?;

    if exists.status_code().is_success() {
      tracing::debug!(index, "index already exists");
      return Ok(IndexStatus::Existing);
    }
    if exists.status_code().as_u16() != 404 {
      let (status, body) = status_and_body(exists).await;
      return Err(Error::from_status(status, body));
    }

    let response = self
      .client
      .indices()
      .create(IndicesCreateParts::Index(index))
      .body(schema::index_body())
      .send()
      .await?;

    if !response.status_code().is_success() {
      let (status, body) = status_and_body(response).await;
      // Lost a creation race with a concurrent bootstrap.
      if query::is_already_exists(&body) {
        return Ok(IndexStatus::Existing);
      }
      return Err(Error::from_status(status, body));
    }

    tracing::info!(index, "created contacts index");
    Ok(IndexStatus::Created)
  }

  async fn search(&self, request: &ContactQuery) -> Result<Vec<Contact>> {
    let index = self.index();
    let response = self
      .client
      .search(SearchParts::Index(&[index]))
      .body(query::search_body(request))
      .send()
      .await?;

    if !response.status_code().is_success() {
      let (status, body) = status_and_body(response).await;
      if query::is_index_not_found(status, &body) {
        tracing::debug!(index, "search against missing index");
        return Ok(Vec::new());
      }
      return Err(Error::from_search_status(status, body));
    }

    let body: Value = response.json().await?;
    query::parse_hits(&body)
  }

  async fn insert(&self, contact: Contact) -> Result<()> {
    let index = self.index();
    let id = Uuid::new_v4().to_string();
    let refresh = if self.config.refresh_on_write {
      Refresh::True
    } else {
      Refresh::False
    };

    let response = self
      .client
      .index(IndexParts::IndexId(index, &id))
      .refresh(refresh)
      .body(&contact)
      .send()
      .await?;

    if !response.status_code().is_success() {
      let (status, body) = status_and_body(response).await;
      return Err(Error::from_status(status, body));
    }

    tracing::debug!(index, id = %id, name = %contact.name, "indexed contact");
    Ok(())
  }

  async fn count_named(&self, name: &str) -> Result<u64> {
    let index = self.index();
    let response = self
      .client
      .count(CountParts::Index(&[index]))
      .body(query::count_body(name))
      .send()
      .await?;

    if !response.status_code().is_success() {
      let (status, body) = status_and_body(response).await;
      if query::is_index_not_found(status, &body) {
        return Ok(0);
      }
      return Err(Error::from_status(status, body));
    }

    let body: Value = response.json().await?;
    query::parse_counter(&body, "count")
  }

  async fn rename_all(&self, name: &str, new_name: &str) -> Result<u64> {
    let index = self.index();
    let response = self
      .client
      .update_by_query(UpdateByQueryParts::Index(&[index]))
      .refresh(self.config.refresh_on_write)
      .body(query::rename_body(name, new_name))
      .send()
      .await?;

    if !response.status_code().is_success() {
      let (status, body) = status_and_body(response).await;
      return Err(Error::from_status(status, body));
    }

    let body: Value = response.json().await?;
    query::check_bulk_failures(&body)?;
    let updated = query::parse_counter(&body, "updated")?;
    tracing::debug!(index, name, new_name, updated, "update by query");
    Ok(updated)
  }

  async fn delete_all(&self, name: &str) -> Result<u64> {
    let index = self.index();
    let response = self
      .client
      .delete_by_query(DeleteByQueryParts::Index(&[index]))
      .refresh(self.config.refresh_on_write)
      .body(query::delete_body(name))
      .send()
      .await?;

    if !response.status_code().is_success() {
      let (status, body) = status_and_body(response).await;
      return Err(Error::from_status(status, body));
    }

    let body: Value = response.json().await?;
    query::check_bulk_failures(&body)?;
    let deleted = query::parse_counter(&body, "deleted")?;
    tracing::debug!(index, name, deleted, "delete by query");
    Ok(deleted)
  }
}
