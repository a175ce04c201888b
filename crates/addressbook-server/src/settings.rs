//! Process configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the optional TOML
//! file, `ADDRESSBOOK_*` environment variables, and finally the legacy
//! `PORT`, `ESHOST` and `ESPORT` variables.

use std::{path::Path, time::Duration};

use addressbook_api::ApiConfig;
use addressbook_core::settings::{
  DEFAULT_INDEX_NAME, DEFAULT_LOOKUP_LIMIT, DEFAULT_MAX_PAGE_SIZE,
  DEFAULT_MAX_PHONE_DIGITS, DEFAULT_MIN_PHONE_DIGITS, DEFAULT_PAGE_SIZE,
  DEFAULT_PORT, DEFAULT_SEARCH_HOST, DEFAULT_SEARCH_PORT, DEFAULT_START_PAGE,
  Limits, Pagination, PhoneRules,
};
use addressbook_store_es::EsConfig;
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use serde::Deserialize;

/// Which [`ContactStore`](addressbook_core::store::ContactStore) to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  Elasticsearch,
  /// Self-contained, non-persistent; handy for demos and smoke tests.
  Memory,
}

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub backend:            Backend,
  pub es_scheme:          String,
  pub es_host:            String,
  pub es_port:            u16,
  pub index:              String,
  pub request_timeout_ms: u64,
  pub refresh_on_write:   bool,
  /// Ensure the index exists before accepting requests.
  pub bootstrap_index:    bool,
  pub default_page:       usize,
  pub default_page_size:  usize,
  pub max_page_size:      usize,
  pub lookup_limit:       usize,
  pub min_phone_digits:   usize,
  pub max_phone_digits:   usize,
}

impl ServerConfig {
  /// Reject values that deserialise fine but would make the API useless.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let invalid = |message: String| Err(ConfigError::Message(message));
    if self.default_page == 0 {
      return invalid("default_page must be at least 1".into());
    }
    if self.default_page_size == 0 {
      return invalid("default_page_size must be at least 1".into());
    }
    if self.max_page_size == 0 {
      return invalid("max_page_size must be at least 1".into());
    }
    if self.lookup_limit == 0 {
      return invalid("lookup_limit must be at least 1".into());
    }
    if self.min_phone_digits > self.max_phone_digits {
      return invalid(format!(
        "min_phone_digits ({}) exceeds max_phone_digits ({})",
        self.min_phone_digits, self.max_phone_digits
      ));
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn limits(&self) -> Limits {
    Limits {
      phone:      PhoneRules {
        min_digits: self.min_phone_digits,
        max_digits: self.max_phone_digits,
      },
      pagination: Pagination {
        default_page:      self.default_page,
        default_page_size: self.default_page_size,
        max_page_size:     self.max_page_size,
        lookup_limit:      self.lookup_limit,
      },
    }
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      index:  self.index.clone(),
      limits: self.limits(),
    }
  }

  pub fn es_config(&self) -> EsConfig {
    EsConfig {
      index: self.index.clone(),
      request_timeout: Duration::from_millis(self.request_timeout_ms),
      refresh_on_write: self.refresh_on_write,
      ..EsConfig::for_host(&self.es_scheme, &self.es_host, self.es_port)
    }
  }
}

/// A builder holding only the built-in defaults.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", i64::from(DEFAULT_PORT))?
    .set_default("backend", "elasticsearch")?
    .set_default("es_scheme", "http")?
    .set_default("es_host", DEFAULT_SEARCH_HOST)?
    .set_default("es_port", i64::from(DEFAULT_SEARCH_PORT))?
    .set_default("index", DEFAULT_INDEX_NAME)?
    .set_default("request_timeout_ms", 30_000_i64)?
    .set_default("refresh_on_write", true)?
    .set_default("bootstrap_index", true)?
    .set_default("default_page", DEFAULT_START_PAGE as i64)?
    .set_default("default_page_size", DEFAULT_PAGE_SIZE as i64)?
    .set_default("max_page_size", DEFAULT_MAX_PAGE_SIZE as i64)?
    .set_default("lookup_limit", DEFAULT_LOOKUP_LIMIT as i64)?
    .set_default("min_phone_digits", DEFAULT_MIN_PHONE_DIGITS as i64)?
    .set_default("max_phone_digits", DEFAULT_MAX_PHONE_DIGITS as i64)
}

/// Apply the unprefixed variables older deployments set.
pub fn legacy_overrides(
  builder: ConfigBuilder<DefaultState>,
  lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  builder
    .set_override_option("port", lookup("PORT"))?
    .set_override_option("es_host", lookup("ESHOST"))?
    .set_override_option("es_port", lookup("ESPORT"))
}

/// Load configuration from every source.
pub fn load(path: &Path) -> Result<ServerConfig, ConfigError> {
  let builder = defaults()?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("ADDRESSBOOK").try_parsing(true));
  let builder = legacy_overrides(builder, |key| std::env::var(key).ok())?;
  let cfg: ServerConfig = builder.build()?.try_deserialize()?;
  cfg.validate()?;
  Ok(cfg)
}
