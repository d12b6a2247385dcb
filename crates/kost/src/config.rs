//! Configuration for the nutrition service client and search pipeline
//!
//! Every field has a default, so an empty JSON object is a valid config file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const BASE_URL_ENV: &str = "KOST_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Root of the nutrition service, without a trailing slash
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Quiet period before a typed query is searched
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms: u64,
  /// Deadline for each individual lookup
  #[serde(default = "default_request_timeout_ms")]
  pub request_timeout_ms: u64,
  #[serde(default = "default_page_size")]
  pub page_size: usize,
  /// Send one throwaway search when a session starts
  #[serde(default = "default_warm_up")]
  pub warm_up: bool,
}

fn default_base_url() -> String {
  "http://127.0.0.1:8080".to_string()
}
fn default_debounce_ms() -> u64 {
  270
}
fn default_request_timeout_ms() -> u64 {
  1500
}
fn default_page_size() -> usize {
  crate::pagination::PAGE_SIZE
}
fn default_warm_up() -> bool {
  true
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      debounce_ms: default_debounce_ms(),
      request_timeout_ms: default_request_timeout_ms(),
      page_size: default_page_size(),
      warm_up: default_warm_up(),
    }
  }
}

impl Config {
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    config.validated()
  }

  /// Config file if given, defaults otherwise, then the base URL override
  pub fn load(path: Option<&Path>, base_url: Option<&str>) -> Result<Self, ConfigError> {
    let mut config = match path {
      Some(path) => Self::load_from_file(path)?,
      None => Config::default(),
    };

    if let Some(url) = base_url {
      config.base_url = url.to_string();
    }

    config.validated()
  }

  fn validated(mut self) -> Result<Self, ConfigError> {
    Url::parse(&self.base_url)
      .map_err(|e| ConfigError::invalid_base_url(&self.base_url, e.to_string()))?;
    while self.base_url.ends_with('/') {
      self.base_url.pop();
    }
    Ok(self)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }
}
