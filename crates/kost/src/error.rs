use thiserror::Error;

use crate::model::RowId;

/// Why a lookup against the nutrition service did not produce products
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
  #[error("Search request failed with HTTP {code}")]
  Status { code: u16 },

  #[error("Search request timed out after {after_ms} ms")]
  Timeout { after_ms: u64 },

  #[error("Search request could not be sent: {message}")]
  Transport { message: String },

  #[error("Search response could not be decoded: {message}")]
  Decode { message: String },
}

impl SearchError {
  pub fn status(code: u16) -> Self {
    Self::Status { code }
  }

  pub fn timeout(after_ms: u64) -> Self {
    Self::Timeout { after_ms }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport { message: message.into() }
  }

  pub fn decode(message: impl Into<String>) -> Self {
    Self::Decode { message: message.into() }
  }

  /// Classify a reqwest failure for a request bounded by `timeout_ms`
  pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
    if err.is_timeout() {
      Self::timeout(timeout_ms)
    } else if err.is_decode() {
      Self::decode(err.to_string())
    } else if let Some(status) = err.status() {
      Self::status(status.as_u16())
    } else {
      Self::transport(err.to_string())
    }
  }
}

/// Row bookkeeping failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
  #[error("No row with id {id}")]
  NotFound { id: RowId },

  #[error("The last remaining row cannot be removed")]
  LastRow,

  #[error("Weight must contain digits only, got '{input}'")]
  DigitsOnly { input: String },

  #[error("Weight '{input}' is too large")]
  WeightTooLarge { input: String },
}

impl RowError {
  pub fn not_found(id: RowId) -> Self {
    Self::NotFound { id }
  }

  pub fn digits_only(input: impl Into<String>) -> Self {
    Self::DigitsOnly { input: input.into() }
  }

  pub fn weight_too_large(input: impl Into<String>) -> Self {
    Self::WeightTooLarge { input: input.into() }
  }
}

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to parse config file: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("Invalid base URL '{url}': {message}")]
  InvalidBaseUrl { url: String, message: String },
}

impl ConfigError {
  pub fn invalid_base_url(url: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidBaseUrl { url: url.into(), message: message.into() }
  }
}
