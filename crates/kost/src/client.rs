//! HTTP client for the nutrition service
//!
//! The search pipeline only sees the [`FoodSearch`] trait so it can be driven
//! by scripted backends in tests.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::config::Config;
use crate::error::SearchError;
use crate::model::{ProcessInputItem, Product, RowId};
use crate::results::SearchKind;

/// Lookup seam used by the search orchestrator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FoodSearch: Send + Sync {
  /// Search for products matching `query` on behalf of row `frontend_id`
  async fn search(
    &self,
    kind: SearchKind,
    query: String,
    frontend_id: RowId,
  ) -> Result<Vec<Product>, SearchError>;
}

pub struct FoodClient {
  client: Client,
  base_url: String,
  timeout_ms: u64,
}

impl FoodClient {
  pub fn new(config: &Config) -> Result<Self, SearchError> {
    let client = Client::builder()
      .timeout(config.request_timeout())
      .build()
      .map_err(|e| SearchError::transport(e.to_string()))?;

    Ok(Self {
      client,
      base_url: config.base_url.clone(),
      timeout_ms: config.request_timeout_ms,
    })
  }

  fn search_url(&self, kind: SearchKind) -> String {
    format!("{}/food/search/{}", self.base_url, kind.endpoint())
  }

  async fn products(&self, response: Response) -> Result<Vec<Product>, SearchError> {
    let status = response.status();
    if !status.is_success() {
      return Err(SearchError::status(status.as_u16()));
    }

    let body = response.text().await.map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;
    serde_json::from_str(&body).map_err(|e| SearchError::decode(e.to_string()))
  }

  /// Resolve free-text names to products in one round trip
  pub async fn process_input(
    &self,
    items: &[ProcessInputItem],
  ) -> Result<Vec<Product>, SearchError> {
    let url = format!("{}/food/processinput", self.base_url);
    let response = self
      .client
      .post(&url)
      .json(items)
      .send()
      .await
      .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;

    self.products(response).await
  }

  /// Issue one lookup with a caller-chosen deadline
  pub async fn search_with_timeout(
    &self,
    kind: SearchKind,
    query: &str,
    frontend_id: RowId,
    timeout: Duration,
  ) -> Result<Vec<Product>, SearchError> {
    let frontend_id = frontend_id.to_string();
    let response = self
      .client
      .get(self.search_url(kind))
      .query(&[("query", query), ("frontendid", frontend_id.as_str())])
      .timeout(timeout)
      .send()
      .await
      .map_err(|e| SearchError::from_reqwest(e, timeout.as_millis() as u64))?;

    self.products(response).await
  }
}

#[async_trait]
impl FoodSearch for FoodClient {
  async fn search(
    &self,
    kind: SearchKind,
    query: String,
    frontend_id: RowId,
  ) -> Result<Vec<Product>, SearchError> {
    self
      .search_with_timeout(kind, &query, frontend_id, Duration::from_millis(self.timeout_ms))
      .await
  }
}
