//! Tagged search results and per-kind failure flags

use std::fmt;

use crate::model::{Product, RowId};

/// Number of leading basic results checked when filtering similarity results
pub const DEDUP_WINDOW: usize = 8;

/// The two lookups issued for every settled query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
  /// Exact/lexical matching
  Basic,
  /// Similarity matching
  Embeddings,
}

impl SearchKind {
  pub const ALL: [SearchKind; 2] = [SearchKind::Basic, SearchKind::Embeddings];

  /// Path segment of the search endpoint
  pub fn endpoint(&self) -> &'static str {
    match self {
      SearchKind::Basic => "basic",
      SearchKind::Embeddings => "embeddings",
    }
  }
}

impl fmt::Display for SearchKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.endpoint())
  }
}

/// Products tagged with the row they were fetched for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResultSet {
  pub products: Vec<Product>,
  /// `None` when empty or reset after a failure
  pub id: Option<RowId>,
}

impl SearchResultSet {
  pub fn new(id: RowId, products: Vec<Product>) -> Self {
    Self { products, id: Some(id) }
  }

  pub fn empty() -> Self {
    Self::default()
  }

  /// Whether these results belong to `active`
  pub fn is_for(&self, active: Option<RowId>) -> bool {
    matches!((self.id, active), (Some(tag), Some(row)) if tag == row)
  }
}

/// Independent failure flags per lookup kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureState {
  pub basic: bool,
  pub embeddings: bool,
}

impl FailureState {
  pub fn get(&self, kind: SearchKind) -> bool {
    match kind {
      SearchKind::Basic => self.basic,
      SearchKind::Embeddings => self.embeddings,
    }
  }

  pub fn set(&mut self, kind: SearchKind, failed: bool) {
    match kind {
      SearchKind::Basic => self.basic = failed,
      SearchKind::Embeddings => self.embeddings = failed,
    }
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  pub fn any(&self) -> bool {
    self.basic || self.embeddings
  }
}

/// Drop similarity results already listed among the first basic results
///
/// Names compare case-insensitively. `basic` is whatever set is stored when
/// the similarity response is processed, which may come from an older query.
pub fn dedup_against(basic: &SearchResultSet, embeddings: Vec<Product>) -> Vec<Product> {
  let seen = &basic.products[..basic.products.len().min(DEDUP_WINDOW)];

  embeddings
    .into_iter()
    .filter(|product| !seen.iter().any(|listed| listed.same_name(&product.name)))
    .collect()
}
