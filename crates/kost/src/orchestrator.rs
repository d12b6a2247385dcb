//! Search orchestrator
//!
//! Turns typing in the active row into at most one pair of lookups per settled
//! query and keeps only the results that still belong to the active row.
//!
//! - Every change to the active row's query restarts the debounce.
//! - When the debounce fires, the query is searched only if the same row is
//!   still active with exactly the same text.
//! - Basic and embeddings lookups run as independent tasks with their own
//!   deadline. Whichever finishes last for a kind wins the stored slot.
//! - Stored results carry the row id they were fetched for; readers treat a
//!   mismatch with the active row as still loading.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::client::FoodSearch;
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::{RowError, SearchError};
use crate::model::{Product, RowId};
use crate::pagination::Pager;
use crate::results::{dedup_against, FailureState, SearchKind, SearchResultSet};
use crate::rows::{InputRow, RowList};

/// Query sent once per session to wake the service up
pub const WARM_UP_QUERY: &str = "a";

/// Shown for a lookup kind whose last attempt failed
pub const FAILURE_MESSAGE: &str =
  "server may be under heavy load or something requires human attention";

/// A query that survived the debounce, consumed by dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledQuery {
  pub row: RowId,
  pub query: String,
}

/// What a result panel should show right now
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
  /// No row is active
  Hidden,
  /// The last lookup of this kind failed
  Failed,
  /// Nothing stored for the active row yet
  Loading,
  Ready(PanelPage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelPage {
  pub row: RowId,
  pub products: Vec<Product>,
  pub page: usize,
  pub total: usize,
  pub has_previous: bool,
  pub has_next: bool,
}

struct SearchState {
  rows: RowList,
  basic: SearchResultSet,
  embeddings: SearchResultSet,
  failed: FailureState,
  basic_pager: Pager,
  embeddings_pager: Pager,
  debouncer: Debouncer,
}

impl SearchState {
  fn result(&self, kind: SearchKind) -> &SearchResultSet {
    match kind {
      SearchKind::Basic => &self.basic,
      SearchKind::Embeddings => &self.embeddings,
    }
  }

  fn pager_mut(&mut self, kind: SearchKind) -> &mut Pager {
    match kind {
      SearchKind::Basic => &mut self.basic_pager,
      SearchKind::Embeddings => &mut self.embeddings_pager,
    }
  }

  fn pager(&self, kind: SearchKind) -> &Pager {
    match kind {
      SearchKind::Basic => &self.basic_pager,
      SearchKind::Embeddings => &self.embeddings_pager,
    }
  }

  /// Replace the stored set for `kind`, rewinding its pager if anything changed
  fn store(&mut self, kind: SearchKind, set: SearchResultSet) {
    if self.result(kind) != &set {
      self.pager_mut(kind).reset();
    }
    match kind {
      SearchKind::Basic => self.basic = set,
      SearchKind::Embeddings => self.embeddings = set,
    }
  }

  fn apply(&mut self, kind: SearchKind, row: RowId, outcome: Result<Vec<Product>, SearchError>) {
    match outcome {
      Ok(products) => {
        let products = match kind {
          SearchKind::Basic => products,
          SearchKind::Embeddings => dedup_against(&self.basic, products),
        };
        debug!(%kind, row, count = products.len(), "stored search results");
        self.store(kind, SearchResultSet::new(row, products));
      }
      Err(e) => {
        warn!(%kind, row, error = %e, "search lookup failed");
        self.store(kind, SearchResultSet::empty());
        self.failed.set(kind, true);
      }
    }
  }

  fn shows_results(&self, kind: SearchKind) -> bool {
    !self.failed.get(kind) && self.result(kind).is_for(self.rows.active_id())
  }

  fn panel(&self, kind: SearchKind) -> Panel {
    let Some(active) = self.rows.active_id() else {
      return Panel::Hidden;
    };
    if self.failed.get(kind) {
      return Panel::Failed;
    }

    let set = self.result(kind);
    if !set.is_for(Some(active)) {
      return Panel::Loading;
    }

    let pager = self.pager(kind);
    let total = set.products.len();
    Panel::Ready(PanelPage {
      row: active,
      products: pager.slice(&set.products).to_vec(),
      page: pager.page(),
      total,
      has_previous: pager.start() > 0,
      has_next: pager.start() + pager.page_size() < total,
    })
  }
}

/// Everything a lookup task needs besides the state itself
struct Pipeline {
  backend: Arc<dyn FoodSearch>,
  request_timeout: Duration,
  updates: watch::Sender<u64>,
}

impl Pipeline {
  fn notify(&self) {
    self.updates.send_modify(|revision| *revision += 1);
  }
}

#[derive(Clone)]
pub struct SearchOrchestrator {
  state: Arc<Mutex<SearchState>>,
  pipeline: Arc<Pipeline>,
}

impl SearchOrchestrator {
  pub fn new(backend: Arc<dyn FoodSearch>, config: &Config) -> Self {
    let state = SearchState {
      rows: RowList::new(),
      basic: SearchResultSet::empty(),
      embeddings: SearchResultSet::empty(),
      failed: FailureState::default(),
      basic_pager: Pager::new(config.page_size),
      embeddings_pager: Pager::new(config.page_size),
      debouncer: Debouncer::new(config.debounce()),
    };
    let (updates, _) = watch::channel(0);

    Self {
      state: Arc::new(Mutex::new(state)),
      pipeline: Arc::new(Pipeline { backend, request_timeout: config.request_timeout(), updates }),
    }
  }

  /// Revision counter bumped whenever a lookup result is stored
  pub fn subscribe(&self) -> watch::Receiver<u64> {
    self.pipeline.updates.subscribe()
  }

  /// One throwaway basic search so the service is warm before the user types
  pub fn warm_up(&self) {
    let backend = self.pipeline.backend.clone();
    tokio::spawn(async move {
      match backend.search(SearchKind::Basic, WARM_UP_QUERY.to_string(), 0).await {
        Ok(_) => debug!("warm-up search answered"),
        Err(e) => debug!("warm-up search failed: {e}"),
      }
    });
  }

  pub async fn set_active_row(&self, id: RowId) -> Result<(), RowError> {
    let mut state = self.state.lock().await;
    let changed = state.rows.active_id() != Some(id);
    state.rows.activate(id)?;
    state.failed.clear();
    if changed {
      self.arm(&mut state);
    }
    Ok(())
  }

  /// Typing into a row also focuses it
  pub async fn update_query(&self, id: RowId, text: &str) -> Result<(), RowError> {
    let mut state = self.state.lock().await;
    let row = state.rows.get(id).ok_or_else(|| RowError::not_found(id))?;
    let unchanged = row.active && row.query == text;
    let switching = state.rows.active_id() != Some(id);

    state.rows.set_query(id, text)?;
    state.rows.activate(id)?;
    if switching {
      state.failed.clear();
    }
    if !unchanged {
      self.arm(&mut state);
    }
    Ok(())
  }

  pub async fn hide_active(&self) {
    let mut state = self.state.lock().await;
    state.rows.deactivate_all();
    state.failed.clear();
    state.debouncer.cancel();
  }

  /// Commit `product` to the row it was searched for and close the panel
  pub async fn select_product(&self, product: Product) -> Result<(), RowError> {
    let mut state = self.state.lock().await;
    let row = product.frontend_id;
    state.rows.decide(product)?;
    state.rows.deactivate_all();
    state.debouncer.cancel();
    info!(row, "product selected");
    Ok(())
  }

  pub async fn add_row(&self) -> RowId {
    self.state.lock().await.rows.add()
  }

  pub async fn remove_row(&self, id: RowId) -> Result<InputRow, RowError> {
    let mut state = self.state.lock().await;
    let removed = state.rows.remove(id)?;
    if removed.active {
      state.failed.clear();
      state.debouncer.cancel();
    }
    Ok(removed)
  }

  pub async fn set_weight(&self, id: RowId, text: &str) -> Result<u32, RowError> {
    self.state.lock().await.rows.set_weight(id, text)
  }

  pub async fn toggle_custom_weight(&self, id: RowId) -> Result<bool, RowError> {
    self.state.lock().await.rows.toggle_custom_weight(id)
  }

  pub async fn rows(&self) -> Vec<InputRow> {
    self.state.lock().await.rows.rows().to_vec()
  }

  pub async fn active_row(&self) -> Option<RowId> {
    self.state.lock().await.rows.active_id()
  }

  /// Decided products in row order
  pub async fn decisions(&self) -> Vec<Product> {
    let state = self.state.lock().await;
    state.rows.decisions().into_iter().map(|(_, product)| product.clone()).collect()
  }

  pub async fn failures(&self) -> FailureState {
    self.state.lock().await.failed
  }

  /// Raw stored set for `kind`, whichever row it belongs to
  pub async fn result_set(&self, kind: SearchKind) -> SearchResultSet {
    self.state.lock().await.result(kind).clone()
  }

  pub async fn panel(&self, kind: SearchKind) -> Panel {
    self.state.lock().await.panel(kind)
  }

  /// Pages only while the panel shows results for the active row
  pub async fn next_page(&self, kind: SearchKind) -> bool {
    let mut state = self.state.lock().await;
    if !state.shows_results(kind) {
      return false;
    }
    let len = state.result(kind).products.len();
    state.pager_mut(kind).next(len)
  }

  pub async fn previous_page(&self, kind: SearchKind) -> bool {
    let mut state = self.state.lock().await;
    state.shows_results(kind) && state.pager_mut(kind).previous()
  }

  /// Whether a typed query is still waiting out the debounce
  pub async fn is_debouncing(&self) -> bool {
    self.state.lock().await.debouncer.is_pending()
  }

  /// Restart the debounce for the active row's current query
  fn arm(&self, state: &mut SearchState) {
    let trigger = match state.rows.active() {
      Some(row) if !row.query.trim().is_empty() => {
        SettledQuery { row: row.id, query: row.query.clone() }
      }
      _ => {
        state.debouncer.cancel();
        return;
      }
    };

    let weak = Arc::downgrade(&self.state);
    let pipeline = self.pipeline.clone();
    state.debouncer.schedule(settle(weak, pipeline, trigger));
  }
}

/// Debounce expiry: dispatch only if the trigger still describes the active row
async fn settle(state: Weak<Mutex<SearchState>>, pipeline: Arc<Pipeline>, trigger: SettledQuery) {
  let Some(state) = state.upgrade() else {
    return;
  };
  let mut guard = state.lock().await;

  let current = guard
    .rows
    .active()
    .is_some_and(|row| row.id == trigger.row && row.query == trigger.query);
  if !current {
    debug!(row = trigger.row, "debounced query abandoned");
    return;
  }

  debug!(row = trigger.row, query = %trigger.query, "query settled");
  for kind in SearchKind::ALL {
    guard.failed.set(kind, false);
    tokio::spawn(lookup(Arc::downgrade(&state), pipeline.clone(), kind, trigger.clone()));
  }
}

async fn lookup(
  state: Weak<Mutex<SearchState>>,
  pipeline: Arc<Pipeline>,
  kind: SearchKind,
  settled: SettledQuery,
) {
  let request = pipeline.backend.search(kind, settled.query, settled.row);
  let outcome = match timeout(pipeline.request_timeout, request).await {
    Ok(result) => result,
    Err(_) => Err(SearchError::timeout(pipeline.request_timeout.as_millis() as u64)),
  };

  let Some(state) = state.upgrade() else {
    return;
  };
  state.lock().await.apply(kind, settled.row, outcome);
  pipeline.notify();
}
