use async_trait::async_trait;
use kost::{
  Config, FoodSearch, Panel, Product, RowId, SearchError, SearchKind, SearchOrchestrator,
  SearchResultSet,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Scripted nutrition service: per (kind, query) a delay and an outcome
#[derive(Default)]
struct ScriptedBackend {
  responses: Mutex<HashMap<(SearchKind, String), (u64, Result<Vec<String>, u16>)>>,
  calls: Mutex<Vec<(SearchKind, String, RowId)>>,
}

impl ScriptedBackend {
  fn respond(&self, kind: SearchKind, query: &str, delay_ms: u64, names: &[&str]) {
    let names = names.iter().map(|n| n.to_string()).collect();
    self.responses.lock().unwrap().insert((kind, query.to_string()), (delay_ms, Ok(names)));
  }

  fn fail(&self, kind: SearchKind, query: &str, delay_ms: u64, status: u16) {
    self.responses.lock().unwrap().insert((kind, query.to_string()), (delay_ms, Err(status)));
  }

  fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }
}

#[async_trait]
impl FoodSearch for ScriptedBackend {
  async fn search(
    &self,
    kind: SearchKind,
    query: String,
    frontend_id: RowId,
  ) -> Result<Vec<Product>, SearchError> {
    self.calls.lock().unwrap().push((kind, query.clone(), frontend_id));
    let scripted = self.responses.lock().unwrap().get(&(kind, query.clone())).cloned();
    let (delay_ms, outcome) = scripted.unwrap_or((0, Ok(Vec::new())));

    sleep(Duration::from_millis(delay_ms)).await;
    match outcome {
      Ok(names) => Ok(names.into_iter().map(|name| Product::new(frontend_id, name)).collect()),
      Err(code) => Err(SearchError::status(code)),
    }
  }
}

fn setup() -> (Arc<ScriptedBackend>, SearchOrchestrator) {
  let backend = Arc::new(ScriptedBackend::default());
  let search = SearchOrchestrator::new(backend.clone(), &Config::default());
  (backend, search)
}

fn names(panel: &Panel) -> Vec<String> {
  match panel {
    Panel::Ready(page) => page.products.iter().map(|p| p.name.clone()).collect(),
    other => panic!("Expected ready panel, got: {other:?}"),
  }
}

const TOMATO_BASIC: [&str; 8] = [
  "Tomato Soup",
  "Tomato Paste",
  "Tomato Ketchup",
  "Tomato Juice",
  "Tomato Puree",
  "Tomato Sauce",
  "Tomato Salad",
  "Tomato Raw",
];

#[tokio::test(start_paused = true)]
async fn test_late_response_for_abandoned_row_is_not_shown() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "lax", 500, &["Lax, rå"]);
  backend.respond(SearchKind::Embeddings, "lax", 500, &["Öring"]);

  search.update_query(0, "lax").await.unwrap();
  sleep(Duration::from_millis(300)).await;
  assert_eq!(backend.call_count(), 2);

  search.set_active_row(1).await.unwrap();
  sleep(Duration::from_millis(600)).await;

  // Stored, but tagged for row 0
  assert_eq!(search.result_set(SearchKind::Basic).await.id, Some(0));
  assert_eq!(search.panel(SearchKind::Basic).await, Panel::Loading);
  assert_eq!(search.panel(SearchKind::Embeddings).await, Panel::Loading);

  search.set_active_row(0).await.unwrap();
  assert_eq!(names(&search.panel(SearchKind::Basic).await), vec!["Lax, rå"]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_marks_basic_failed_until_next_dispatch() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "tomat", 2000, &["Tomat"]);
  backend.respond(SearchKind::Embeddings, "tomat", 100, &["Paprika"]);

  search.update_query(0, "tomat").await.unwrap();
  sleep(Duration::from_millis(1800)).await;

  let failures = search.failures().await;
  assert!(failures.basic);
  assert!(!failures.embeddings);
  assert_eq!(search.result_set(SearchKind::Basic).await, SearchResultSet::empty());
  assert_eq!(search.panel(SearchKind::Basic).await, Panel::Failed);
  assert_eq!(names(&search.panel(SearchKind::Embeddings).await), vec!["Paprika"]);

  backend.respond(SearchKind::Basic, "tomater", 500, &["Tomater, konserv"]);
  search.update_query(0, "tomater").await.unwrap();
  sleep(Duration::from_millis(300)).await;

  // Dispatched but not answered yet
  assert!(!search.failures().await.basic);
  assert_eq!(search.panel(SearchKind::Basic).await, Panel::Loading);

  sleep(Duration::from_millis(600)).await;
  assert_eq!(names(&search.panel(SearchKind::Basic).await), vec!["Tomater, konserv"]);
}

#[tokio::test(start_paused = true)]
async fn test_embeddings_timeout_leaves_basic_results() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "havre", 100, &["Havregryn"]);
  backend.respond(SearchKind::Embeddings, "havre", 1600, &["Korn"]);

  search.update_query(1, "havre").await.unwrap();
  sleep(Duration::from_millis(1800)).await;

  let failures = search.failures().await;
  assert!(failures.embeddings);
  assert!(!failures.basic);
  assert_eq!(search.result_set(SearchKind::Embeddings).await, SearchResultSet::empty());
  assert_eq!(search.panel(SearchKind::Embeddings).await, Panel::Failed);
  assert_eq!(names(&search.panel(SearchKind::Basic).await), vec!["Havregryn"]);
}

#[tokio::test(start_paused = true)]
async fn test_typing_into_another_row_resets_failures() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "tomat", 2000, &["Tomat"]);

  search.update_query(0, "tomat").await.unwrap();
  sleep(Duration::from_millis(1800)).await;
  assert!(search.failures().await.basic);

  // Same row keeps the flag until the next dispatch
  search.update_query(0, "tomatt").await.unwrap();
  assert!(search.failures().await.basic);

  search.update_query(1, "x").await.unwrap();
  assert!(!search.failures().await.any());
  assert_eq!(search.active_row().await, Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_http_failures_are_independent_per_kind() {
  let (backend, search) = setup();
  backend.fail(SearchKind::Basic, "torsk", 10, 400);
  backend.fail(SearchKind::Embeddings, "torsk", 20, 503);

  search.update_query(0, "torsk").await.unwrap();
  sleep(Duration::from_millis(400)).await;

  let failures = search.failures().await;
  assert!(failures.basic && failures.embeddings);
  assert_eq!(search.result_set(SearchKind::Embeddings).await.id, None);
}

#[tokio::test(start_paused = true)]
async fn test_switching_or_hiding_resets_failures() {
  let (backend, search) = setup();
  backend.fail(SearchKind::Basic, "torsk", 0, 503);
  backend.fail(SearchKind::Embeddings, "torsk", 0, 503);

  search.update_query(0, "torsk").await.unwrap();
  sleep(Duration::from_millis(300)).await;
  assert!(search.failures().await.any());

  search.set_active_row(1).await.unwrap();
  assert!(!search.failures().await.any());

  search.set_active_row(0).await.unwrap();
  sleep(Duration::from_millis(300)).await;
  assert!(search.failures().await.any());

  search.hide_active().await;
  assert!(!search.failures().await.any());
  assert_eq!(search.panel(SearchKind::Basic).await, Panel::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_embeddings_exclude_names_listed_by_basic() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "tomato", 50, &TOMATO_BASIC);
  backend.respond(
    SearchKind::Embeddings,
    "tomato",
    200,
    &["tomato soup", "Gazpacho", "Minestrone", "Salsa"],
  );

  search.update_query(0, "tomato").await.unwrap();
  sleep(Duration::from_millis(600)).await;

  assert_eq!(names(&search.panel(SearchKind::Basic).await).len(), 8);
  assert_eq!(
    names(&search.panel(SearchKind::Embeddings).await),
    vec!["Gazpacho", "Minestrone", "Salsa"]
  );
}

#[tokio::test(start_paused = true)]
async fn test_dedup_uses_whatever_basic_is_stored() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "tomato", 0, &TOMATO_BASIC);
  backend.respond(SearchKind::Embeddings, "tomato", 0, &[]);

  search.update_query(0, "tomato").await.unwrap();
  sleep(Duration::from_millis(300)).await;

  // Similarity answers before basic, so the previous round's basic set is used
  backend.respond(SearchKind::Basic, "tomato soup", 400, &["Gazpacho"]);
  backend.respond(SearchKind::Embeddings, "tomato soup", 100, &["Tomato Soup", "Gazpacho"]);
  search.update_query(0, "tomato soup").await.unwrap();
  sleep(Duration::from_millis(800)).await;

  assert_eq!(names(&search.panel(SearchKind::Embeddings).await), vec!["Gazpacho"]);
  assert_eq!(names(&search.panel(SearchKind::Basic).await), vec!["Gazpacho"]);
}

#[tokio::test(start_paused = true)]
async fn test_new_results_rewind_pagination() {
  let (backend, search) = setup();
  let many: Vec<String> = (0..17).map(|i| format!("Bröd {i}")).collect();
  let many: Vec<&str> = many.iter().map(|s| s.as_str()).collect();
  backend.respond(SearchKind::Basic, "bröd", 0, &many);
  backend.respond(SearchKind::Basic, "bröd ", 0, &many[..12]);

  search.update_query(0, "bröd").await.unwrap();
  sleep(Duration::from_millis(300)).await;

  assert!(search.next_page(SearchKind::Basic).await);
  assert!(search.next_page(SearchKind::Basic).await);
  assert!(!search.next_page(SearchKind::Basic).await);
  assert_eq!(names(&search.panel(SearchKind::Basic).await), vec!["Bröd 16"]);
  assert!(search.previous_page(SearchKind::Basic).await);

  search.update_query(0, "bröd ").await.unwrap();
  sleep(Duration::from_millis(300)).await;

  match search.panel(SearchKind::Basic).await {
    Panel::Ready(page) => {
      assert_eq!(page.page, 0);
      assert_eq!(page.total, 12);
      assert!(page.has_next);
    }
    other => panic!("Expected ready panel, got: {other:?}"),
  }
}

#[tokio::test(start_paused = true)]
async fn test_selected_product_becomes_decision() {
  let (backend, search) = setup();
  backend.respond(SearchKind::Basic, "potatis", 0, &["Potatis, kokt", "Potatis, rå"]);

  search.update_query(2, "potatis").await.unwrap();
  sleep(Duration::from_millis(300)).await;

  let choice = match search.panel(SearchKind::Basic).await {
    Panel::Ready(page) => page.products[1].clone(),
    other => panic!("Expected ready panel, got: {other:?}"),
  };
  assert_eq!(choice.frontend_id, 2);

  search.select_product(choice).await.unwrap();
  assert_eq!(search.active_row().await, None);

  let decisions = search.decisions().await;
  assert_eq!(decisions.len(), 1);
  assert_eq!(decisions[0].name, "Potatis, rå");
}
