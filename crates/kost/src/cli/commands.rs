use anyhow::{anyhow, Result};
use colored::*;
use futures::future::join;
use std::sync::Arc;

use crate::cli::{display, session};
use crate::client::{FoodClient, FoodSearch};
use crate::config::Config;
use crate::model::{ProcessInputItem, RowId};
use crate::orchestrator::{Panel, PanelPage, SearchOrchestrator};
use crate::pagination::Pager;
use crate::results::{dedup_against, SearchKind, SearchResultSet};

/// Row id used for one-shot searches
const ONE_SHOT_ROW: RowId = 0;

fn one_shot_panel(
  outcome: Result<SearchResultSet, crate::error::SearchError>,
  page: usize,
  page_size: usize,
) -> Panel {
  let set = match outcome {
    Ok(set) => set,
    Err(e) => {
      tracing::warn!(error = %e, "one-shot lookup failed");
      return Panel::Failed;
    }
  };

  let mut pager = Pager::new(page_size);
  for _ in 0..page {
    if !pager.next(set.products.len()) {
      break;
    }
  }

  let total = set.products.len();
  Panel::Ready(PanelPage {
    row: ONE_SHOT_ROW,
    products: pager.slice(&set.products).to_vec(),
    page: pager.page(),
    total,
    has_previous: pager.start() > 0,
    has_next: pager.start() + pager.page_size() < total,
  })
}

/// Run both lookups once and print the two panels
pub async fn search(config: &Config, terms: &[String], page: usize) -> Result<()> {
  let query = terms.join(" ");
  if query.trim().is_empty() {
    return Err(anyhow!("search terms must not be blank"));
  }

  let client = FoodClient::new(config)?;
  let (basic, embeddings) = join(
    client.search(SearchKind::Basic, query.clone(), ONE_SHOT_ROW),
    client.search(SearchKind::Embeddings, query.clone(), ONE_SHOT_ROW),
  )
  .await;

  let basic = basic.map(|products| SearchResultSet::new(ONE_SHOT_ROW, products));
  let reference = basic.clone().unwrap_or_default();
  let embeddings = embeddings
    .map(|products| SearchResultSet::new(ONE_SHOT_ROW, dedup_against(&reference, products)));

  let page = page.saturating_sub(1);
  for (kind, outcome) in [(SearchKind::Basic, basic), (SearchKind::Embeddings, embeddings)] {
    for line in display::panel_lines(kind, &one_shot_panel(outcome, page, config.page_size)) {
      println!("{line}");
    }
  }

  Ok(())
}

/// Resolve names in one round trip and print their nutrients
pub async fn process(config: &Config, names: &[String]) -> Result<()> {
  let items: Vec<ProcessInputItem> = names
    .iter()
    .enumerate()
    .map(|(index, name)| ProcessInputItem { frontend_id: index as RowId, name: name.clone() })
    .collect();

  let client = FoodClient::new(config)?;
  let products = client.process_input(&items).await?;

  println!("{} {} products", "✓".green(), products.len());
  for line in display::nutrient_table(&products) {
    println!("{line}");
  }
  Ok(())
}

/// Interactive search session against the configured service
pub async fn session(config: &Config) -> Result<()> {
  let backend: Arc<dyn FoodSearch> = Arc::new(FoodClient::new(config)?);
  let search = SearchOrchestrator::new(backend, config);
  if config.warm_up {
    search.warm_up();
  }
  session::run(search).await
}
