//! Display formatting utilities for CLI output

use colored::*;

use crate::model::{Nutrient, Product};
use crate::orchestrator::{Panel, PanelPage, FAILURE_MESSAGE};
use crate::results::SearchKind;
use crate::rows::InputRow;

const NAME_WIDTH: usize = 18;

fn heading(kind: SearchKind) -> ColoredString {
  match kind {
    SearchKind::Basic => "Matches".blue().bold(),
    SearchKind::Embeddings => "Similar".magenta().bold(),
  }
}

/// Render a result panel as printable lines
pub fn panel_lines(kind: SearchKind, panel: &Panel) -> Vec<String> {
  match panel {
    Panel::Hidden => Vec::new(),
    Panel::Failed => {
      vec![format!("{} {} {}", heading(kind), "✗".red(), FAILURE_MESSAGE.red())]
    }
    Panel::Loading => vec![format!("{} {}", heading(kind), "loading...".dimmed())],
    Panel::Ready(page) => page_lines(kind, page),
  }
}

fn page_lines(kind: SearchKind, page: &PanelPage) -> Vec<String> {
  let mut lines = vec![format!(
    "{} {}",
    heading(kind),
    format!("row {}, page {} ({} results)", page.row, page.page + 1, page.total).dimmed()
  )];

  if page.products.is_empty() {
    lines.push(format!("  {}", "no matches".dimmed()));
    return lines;
  }

  for (index, product) in page.products.iter().enumerate() {
    lines.push(format!("  {:>2}. {}", index + 1, product.name));
  }

  let mut hints = Vec::new();
  if page.has_previous {
    hints.push(format!("prev {kind}"));
  }
  if page.has_next {
    hints.push(format!("next {kind}"));
  }
  if !hints.is_empty() {
    lines.push(format!("  {}", hints.join(" | ").dimmed()));
  }

  lines
}

/// One line per row: id, query, decision and weight
pub fn row_lines(rows: &[InputRow]) -> Vec<String> {
  rows
    .iter()
    .map(|row| {
      let marker = if row.active { "▸".cyan().to_string() } else { " ".to_string() };
      let query = if row.query.is_empty() { "—".dimmed().to_string() } else { row.query.clone() };
      let decision = match &row.decision {
        Some(product) => format!("→ {}", product.name.green()),
        None => String::new(),
      };
      let weight = if !row.custom_weight {
        "estimated".dimmed().to_string()
      } else if row.weight == 0 {
        String::new()
      } else {
        format!("{} g", row.weight)
      };
      format!("{marker} [{}] {query} {decision} {weight}", row.id).trim_end().to_string()
    })
    .collect()
}

fn truncate(name: &str, width: usize) -> String {
  if name.chars().count() <= width {
    format!("{name:<width$}")
  } else {
    let cut: String = name.chars().take(width - 1).collect();
    format!("{cut}…")
  }
}

/// Percent-of-intake table, one column per product
pub fn nutrient_table(products: &[Product]) -> Vec<String> {
  if products.is_empty() {
    return vec!["No products selected yet.".to_string()];
  }

  let mut lines = Vec::new();
  let mut header = format!("{:<10}", "");
  for product in products {
    header.push_str(&format!(" {}", truncate(&product.name, NAME_WIDTH).bold()));
  }
  lines.push(header);

  for nutrient in Nutrient::ALL {
    let label = if nutrient.is_mineral() {
      format!("{:<10}", nutrient.label()).yellow()
    } else {
      format!("{:<10}", nutrient.label()).cyan()
    };
    let mut line = label.to_string();
    for product in products {
      let percent = product.nutrients.get(nutrient) * 100.0;
      let cell = format!("{:>width$}", format!("{percent:.0}%"), width = NAME_WIDTH);
      if percent >= 100.0 {
        line.push_str(&format!(" {}", cell.green()));
      } else {
        line.push_str(&format!(" {cell}"));
      }
    }
    lines.push(line);
  }

  if products.iter().any(|p| p.weight.is_some()) {
    let mut line = format!("{:<10}", "Vikt");
    for product in products {
      let weight = product.weight.map(|w| format!("{w:.0} g")).unwrap_or_default();
      line.push_str(&format!(" {weight:>width$}", width = NAME_WIDTH));
    }
    lines.push(line);
  }

  lines
}
