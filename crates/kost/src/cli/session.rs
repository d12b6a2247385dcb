//! Line-driven interactive session over the search orchestrator

use anyhow::{anyhow, Result};
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::display;
use crate::error::RowError;
use crate::model::RowId;
use crate::orchestrator::{Panel, SearchOrchestrator};
use crate::results::SearchKind;

pub const HELP: &str = "\
commands:
  type <row> <text>       type into a row (focuses it)
  focus <row>             focus a row
  hide                    close the search panel
  pick <basic|similar> <n>  choose the n-th product on the current page
  next|prev <basic|similar> page through a panel
  add                     add a row
  remove <row>            remove a row
  weight <row> [grams]    set or clear a row's weight
  estimate <row>          toggle weight estimation for a row
  show                    print rows and panels
  table                   print nutrients of chosen products
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
  Type { row: RowId, text: String },
  Focus { row: RowId },
  Hide,
  Pick { kind: SearchKind, index: usize },
  Next { kind: SearchKind },
  Previous { kind: SearchKind },
  Add,
  Remove { row: RowId },
  Weight { row: RowId, text: String },
  Estimate { row: RowId },
  Show,
  Table,
  Help,
  Quit,
}

fn parse_kind(word: Option<&str>) -> Result<SearchKind> {
  match word {
    Some("basic") | Some("b") => Ok(SearchKind::Basic),
    Some("similar") | Some("embeddings") | Some("s") => Ok(SearchKind::Embeddings),
    Some(other) => Err(anyhow!("unknown panel '{other}', use basic or similar")),
    None => Err(anyhow!("missing panel, use basic or similar")),
  }
}

fn parse_row(word: Option<&str>) -> Result<RowId> {
  let word = word.ok_or_else(|| anyhow!("missing row id"))?;
  word.parse().map_err(|_| anyhow!("'{word}' is not a row id"))
}

impl SessionCommand {
  pub fn parse(line: &str) -> Result<Self> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let command = match verb {
      "type" => {
        let rest = rest.trim_start();
        let (row, text) = rest.split_once(' ').unwrap_or((rest, ""));
        SessionCommand::Type { row: parse_row(Some(row))?, text: text.to_string() }
      }
      "focus" => SessionCommand::Focus { row: parse_row(args.next())? },
      "hide" => SessionCommand::Hide,
      "pick" => {
        let kind = parse_kind(args.next())?;
        let index = args
          .next()
          .and_then(|n| n.parse::<usize>().ok())
          .filter(|n| *n > 0)
          .ok_or_else(|| anyhow!("pick needs a position starting at 1"))?;
        SessionCommand::Pick { kind, index }
      }
      "next" => SessionCommand::Next { kind: parse_kind(args.next())? },
      "prev" => SessionCommand::Previous { kind: parse_kind(args.next())? },
      "add" => SessionCommand::Add,
      "remove" => SessionCommand::Remove { row: parse_row(args.next())? },
      "weight" => {
        let row = parse_row(args.next())?;
        SessionCommand::Weight { row, text: args.next().unwrap_or("").to_string() }
      }
      "estimate" => SessionCommand::Estimate { row: parse_row(args.next())? },
      "show" | "" => SessionCommand::Show,
      "table" => SessionCommand::Table,
      "help" | "?" => SessionCommand::Help,
      "quit" | "exit" | "q" => SessionCommand::Quit,
      other => return Err(anyhow!("unknown command '{other}', try help")),
    };
    Ok(command)
  }
}

async fn print_panels(search: &SearchOrchestrator) {
  for kind in SearchKind::ALL {
    for line in display::panel_lines(kind, &search.panel(kind).await) {
      println!("{line}");
    }
  }
}

async fn print_rows(search: &SearchOrchestrator) {
  for line in display::row_lines(&search.rows().await) {
    println!("{line}");
  }
}

/// Apply one command; returns false when the session should end
pub async fn execute(search: &SearchOrchestrator, command: SessionCommand) -> Result<bool> {
  match command {
    SessionCommand::Type { row, text } => search.update_query(row, &text).await?,
    SessionCommand::Focus { row } => {
      search.set_active_row(row).await?;
      print_panels(search).await;
    }
    SessionCommand::Hide => search.hide_active().await,
    SessionCommand::Pick { kind, index } => {
      let page = match search.panel(kind).await {
        Panel::Ready(page) => page,
        _ => return Err(anyhow!("no {kind} results to pick from")),
      };
      let product =
        page.products.get(index - 1).cloned().ok_or_else(|| anyhow!("no product at {index}"))?;
      println!("{} row {} → {}", "✓".green(), page.row, product.name.green());
      search.select_product(product).await?;
    }
    SessionCommand::Next { kind } => {
      if search.next_page(kind).await {
        print_panels(search).await;
      }
    }
    SessionCommand::Previous { kind } => {
      if search.previous_page(kind).await {
        print_panels(search).await;
      }
    }
    SessionCommand::Add => println!("added row {}", search.add_row().await),
    SessionCommand::Remove { row } => {
      search.remove_row(row).await?;
    }
    SessionCommand::Weight { row, text } => match search.set_weight(row, &text).await {
      Err(RowError::DigitsOnly { .. }) => println!("{}", "Endast siffror!".yellow()),
      result => {
        result?;
      }
    },
    SessionCommand::Estimate { row } => {
      let custom = search.toggle_custom_weight(row).await?;
      println!("row {row}: {}", if custom { "weight typed in" } else { "weight estimated" });
    }
    SessionCommand::Show => {
      print_rows(search).await;
      print_panels(search).await;
    }
    SessionCommand::Table => {
      for line in display::nutrient_table(&search.decisions().await) {
        println!("{line}");
      }
    }
    SessionCommand::Help => println!("{HELP}"),
    SessionCommand::Quit => return Ok(false),
  }
  Ok(true)
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(search: SearchOrchestrator) -> Result<()> {
  let mut updates = search.subscribe();
  let watcher = {
    let search = search.clone();
    tokio::spawn(async move {
      while updates.changed().await.is_ok() {
        print_panels(&search).await;
      }
    })
  };

  println!("{}", "kost session - type 'help' for commands".bold());
  print_rows(&search).await;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    let command = match SessionCommand::parse(&line) {
      Ok(command) => command,
      Err(e) => {
        println!("{} {e}", "✗".red());
        continue;
      }
    };

    match execute(&search, command).await {
      Ok(true) => {}
      Ok(false) => break,
      Err(e) => println!("{} {e}", "✗".red()),
    }
  }

  watcher.abort();
  Ok(())
}
