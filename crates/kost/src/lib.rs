//! Kost - search-as-you-type client for a remote nutrition database
//!
//! Users fill in rows of free-text food names. The [`orchestrator`] debounces
//! typing in the active row, runs a basic and a similarity lookup against the
//! nutrition service, and exposes only results that still belong to that row.

pub mod cli;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod pagination;
pub mod results;
pub mod rows;

pub use client::{FoodClient, FoodSearch};
pub use config::Config;
pub use error::{ConfigError, RowError, SearchError};
pub use model::{Nutrient, Product, RowId};
pub use orchestrator::{Panel, SearchOrchestrator};
pub use results::{FailureState, SearchKind, SearchResultSet};
