//! Input row bookkeeping
//!
//! Each row is one food-name slot. Ids are handed out from a counter that only
//! grows, so a removed row's id is never seen again in the same session.

use crate::error::RowError;
use crate::model::{Product, RowId};

const DEFAULT_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
  pub id: RowId,
  pub query: String,
  pub active: bool,
  pub has_decided: bool,
  pub decision: Option<Product>,
  /// Weight is typed in by the user rather than estimated
  pub custom_weight: bool,
  /// Grams, 0 when unset
  pub weight: u32,
}

impl InputRow {
  pub fn new(id: RowId) -> Self {
    Self {
      id,
      query: String::new(),
      active: false,
      has_decided: false,
      decision: None,
      custom_weight: true,
      weight: 0,
    }
  }
}

#[derive(Debug, Clone)]
pub struct RowList {
  rows: Vec<InputRow>,
  next_id: RowId,
}

impl Default for RowList {
  fn default() -> Self {
    Self::new()
  }
}

impl RowList {
  /// Three empty rows with ids 0, 1 and 2
  pub fn new() -> Self {
    let mut list = Self { rows: Vec::new(), next_id: 0 };
    for _ in 0..DEFAULT_ROWS {
      list.add();
    }
    list
  }

  pub fn rows(&self) -> &[InputRow] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn get(&self, id: RowId) -> Option<&InputRow> {
    self.rows.iter().find(|row| row.id == id)
  }

  fn get_mut(&mut self, id: RowId) -> Result<&mut InputRow, RowError> {
    self.rows.iter_mut().find(|row| row.id == id).ok_or_else(|| RowError::not_found(id))
  }

  pub fn active(&self) -> Option<&InputRow> {
    self.rows.iter().find(|row| row.active)
  }

  pub fn active_id(&self) -> Option<RowId> {
    self.active().map(|row| row.id)
  }

  /// Append an empty row and return its id
  pub fn add(&mut self) -> RowId {
    let id = self.next_id;
    self.next_id += 1;
    self.rows.push(InputRow::new(id));
    id
  }

  pub fn remove(&mut self, id: RowId) -> Result<InputRow, RowError> {
    let index =
      self.rows.iter().position(|row| row.id == id).ok_or_else(|| RowError::not_found(id))?;
    if self.rows.len() == 1 {
      return Err(RowError::LastRow);
    }
    Ok(self.rows.remove(index))
  }

  /// Make `id` the only active row
  pub fn activate(&mut self, id: RowId) -> Result<(), RowError> {
    if self.get(id).is_none() {
      return Err(RowError::not_found(id));
    }
    for row in &mut self.rows {
      row.active = row.id == id;
    }
    Ok(())
  }

  pub fn deactivate_all(&mut self) {
    for row in &mut self.rows {
      row.active = false;
    }
  }

  pub fn set_query(&mut self, id: RowId, text: &str) -> Result<(), RowError> {
    let row = self.get_mut(id)?;
    row.query = text.to_string();
    Ok(())
  }

  /// Record `product` as the decision for the row it was searched for
  pub fn decide(&mut self, product: Product) -> Result<(), RowError> {
    let row = self.get_mut(product.frontend_id)?;
    row.has_decided = true;
    row.decision = Some(product);
    Ok(())
  }

  /// Empty input clears the weight; anything but ASCII digits is rejected
  pub fn set_weight(&mut self, id: RowId, text: &str) -> Result<u32, RowError> {
    let row = self.get_mut(id)?;
    if text.is_empty() {
      row.weight = 0;
      return Ok(0);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
      return Err(RowError::digits_only(text));
    }
    let weight = text.parse::<u32>().map_err(|_| RowError::weight_too_large(text))?;
    row.weight = weight;
    Ok(weight)
  }

  pub fn toggle_custom_weight(&mut self, id: RowId) -> Result<bool, RowError> {
    let row = self.get_mut(id)?;
    row.custom_weight = !row.custom_weight;
    Ok(row.custom_weight)
  }

  pub fn decisions(&self) -> Vec<(RowId, &Product)> {
    self.rows.iter().filter_map(|row| row.decision.as_ref().map(|p| (row.id, p))).collect()
  }
}
