//! Wire types shared with the nutrition service
//!
//! Nutrient values are fractions of the recommended daily intake, so `0.37`
//! means 37% and `2.86` means 286%.

use serde::{Deserialize, Serialize};

/// Identifier of an input row, echoed back by the service as `frontendId`
pub type RowId = u32;

/// Nutrients reported for every product, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
  Jod,
  Jarn,
  Kalcium,
  Kalium,
  Magnesium,
  Selen,
  Zink,
  A,
  B1,
  B2,
  B3,
  B6,
  B9,
  B12,
  C,
  D,
  E,
}

impl Nutrient {
  pub const ALL: [Nutrient; 17] = [
    Nutrient::Jod,
    Nutrient::Jarn,
    Nutrient::Kalcium,
    Nutrient::Kalium,
    Nutrient::Magnesium,
    Nutrient::Selen,
    Nutrient::Zink,
    Nutrient::A,
    Nutrient::B1,
    Nutrient::B2,
    Nutrient::B3,
    Nutrient::B6,
    Nutrient::B9,
    Nutrient::B12,
    Nutrient::C,
    Nutrient::D,
    Nutrient::E,
  ];

  /// Label shown next to the nutrient in tables
  pub fn label(&self) -> &'static str {
    match self {
      Nutrient::Jod => "Jod",
      Nutrient::Jarn => "Järn",
      Nutrient::Kalcium => "Kalcium",
      Nutrient::Kalium => "Kalium",
      Nutrient::Magnesium => "Magnesium",
      Nutrient::Selen => "Selen",
      Nutrient::Zink => "Zink",
      Nutrient::A => "A",
      Nutrient::B1 => "B1",
      Nutrient::B2 => "B2",
      Nutrient::B3 => "B3",
      Nutrient::B6 => "B6",
      Nutrient::B9 => "B9",
      Nutrient::B12 => "B12",
      Nutrient::C => "C",
      Nutrient::D => "D",
      Nutrient::E => "E",
    }
  }

  pub fn is_mineral(&self) -> bool {
    matches!(
      self,
      Nutrient::Jod
        | Nutrient::Jarn
        | Nutrient::Kalcium
        | Nutrient::Kalium
        | Nutrient::Magnesium
        | Nutrient::Selen
        | Nutrient::Zink
    )
  }
}

/// Per-nutrient fractions of the recommended daily intake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrients {
  pub jod: f64,
  pub jarn: f64,
  pub kalcium: f64,
  pub kalium: f64,
  pub magnesium: f64,
  pub selen: f64,
  pub zink: f64,
  pub a: f64,
  pub b1: f64,
  pub b2: f64,
  pub b3: f64,
  pub b6: f64,
  pub b9: f64,
  pub b12: f64,
  pub c: f64,
  pub d: f64,
  pub e: f64,
}

impl Nutrients {
  pub fn get(&self, nutrient: Nutrient) -> f64 {
    match nutrient {
      Nutrient::Jod => self.jod,
      Nutrient::Jarn => self.jarn,
      Nutrient::Kalcium => self.kalcium,
      Nutrient::Kalium => self.kalium,
      Nutrient::Magnesium => self.magnesium,
      Nutrient::Selen => self.selen,
      Nutrient::Zink => self.zink,
      Nutrient::A => self.a,
      Nutrient::B1 => self.b1,
      Nutrient::B2 => self.b2,
      Nutrient::B3 => self.b3,
      Nutrient::B6 => self.b6,
      Nutrient::B9 => self.b9,
      Nutrient::B12 => self.b12,
      Nutrient::C => self.c,
      Nutrient::D => self.d,
      Nutrient::E => self.e,
    }
  }

  /// Iterate nutrients in display order
  pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
    Nutrient::ALL.iter().map(move |n| (*n, self.get(*n)))
  }
}

/// A matched product as returned by the search and process-input endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  /// Row the query was issued for
  #[serde(rename = "frontendId", alias = "id")]
  pub frontend_id: RowId,

  pub name: String,

  /// Grams, only carried by process-input responses
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,

  #[serde(flatten)]
  pub nutrients: Nutrients,
}

impl Product {
  pub fn new(frontend_id: RowId, name: impl Into<String>) -> Self {
    Self { frontend_id, name: name.into(), weight: None, nutrients: Nutrients::default() }
  }

  /// Case-insensitive name comparison, used to drop duplicates across panels
  pub fn same_name(&self, other: &str) -> bool {
    self.name.to_lowercase() == other.to_lowercase()
  }
}

/// Request item for the process-input endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInputItem {
  #[serde(rename = "frontendId")]
  pub frontend_id: RowId,
  pub name: String,
}
