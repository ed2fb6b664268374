//! Report lines and identifier normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::currency::Cents;

/// Numeric report column that drives a commission pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeightColumn {
    /// Gross sales figure, drives the distribution pool.
    Sales,
    /// Net sales figure, drives the diffusion pool.
    Net,
}

impl fmt::Display for WeightColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeightColumn::Sales => "sales",
            WeightColumn::Net => "net",
        };
        f.write_str(label)
    }
}

/// One line of the sales report, keyed by its normalized identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub sales_weight_a: Cents,
    pub sales_weight_b: Cents,
    pub invoice_amount: Cents,
}

impl Item {
    /// Builds an item from a raw identifier. Returns `None` when the
    /// identifier is empty once normalized; such rows take no part in a run.
    pub fn new(
        raw_id: &str,
        sales_weight_a: Cents,
        sales_weight_b: Cents,
        invoice_amount: Cents,
    ) -> Option<Self> {
        let id = normalize_id(raw_id)?;
        Some(Self {
            id,
            sales_weight_a,
            sales_weight_b,
            invoice_amount,
        })
    }

    pub fn weight(&self, column: WeightColumn) -> Cents {
        match column {
            WeightColumn::Sales => self.sales_weight_a,
            WeightColumn::Net => self.sales_weight_b,
        }
    }
}

/// Normalizes an item identifier: trims it, drops the trailing `.0` left by
/// spreadsheets that stored the code as a float, then strips every hyphen and
/// whitespace character.
pub fn normalize_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let id: String = trimmed
        .chars()
        .filter(|ch| *ch != '-' && !ch.is_whitespace())
        .collect();
    if id.is_empty() || id.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(id)
    }
}
