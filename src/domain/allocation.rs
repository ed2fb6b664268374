//! Commission pools and the per-item shares computed for them.

use serde::{Deserialize, Serialize};

use crate::{currency::Cents, domain::item::WeightColumn};

/// Describes one commission pool to split across the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pool {
    pub name: String,
    pub account: String,
    /// Label fragment used in postings, e.g. `Com. distribution`.
    pub label: String,
    pub weight: WeightColumn,
    pub target: Cents,
}

/// Allocated amount for one item of one pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Share {
    pub item_id: String,
    pub cents: Cents,
}

/// Result of splitting a pool, one share per input item in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Allocation {
    pub pool: String,
    pub target: Cents,
    pub shares: Vec<Share>,
}

impl Allocation {
    /// Sum of the shares, recomputed on every call.
    pub fn total(&self) -> Cents {
        self.shares.iter().map(|share| share.cents).sum()
    }

    /// First share recorded for `item_id`.
    pub fn get(&self, item_id: &str) -> Option<Cents> {
        self.shares
            .iter()
            .find(|share| share.item_id == item_id)
            .map(|share| share.cents)
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}
