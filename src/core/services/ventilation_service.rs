//! Runs a full ventilation: one allocation per pool, then the ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    core::{
        allocator::allocate,
        ledger_builder::{LabelSet, LedgerBuilder, PostingMeta},
    },
    currency::{apply_rate, checked_sum, Cents},
    domain::{Allocation, Item, Ledger, LedgerTotals, Pool, WeightColumn},
    errors::{CommissionError, Result},
};

/// Operator input for one commission pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolParameters {
    pub name: String,
    pub account: String,
    pub label: String,
    pub weight: WeightColumn,
    /// Commission rate in percent, used when no explicit target is given.
    pub rate_percent: Decimal,
    pub target: Option<Cents>,
}

impl PoolParameters {
    /// Resolves the pool target, deriving it from the rate when absent.
    pub fn resolve(&self, items: &[Item]) -> Result<Pool> {
        let target = match self.target {
            Some(target) => target,
            None => {
                let weight_total = checked_sum(items.iter().map(|item| item.weight(self.weight)))
                    .ok_or_else(|| {
                        CommissionError::InvalidInput(format!(
                            "pool `{}`: {} weights overflow the cent range",
                            self.name, self.weight
                        ))
                    })?;
                let derived = apply_rate(weight_total, self.rate_percent).ok_or_else(|| {
                    CommissionError::InvalidInput(format!(
                        "pool `{}`: rate {}% overflows on {}",
                        self.name, self.rate_percent, weight_total
                    ))
                })?;
                info!(
                    pool = %self.name,
                    rate = %self.rate_percent,
                    target = %derived,
                    "target derived from rate"
                );
                derived
            }
        };
        Ok(Pool {
            name: self.name.clone(),
            account: self.account.clone(),
            label: self.label.clone(),
            weight: self.weight,
            target,
        })
    }
}

/// Everything a run needs besides the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    pub date: NaiveDate,
    pub journal: String,
    pub base_label: String,
    pub revenue_account: String,
    pub labels: LabelSet,
    pub pools: Vec<PoolParameters>,
}

impl RunParameters {
    fn meta(&self) -> PostingMeta {
        PostingMeta {
            date: self.date,
            journal: self.journal.clone(),
            base_label: self.base_label.clone(),
            revenue_account: self.revenue_account.clone(),
            labels: self.labels.clone(),
        }
    }
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub items: Vec<Item>,
    pub pools: Vec<Pool>,
    pub allocations: Vec<Allocation>,
    pub ledger: Ledger,
    pub totals: LedgerTotals,
    pub invoice_total: Cents,
}

/// Stateless entry point for ventilation runs.
pub struct VentilationService;

impl VentilationService {
    /// Allocates every pool over `items` and builds the balanced ledger.
    pub fn run(items: Vec<Item>, params: &RunParameters) -> Result<RunOutcome> {
        if params.pools.is_empty() {
            return Err(CommissionError::InvalidInput(
                "at least one commission pool is required".into(),
            ));
        }
        warn_on_duplicates(&items);
        let invoice_total = checked_sum(items.iter().map(|item| item.invoice_amount))
            .ok_or_else(|| {
                CommissionError::InvalidInput(format!(
                    "invoice amounts on account `{}` overflow the cent range",
                    params.revenue_account
                ))
            })?;
        info!(items = items.len(), pools = params.pools.len(), "ventilation started");

        let mut pools = Vec::with_capacity(params.pools.len());
        let mut allocations = Vec::with_capacity(params.pools.len());
        for pool_params in &params.pools {
            let pool = pool_params.resolve(&items)?;
            let allocation = Self::allocate_pool(&items, &pool)?;
            pools.push(pool);
            allocations.push(allocation);
        }

        let meta = params.meta();
        let postings: Vec<(&Pool, &Allocation)> = pools.iter().zip(allocations.iter()).collect();
        let ledger = LedgerBuilder::new(&meta).build(&items, &postings)?;
        let totals = ledger.verify_balance()?;

        Ok(RunOutcome {
            items,
            pools,
            allocations,
            ledger,
            totals,
            invoice_total,
        })
    }

    /// Splits a single pool across the items using the pool's weight column.
    pub fn allocate_pool(items: &[Item], pool: &Pool) -> Result<Allocation> {
        let entries = items
            .iter()
            .map(|item| (item.id.as_str(), item.weight(pool.weight)));
        Ok(allocate(&pool.name, entries, pool.target)?)
    }
}

fn warn_on_duplicates(items: &[Item]) {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            warn!(item = %item.id, "duplicate identifier kept as a separate line");
        }
    }
}
