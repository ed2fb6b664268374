//! Builds the balanced posting set for a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    currency::checked_sum,
    domain::{Allocation, Item, Ledger, Pool, PostingLine, Side},
    errors::PostingError,
};

/// Label fragments appended to the base label of every posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelSet {
    pub revenue_global: String,
    pub revenue_item: String,
    pub global_suffix: String,
    pub item_suffix: String,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            revenue_global: "CA global".into(),
            revenue_item: "CA ISBN".into(),
            global_suffix: "global".into(),
            item_suffix: "ISBN".into(),
        }
    }
}

/// Per-run posting metadata shared by every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingMeta {
    pub date: NaiveDate,
    pub journal: String,
    pub base_label: String,
    pub revenue_account: String,
    pub labels: LabelSet,
}

impl PostingMeta {
    fn label(&self, fragment: &str) -> String {
        format!("{} - {}", self.base_label, fragment)
    }

    fn pool_label(&self, pool: &Pool, suffix: &str) -> String {
        self.label(&format!("{} {}", pool.label, suffix))
    }
}

/// Assembles posting lines from items and their pool allocations.
pub struct LedgerBuilder<'a> {
    meta: &'a PostingMeta,
}

impl<'a> LedgerBuilder<'a> {
    pub fn new(meta: &'a PostingMeta) -> Self {
        Self { meta }
    }

    /// Emits, in order: the global revenue debit, one revenue credit per item,
    /// then for each pool its global credit followed by one debit per item.
    ///
    /// Global amounts are summed from the per-item amounts here; a pool whose
    /// shares do not add up to its target, or a ledger whose sides differ, is
    /// an error and no ledger is returned.
    pub fn build(
        &self,
        items: &[Item],
        pools: &[(&Pool, &Allocation)],
    ) -> Result<Ledger, PostingError> {
        let mut lines = Vec::with_capacity((items.len() + 1) * (pools.len() + 1));
        self.push_revenue(items, &mut lines)?;
        for (pool, allocation) in pools {
            self.push_pool(items, pool, allocation, &mut lines)?;
        }

        let ledger = Ledger::new(lines);
        let totals = ledger.verify_balance()?;
        info!(
            lines = ledger.len(),
            debit = %totals.debit,
            credit = %totals.credit,
            "ledger balanced"
        );
        Ok(ledger)
    }

    fn push_revenue(
        &self,
        items: &[Item],
        lines: &mut Vec<PostingLine>,
    ) -> Result<(), PostingError> {
        let meta = self.meta;
        let total = checked_sum(items.iter().map(|item| item.invoice_amount)).ok_or_else(|| {
            PostingError::AmountOverflow {
                account: meta.revenue_account.clone(),
            }
        })?;
        lines.push(PostingLine::new(
            Side::Debit,
            meta.date,
            &meta.journal,
            &meta.revenue_account,
            meta.label(&meta.labels.revenue_global),
            None,
            total,
        ));
        for item in items {
            lines.push(PostingLine::new(
                Side::Credit,
                meta.date,
                &meta.journal,
                &meta.revenue_account,
                meta.label(&meta.labels.revenue_item),
                Some(item.id.clone()),
                item.invoice_amount,
            ));
        }
        Ok(())
    }

    fn push_pool(
        &self,
        items: &[Item],
        pool: &Pool,
        allocation: &Allocation,
        lines: &mut Vec<PostingLine>,
    ) -> Result<(), PostingError> {
        let meta = self.meta;
        if allocation.len() != items.len() {
            return Err(PostingError::ItemCountMismatch {
                pool: pool.name.clone(),
                allocated: allocation.len(),
                items: items.len(),
            });
        }
        for (index, (item, share)) in items.iter().zip(&allocation.shares).enumerate() {
            if item.id != share.item_id {
                return Err(PostingError::ItemMismatch {
                    pool: pool.name.clone(),
                    index,
                    expected: item.id.clone(),
                    found: share.item_id.clone(),
                });
            }
        }

        let total = checked_sum(allocation.shares.iter().map(|share| share.cents)).ok_or_else(
            || PostingError::AmountOverflow {
                account: pool.account.clone(),
            },
        )?;
        if total != pool.target {
            return Err(PostingError::PoolTotalMismatch {
                pool: pool.name.clone(),
                expected: pool.target,
                actual: total,
            });
        }
        debug!(pool = %pool.name, total = %total, "posting pool");

        lines.push(PostingLine::new(
            Side::Credit,
            meta.date,
            &meta.journal,
            &pool.account,
            meta.pool_label(pool, &meta.labels.global_suffix),
            None,
            total,
        ));
        for share in &allocation.shares {
            lines.push(PostingLine::new(
                Side::Debit,
                meta.date,
                &meta.journal,
                &pool.account,
                meta.pool_label(pool, &meta.labels.item_suffix),
                Some(share.item_id.clone()),
                share.cents,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        currency::Cents,
        domain::{Share, WeightColumn},
    };

    fn meta() -> PostingMeta {
        PostingMeta {
            date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            journal: "VT".into(),
            base_label: "VENTES".into(),
            revenue_account: "70110000".into(),
            labels: LabelSet::default(),
        }
    }

    fn pool(target: i64) -> Pool {
        Pool {
            name: "distribution".into(),
            account: "62280000".into(),
            label: "Com. distribution".into(),
            weight: WeightColumn::Sales,
            target: Cents(target),
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item::new("A", Cents(100), Cents(100), Cents(10000)).unwrap(),
            Item::new("B", Cents(200), Cents(100), Cents(20000)).unwrap(),
        ]
    }

    fn allocation(target: i64, cents: &[i64]) -> Allocation {
        Allocation {
            pool: "distribution".into(),
            target: Cents(target),
            shares: ["A", "B"]
                .iter()
                .zip(cents)
                .map(|(id, c)| Share {
                    item_id: id.to_string(),
                    cents: Cents(*c),
                })
                .collect(),
        }
    }

    #[test]
    fn orders_revenue_then_pool_lines() {
        let meta = meta();
        let pool = pool(1000);
        let alloc = allocation(1000, &[333, 667]);
        let ledger = LedgerBuilder::new(&meta)
            .build(&items(), &[(&pool, &alloc)])
            .unwrap();

        let labels: Vec<&str> = ledger.lines().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "VENTES - CA global",
                "VENTES - CA ISBN",
                "VENTES - CA ISBN",
                "VENTES - Com. distribution global",
                "VENTES - Com. distribution ISBN",
                "VENTES - Com. distribution ISBN",
            ]
        );
        assert_eq!(ledger.lines()[0].debit, Cents(30000));
        assert_eq!(ledger.lines()[3].credit, Cents(1000));
        assert_eq!(ledger.lines()[5].item_ref.as_deref(), Some("B"));
        assert!(ledger.totals().unwrap().is_balanced());
    }

    #[test]
    fn refuses_shares_that_miss_the_target() {
        let meta = meta();
        let pool = pool(1000);
        let alloc = allocation(1000, &[333, 666]);
        let err = LedgerBuilder::new(&meta)
            .build(&items(), &[(&pool, &alloc)])
            .unwrap_err();
        assert_eq!(
            err,
            PostingError::PoolTotalMismatch {
                pool: "distribution".into(),
                expected: Cents(1000),
                actual: Cents(999),
            }
        );
    }

    #[test]
    fn refuses_misaligned_allocations() {
        let meta = meta();
        let pool = pool(1000);
        let mut alloc = allocation(1000, &[333, 667]);
        alloc.shares.swap(0, 1);
        assert!(matches!(
            LedgerBuilder::new(&meta).build(&items(), &[(&pool, &alloc)]),
            Err(PostingError::ItemMismatch { index: 0, .. })
        ));

        alloc.shares.pop();
        assert!(matches!(
            LedgerBuilder::new(&meta).build(&items(), &[(&pool, &alloc)]),
            Err(PostingError::ItemCountMismatch { allocated: 1, items: 2, .. })
        ));
    }

    #[test]
    fn refuses_revenue_beyond_the_cent_range() {
        let meta = meta();
        let half = i64::MAX / 2 + 1;
        let items = vec![
            Item::new("A", Cents(100), Cents(100), Cents(half)).unwrap(),
            Item::new("B", Cents(200), Cents(100), Cents(half)).unwrap(),
        ];
        let err = LedgerBuilder::new(&meta).build(&items, &[]).unwrap_err();
        assert_eq!(
            err,
            PostingError::AmountOverflow {
                account: "70110000".into(),
            }
        );
    }
}
