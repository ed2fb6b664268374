//! Largest-remainder allocation of a pool across weighted items.
//!
//! Shares are computed as exact integer quotients: with weights `w` and a
//! target `T` in cents, item `i` receives `floor(w[i] * T / S)` cents where
//! `S = sum(w)`, and the fractional cent is `(w[i] * T) mod S` over `S`. Every
//! remainder shares the denominator `S`, so ranking compares the integer
//! numerators directly and no floating point rounding ever enters.

use std::cmp::Reverse;

use tracing::debug;

use crate::{
    currency::Cents,
    domain::{Allocation, Share},
    errors::AllocationError,
};

/// Splits `target` across `entries` in proportion to their weights so that the
/// shares sum to `target` exactly.
///
/// Entries keep their input order in the result. Leftover cents go to the
/// entries with the largest fractional remainder; equal remainders are served
/// in input order.
pub fn allocate<'a, I>(pool: &str, entries: I, target: Cents) -> Result<Allocation, AllocationError>
where
    I: IntoIterator<Item = (&'a str, Cents)>,
{
    let entries: Vec<(&str, Cents)> = entries.into_iter().collect();
    if target.is_negative() {
        return Err(AllocationError::NegativeTarget {
            pool: pool.to_string(),
            target,
        });
    }
    if let Some((item, weight)) = entries.iter().find(|(_, weight)| weight.is_negative()) {
        return Err(AllocationError::NegativeWeight {
            pool: pool.to_string(),
            item: item.to_string(),
            weight: *weight,
        });
    }

    let weight_sum: i128 = entries.iter().map(|(_, weight)| weight.value() as i128).sum();
    if weight_sum == 0 {
        return Err(AllocationError::DegenerateWeight {
            pool: pool.to_string(),
        });
    }

    let target_cents = target.value() as i128;
    let mut floors = Vec::with_capacity(entries.len());
    let mut remainders = Vec::with_capacity(entries.len());
    for (_, weight) in &entries {
        let numerator = weight.value() as i128 * target_cents;
        floors.push(numerator / weight_sum);
        remainders.push(numerator % weight_sum);
    }

    let floor_sum: i128 = floors.iter().sum();
    let deficit = i64::try_from(target_cents - floor_sum).map_err(|_| {
        AllocationError::AllocationOverflow {
            pool: pool.to_string(),
            deficit: i64::MAX,
            items: entries.len(),
        }
    })?;

    let ranking = rank_by_remainder(&remainders);
    let adjustment =
        adjustments(&ranking, deficit).ok_or_else(|| AllocationError::AllocationOverflow {
            pool: pool.to_string(),
            deficit,
            items: entries.len(),
        })?;

    let mut shares = Vec::with_capacity(entries.len());
    for (index, (item, _)) in entries.iter().enumerate() {
        let cents = floors[index] + adjustment[index] as i128;
        let cents = i64::try_from(cents).map_err(|_| AllocationError::AllocationOverflow {
            pool: pool.to_string(),
            deficit,
            items: entries.len(),
        })?;
        shares.push(Share {
            item_id: item.to_string(),
            cents: Cents(cents),
        });
    }

    debug!(
        pool,
        items = shares.len(),
        target = %target,
        deficit,
        "pool allocated"
    );

    Ok(Allocation {
        pool: pool.to_string(),
        target,
        shares,
    })
}

/// Indices ordered by remainder, largest first. The sort is stable, so equal
/// remainders stay in input order.
pub(crate) fn rank_by_remainder<T: Ord + Copy>(remainders: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..remainders.len()).collect();
    order.sort_by_key(|&index| Reverse(remainders[index]));
    order
}

/// Per-index cent corrections for a ranking. A positive deficit adds a cent to
/// the head of the ranking, a negative one removes a cent from its tail.
/// Returns `None` when the deficit exceeds the number of ranked items.
pub(crate) fn adjustments(ranking: &[usize], deficit: i64) -> Option<Vec<i64>> {
    let count = usize::try_from(deficit.unsigned_abs()).ok()?;
    if count > ranking.len() {
        return None;
    }
    let mut adjustment = vec![0i64; ranking.len()];
    if deficit > 0 {
        for &index in &ranking[..count] {
            adjustment[index] = 1;
        }
    } else if deficit < 0 {
        for &index in &ranking[ranking.len() - count..] {
            adjustment[index] = -1;
        }
    }
    Some(adjustment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(allocation: &Allocation) -> Vec<i64> {
        allocation.shares.iter().map(|s| s.cents.value()).collect()
    }

    #[test]
    fn splits_one_to_two_without_adjustment() {
        let result = allocate("dist", [("A", Cents(100)), ("B", Cents(200))], Cents(1000)).unwrap();
        assert_eq!(cents(&result), vec![333, 667]);
        assert_eq!(result.total(), Cents(1000));
    }

    #[test]
    fn equal_remainders_favour_input_order() {
        let result = allocate(
            "dist",
            [("A", Cents(100)), ("B", Cents(100)), ("C", Cents(100))],
            Cents(1000),
        )
        .unwrap();
        assert_eq!(cents(&result), vec![334, 333, 333]);
    }

    #[test]
    fn zero_weight_items_receive_nothing() {
        let result = allocate(
            "diff",
            [("A", Cents(0)), ("B", Cents(300)), ("C", Cents(0))],
            Cents(1001),
        )
        .unwrap();
        assert_eq!(cents(&result), vec![0, 1001, 0]);
    }

    #[test]
    fn rejects_degenerate_weights() {
        let err = allocate("dist", [("A", Cents(0)), ("B", Cents(0))], Cents(500)).unwrap_err();
        assert_eq!(
            err,
            AllocationError::DegenerateWeight {
                pool: "dist".into()
            }
        );
        let empty: [(&str, Cents); 0] = [];
        assert!(matches!(
            allocate("dist", empty, Cents(500)),
            Err(AllocationError::DegenerateWeight { .. })
        ));
    }

    #[test]
    fn rejects_negative_inputs() {
        assert!(matches!(
            allocate("dist", [("A", Cents(-1)), ("B", Cents(5))], Cents(10)),
            Err(AllocationError::NegativeWeight { .. })
        ));
        assert!(matches!(
            allocate("dist", [("A", Cents(1))], Cents(-10)),
            Err(AllocationError::NegativeTarget { .. })
        ));
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        assert_eq!(rank_by_remainder(&[1, 3, 1, 3]), vec![1, 3, 0, 2]);
    }

    #[test]
    fn negative_deficit_trims_the_tail() {
        let ranking = rank_by_remainder(&[5, 9, 1, 7]);
        assert_eq!(ranking, vec![1, 3, 0, 2]);
        assert_eq!(adjustments(&ranking, -2), Some(vec![-1, 0, -1, 0]));
        assert_eq!(adjustments(&ranking, 1), Some(vec![0, 1, 0, 0]));
        assert_eq!(adjustments(&ranking, 0), Some(vec![0, 0, 0, 0]));
    }

    #[test]
    fn oversized_deficit_is_refused() {
        assert_eq!(adjustments(&[0, 1], 3), None);
        assert_eq!(adjustments(&[0, 1], -3), None);
    }
}
