#![allow(dead_code)]

use chrono::NaiveDate;
use commission_ledger::{
    config::Config,
    core::services::RunParameters,
    currency::Cents,
    domain::Item,
};

/// Small deterministic generator so property checks replay identically.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

pub fn item(id: &str, sales: i64, net: i64, invoice: i64) -> Item {
    Item::new(id, Cents(sales), Cents(net), Cents(invoice)).expect("non-empty id")
}

/// Random report lines: roughly one in five weights is zero.
pub fn random_items(rng: &mut XorShift, count: usize) -> Vec<Item> {
    (0..count)
        .map(|index| {
            let mut weight = || {
                if rng.below(5) == 0 {
                    0
                } else {
                    rng.below(2_000_000) as i64
                }
            };
            let sales = weight();
            let net = weight();
            let invoice = rng.below(5_000_000) as i64;
            item(&format!("978{index:010}"), sales, net, invoice)
        })
        .collect()
}

pub fn run_parameters(distribution: Option<Cents>, diffusion: Option<Cents>) -> RunParameters {
    let config = Config::default();
    RunParameters {
        date: NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
        journal: config.journal.clone(),
        base_label: config.base_label.clone(),
        revenue_account: config.accounts.revenue.clone(),
        labels: config.labels.clone(),
        pools: config.pool_parameters(distribution, diffusion),
    }
}
