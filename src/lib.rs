#![doc(test(attr(deny(warnings))))]

//! Commission ledger splits commission pools across the lines of a sales
//! report, to the cent, and turns the result into balanced double-entry
//! journal postings.
//!
//! ```
//! use commission_ledger::{core::allocate, currency::Cents};
//!
//! let shares = allocate(
//!     "distribution",
//!     [("A", Cents(100)), ("B", Cents(100)), ("C", Cents(100))],
//!     Cents(1000),
//! )
//! .unwrap();
//! let cents: Vec<i64> = shares.shares.iter().map(|s| s.cents.value()).collect();
//! assert_eq!(cents, vec![334, 333, 333]);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod report;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!(build = %utils::build_info::current(), "commission ledger starting");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
