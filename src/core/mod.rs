pub mod allocator;
pub mod ledger_builder;
pub mod services;

pub use allocator::allocate;
pub use ledger_builder::{LabelSet, LedgerBuilder, PostingMeta};
