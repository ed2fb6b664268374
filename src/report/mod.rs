//! Boundary I/O: the sales report going in and the journal export going out.

pub mod export;
pub mod reader;

pub use export::write_ledger;
pub use reader::ReportReader;
