use std::result::Result as StdResult;

use thiserror::Error;

use crate::{currency::Cents, domain::Side};

/// Failures raised while splitting a pool across items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("pool `{pool}`: no item carries a positive weight, proportional allocation is undefined")]
    DegenerateWeight { pool: String },
    #[error("pool `{pool}`: item `{item}` has negative weight {weight}")]
    NegativeWeight {
        pool: String,
        item: String,
        weight: Cents,
    },
    #[error("pool `{pool}`: target total {target} is negative")]
    NegativeTarget { pool: String, target: Cents },
    #[error("pool `{pool}`: cent adjustment of {deficit} exceeds the {items} allocated items")]
    AllocationOverflow {
        pool: String,
        deficit: i64,
        items: usize,
    },
}

/// Failures raised while assembling or validating posting lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    #[error("pool `{pool}`: per-item postings sum to {actual}, expected {expected}")]
    PoolTotalMismatch {
        pool: String,
        expected: Cents,
        actual: Cents,
    },
    #[error("pool `{pool}`: allocation covers {allocated} items but the report holds {items}")]
    ItemCountMismatch {
        pool: String,
        allocated: usize,
        items: usize,
    },
    #[error("pool `{pool}`: share {index} belongs to `{found}`, expected `{expected}`")]
    ItemMismatch {
        pool: String,
        index: usize,
        expected: String,
        found: String,
    },
    #[error("account `{account}`: amounts overflow the cent range")]
    AmountOverflow { account: String },
    #[error("ledger {side} total overflows the cent range")]
    TotalOverflow { side: Side },
    #[error("ledger is unbalanced: debit={debit}, credit={credit}")]
    LedgerImbalance { debit: Cents, credit: Cents },
}

/// Failures raised while reading a sales report or writing the export.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("report has no header row after skipping {0} lines")]
    MissingHeader(usize),
    #[error("report header is missing column `{0}`")]
    MissingColumn(String),
    #[error("invalid export date format `{0}`")]
    InvalidDateFormat(String),
}

/// Failures raised while loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Unified error for a full ventilation run.
#[derive(Debug, Error)]
pub enum CommissionError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Posting(#[from] PostingError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, CommissionError>;

impl From<std::io::Error> for CommissionError {
    fn from(err: std::io::Error) -> Self {
        CommissionError::Report(ReportError::Io(err))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CommissionError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Core(CommissionError::from(err))
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        CliError::Core(CommissionError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(CommissionError::from(err))
    }
}
