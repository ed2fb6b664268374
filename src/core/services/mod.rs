pub mod ventilation_service;

pub use ventilation_service::{PoolParameters, RunOutcome, RunParameters, VentilationService};
