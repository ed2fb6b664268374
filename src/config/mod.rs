//! Run defaults and their JSON persistence.

pub mod manager;
pub mod model;

pub use manager::ConfigManager;
pub use model::{AccountConfig, Config, ExportConfig, RateConfig, ReportLayout};
