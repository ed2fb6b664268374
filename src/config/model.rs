use chrono::format::{Item as FormatItem, StrftimeItems};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    core::{services::PoolParameters, LabelSet},
    currency::Cents,
    domain::WeightColumn,
    errors::ConfigError,
};

pub const DISTRIBUTION_POOL: &str = "distribution";
pub const DIFFUSION_POOL: &str = "diffusion";

/// Stores the defaults for every run parameter plus the report layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub journal: String,
    pub base_label: String,
    pub accounts: AccountConfig,
    pub rates: RateConfig,
    pub distribution_label: String,
    pub diffusion_label: String,
    pub labels: LabelSet,
    pub report: ReportLayout,
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal: "VT".into(),
            base_label: "VENTES BLDD".into(),
            accounts: AccountConfig::default(),
            rates: RateConfig::default(),
            distribution_label: "Com. distribution".into(),
            diffusion_label: "Com. diffusion".into(),
            labels: LabelSet::default(),
            report: ReportLayout::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Checks values that serde cannot constrain on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let accounts = [
            ("revenue", &self.accounts.revenue),
            ("distribution", &self.accounts.distribution),
            ("diffusion", &self.accounts.diffusion),
        ];
        for (name, account) in accounts {
            if account.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} account is empty")));
            }
        }
        if self.journal.trim().is_empty() {
            return Err(ConfigError::Invalid("journal code is empty".into()));
        }
        for (name, rate) in [
            ("distribution", self.rates.distribution),
            ("diffusion", self.rates.diffusion),
        ] {
            if rate.is_sign_negative() {
                return Err(ConfigError::Invalid(format!("{name} rate is negative")));
            }
        }
        for (name, delimiter) in [
            ("report", self.report.delimiter),
            ("export", self.export.delimiter),
        ] {
            if !delimiter.is_ascii() {
                return Err(ConfigError::Invalid(format!(
                    "{name} delimiter `{delimiter}` is not ASCII"
                )));
            }
        }
        let mut date_items = StrftimeItems::new(&self.export.date_format);
        if date_items.any(|item| matches!(item, FormatItem::Error)) {
            return Err(ConfigError::Invalid(format!(
                "export date format `{}` is invalid",
                self.export.date_format
            )));
        }
        Ok(())
    }

    /// Builds the two pool definitions with the given target totals.
    pub fn pool_parameters(
        &self,
        distribution_total: Option<Cents>,
        diffusion_total: Option<Cents>,
    ) -> Vec<PoolParameters> {
        vec![
            PoolParameters {
                name: DISTRIBUTION_POOL.into(),
                account: self.accounts.distribution.clone(),
                label: self.distribution_label.clone(),
                weight: WeightColumn::Sales,
                rate_percent: self.rates.distribution,
                target: distribution_total,
            },
            PoolParameters {
                name: DIFFUSION_POOL.into(),
                account: self.accounts.diffusion.clone(),
                label: self.diffusion_label.clone(),
                weight: WeightColumn::Net,
                rate_percent: self.rates.diffusion,
                target: diffusion_total,
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccountConfig {
    pub revenue: String,
    pub distribution: String,
    pub diffusion: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            revenue: "70110000".into(),
            distribution: "62280000".into(),
            diffusion: "62280001".into(),
        }
    }
}

/// Commission rates, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RateConfig {
    pub distribution: Decimal,
    pub diffusion: Decimal,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            distribution: Decimal::new(125, 1),
            diffusion: Decimal::new(90, 1),
        }
    }
}

/// Where the relevant columns live in the sales report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportLayout {
    /// Number of preamble lines before the header row.
    pub header_row: usize,
    pub delimiter: char,
    pub id_column: String,
    pub sales_column: String,
    pub net_column: String,
    pub invoice_column: String,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            header_row: 9,
            delimiter: ',',
            id_column: "ISBN".into(),
            sales_column: "Vente".into(),
            net_column: "Net".into(),
            invoice_column: "Facture".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub date_format: String,
    pub delimiter: char,
    pub decimal_separator: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".into(),
            delimiter: ',',
            decimal_separator: '.',
        }
    }
}
