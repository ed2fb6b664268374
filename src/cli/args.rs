use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;

use crate::{
    currency::{parse_amount, parse_decimal, Cents},
    utils::build_info::LONG_VERSION,
};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Command-line arguments. Anything left unset falls back to the config file.
#[derive(Parser, Debug, Default)]
#[command(
    name = "commission_ledger",
    version,
    long_version = LONG_VERSION,
    about = "Split distribution and diffusion commissions across a sales report and export balanced journal entries"
)]
pub struct CliArgs {
    /// Sales report (CSV)
    #[arg(short = 'r', long)]
    pub report: Option<PathBuf>,

    /// Export file; stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Config file location
    #[arg(long, env = "COMMISSION_LEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Prompt for every run parameter, using current values as defaults
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Posting date (YYYY-MM-DD or DD/MM/YYYY); today when omitted
    #[arg(short = 'd', long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub journal: Option<String>,

    /// Base label of every posting
    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub revenue_account: Option<String>,

    #[arg(long)]
    pub distribution_account: Option<String>,

    #[arg(long)]
    pub diffusion_account: Option<String>,

    /// Distribution rate in percent
    #[arg(long, value_parser = parse_rate)]
    pub distribution_rate: Option<Decimal>,

    /// Diffusion rate in percent
    #[arg(long, value_parser = parse_rate)]
    pub diffusion_rate: Option<Decimal>,

    /// Distribution commission total; derived from the rate when omitted
    #[arg(long, value_parser = parse_total)]
    pub distribution_total: Option<Cents>,

    /// Diffusion commission total; derived from the rate when omitted
    #[arg(long, value_parser = parse_total)]
    pub diffusion_total: Option<Cents>,

    /// Number of preamble lines before the report header
    #[arg(long)]
    pub header_row: Option<usize>,

    /// Report column delimiter
    #[arg(long)]
    pub delimiter: Option<char>,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| format!("`{raw}` is not a date (expected YYYY-MM-DD or DD/MM/YYYY)"))
}

pub fn parse_rate(raw: &str) -> Result<Decimal, String> {
    let rate = parse_decimal(raw).ok_or_else(|| format!("`{raw}` is not a percentage"))?;
    if rate.is_sign_negative() {
        return Err(format!("rate `{raw}` is negative"));
    }
    Ok(rate)
}

pub fn parse_total(raw: &str) -> Result<Cents, String> {
    let total = parse_amount(raw).ok_or_else(|| format!("`{raw}` is not an amount"))?;
    if total.is_negative() {
        return Err(format!("total `{raw}` is negative"));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_styles() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(parse_date("2025-03-31"), Ok(expected));
        assert_eq!(parse_date("31/03/2025"), Ok(expected));
        assert!(parse_date("March 31").is_err());
    }

    #[test]
    fn parses_totals_and_rates() {
        assert_eq!(parse_total("1000"), Ok(Cents(100000)));
        assert_eq!(parse_total("12,5"), Ok(Cents(1250)));
        assert!(parse_total("-3").is_err());
        assert_eq!(parse_rate("12.5"), Ok(Decimal::new(125, 1)));
        assert_eq!(parse_rate("7,25"), Ok(Decimal::new(725, 2)));
        assert!(parse_rate("x").is_err());
    }

    #[test]
    fn accepts_minimal_invocation() {
        let args = CliArgs::try_parse_from([
            "commission_ledger",
            "--report",
            "bldd.csv",
            "--distribution-total",
            "1000.00",
        ])
        .unwrap();
        assert_eq!(args.report, Some(PathBuf::from("bldd.csv")));
        assert_eq!(args.distribution_total, Some(Cents(100000)));
        assert_eq!(args.diffusion_total, None);
        assert!(!args.interactive);
    }
}
