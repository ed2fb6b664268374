//! Serializes a ledger as an importable CSV journal.

use std::{fmt::Write as _, io::Write};

use csv::WriterBuilder;
use serde::Serialize;

use crate::{config::ExportConfig, domain::Ledger, errors::ReportError};

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Journal")]
    journal: &'a str,
    #[serde(rename = "Compte")]
    account: &'a str,
    #[serde(rename = "Libelle")]
    label: &'a str,
    #[serde(rename = "ISBN")]
    item_ref: &'a str,
    #[serde(rename = "Débit")]
    debit: String,
    #[serde(rename = "Crédit")]
    credit: String,
}

/// Writes every posting line of `ledger`, in ledger order, with a header row.
pub fn write_ledger<W: Write>(
    writer: W,
    ledger: &Ledger,
    config: &ExportConfig,
) -> Result<(), ReportError> {
    let mut csv = WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .from_writer(writer);

    let mut date = String::new();
    for line in ledger.lines() {
        date.clear();
        write!(date, "{}", line.date.format(&config.date_format))
            .map_err(|_| ReportError::InvalidDateFormat(config.date_format.clone()))?;
        csv.serialize(ExportRow {
            date: &date,
            journal: &line.journal,
            account: &line.account,
            label: &line.label,
            item_ref: line.item_ref.as_deref().unwrap_or_default(),
            debit: line.debit.format_with(config.decimal_separator),
            credit: line.credit.format_with(config.decimal_separator),
        })?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        currency::Cents,
        domain::{PostingLine, Side},
    };

    fn ledger() -> Ledger {
        let date = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        Ledger::new(vec![
            PostingLine::new(
                Side::Debit,
                date,
                "VT",
                "70110000",
                "VENTES - CA global".into(),
                None,
                Cents(1234),
            ),
            PostingLine::new(
                Side::Credit,
                date,
                "VT",
                "70110000",
                "VENTES - CA ISBN".into(),
                Some("9781".into()),
                Cents(1234),
            ),
        ])
    }

    #[test]
    fn writes_header_and_rows() {
        let mut out = Vec::new();
        write_ledger(&mut out, &ledger(), &ExportConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Journal,Compte,Libelle,ISBN,Débit,Crédit");
        assert_eq!(lines[1], "28/02/2025,VT,70110000,VENTES - CA global,,12.34,0.00");
        assert_eq!(lines[2], "28/02/2025,VT,70110000,VENTES - CA ISBN,9781,0.00,12.34");
    }

    #[test]
    fn honours_decimal_comma_and_semicolons() {
        let config = ExportConfig {
            delimiter: ';',
            decimal_separator: ',',
            date_format: "%Y-%m-%d".into(),
        };
        let mut out = Vec::new();
        write_ledger(&mut out, &ledger(), &config).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("2025-02-28;VT;70110000;VENTES - CA global;;12,34;0,00"));
    }
}
