//! Run summaries and status messages, written to stderr so the export can
//! go to stdout.

use std::fmt;

use colored::Colorize;

use crate::core::services::RunOutcome;

pub fn success(message: impl fmt::Display) {
    eprintln!("{}", format!("[ok] {message}").green());
}

pub fn warning(message: impl fmt::Display) {
    eprintln!("{}", format!("[!] {message}").yellow());
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{}", format!("Error: {message}").red().bold());
}

/// Plain-text summary lines for a finished run.
pub fn summary_lines(outcome: &RunOutcome) -> Vec<String> {
    let mut lines = vec![
        format!("Items: {}", outcome.items.len()),
        format!("Invoice total: {}", outcome.invoice_total),
    ];
    for (pool, allocation) in outcome.pools.iter().zip(&outcome.allocations) {
        lines.push(format!(
            "Pool {} ({}): target {}, allocated {}",
            pool.name,
            pool.account,
            pool.target,
            allocation.total()
        ));
    }
    lines.push(format!(
        "Postings: {} (debit {}, credit {})",
        outcome.ledger.len(),
        outcome.totals.debit,
        outcome.totals.credit
    ));
    lines
}

/// Prints the summary of a run. Only balanced ledgers reach a [`RunOutcome`].
pub fn print_summary(outcome: &RunOutcome) {
    eprintln!("{}", "=== Ventilation summary ===".bold());
    for line in summary_lines(outcome) {
        eprintln!("{line}");
    }
    success("Ledger balanced");
}
