//! Command-line front end: config + flags in, CSV journal out.

pub mod args;
pub mod output;
pub mod prompts;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use chrono::Local;
use clap::Parser;
use tracing::info;

use crate::{
    config::{Config, ConfigManager},
    core::services::{RunOutcome, RunParameters, VentilationService},
    errors::{CliError, CommissionError},
    report::{write_ledger, ReportReader},
};

pub use args::CliArgs;
pub use prompts::{DialoguerPrompter, ParameterPrompter, RunAnswers};

/// Parses the process arguments and runs them against the terminal.
pub fn run_cli() -> Result<(), CliError> {
    let args = CliArgs::parse();
    let mut prompter = DialoguerPrompter::new();
    execute(args, &mut prompter).map(|_| ())
}

/// Runs one invocation. Returns the outcome when a ledger was produced.
pub fn execute(
    args: CliArgs,
    prompter: &mut dyn ParameterPrompter,
) -> Result<Option<RunOutcome>, CliError> {
    let manager = match &args.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::with_default_path(),
    };

    if args.init_config {
        init_config(&manager)?;
        return Ok(None);
    }

    let mut config = manager.load()?;
    apply_overrides(&args, &mut config);
    config.validate()?;

    let mut answers = RunAnswers {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        distribution_total: args.distribution_total,
        diffusion_total: args.diffusion_total,
    };
    if args.interactive {
        answers = prompts::collect(prompter, &mut config, answers)?;
    }

    let report = args
        .report
        .as_deref()
        .ok_or_else(|| CliError::Input("--report is required".into()))?;
    let items = ReportReader::new(&config.report).read_path(report)?;
    if items.is_empty() {
        return Err(CommissionError::InvalidInput(format!(
            "{} holds no item with an identifier",
            report.display()
        ))
        .into());
    }

    let params = RunParameters {
        date: answers.date,
        journal: config.journal.clone(),
        base_label: config.base_label.clone(),
        revenue_account: config.accounts.revenue.clone(),
        labels: config.labels.clone(),
        pools: config.pool_parameters(answers.distribution_total, answers.diffusion_total),
    };
    let outcome = VentilationService::run(items, &params)?;

    match &args.output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            export(file, &outcome, &config)?;
            info!(path = %path.display(), "journal exported");
        }
        None => export(io::stdout().lock(), &outcome, &config)?,
    }

    output::print_summary(&outcome);
    Ok(Some(outcome))
}

fn export<W: Write>(writer: W, outcome: &RunOutcome, config: &Config) -> Result<(), CliError> {
    write_ledger(writer, &outcome.ledger, &config.export)?;
    Ok(())
}

fn init_config(manager: &ConfigManager) -> Result<(), CliError> {
    let path: &Path = manager.config_path();
    if path.exists() {
        output::warning(format!("{} already exists, left untouched", path.display()));
        return Ok(());
    }
    manager.save(&Config::default())?;
    output::success(format!("Default configuration written to {}", path.display()));
    Ok(())
}

fn apply_overrides(args: &CliArgs, config: &mut Config) {
    let strings = [
        (&args.journal, &mut config.journal),
        (&args.label, &mut config.base_label),
        (&args.revenue_account, &mut config.accounts.revenue),
        (&args.distribution_account, &mut config.accounts.distribution),
        (&args.diffusion_account, &mut config.accounts.diffusion),
    ];
    for (value, slot) in strings {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }
    if let Some(rate) = args.distribution_rate {
        config.rates.distribution = rate;
    }
    if let Some(rate) = args.diffusion_rate {
        config.rates.diffusion = rate;
    }
    if let Some(header_row) = args.header_row {
        config.report.header_row = header_row;
    }
    if let Some(delimiter) = args.delimiter {
        config.report.delimiter = delimiter;
    }
}
