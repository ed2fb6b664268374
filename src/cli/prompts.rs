//! Interactive collection of run parameters.

use dialoguer::{theme::ColorfulTheme, Input};
use rust_decimal::Decimal;

use crate::{
    cli::args::{parse_date, parse_rate, parse_total},
    config::Config,
    currency::Cents,
    errors::CliError,
};

/// Source of free-text answers. The terminal implementation uses dialoguer;
/// tests script the answers.
pub trait ParameterPrompter {
    fn text(&mut self, prompt: &str, default: &str) -> Result<String, CliError>;
}

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterPrompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str, default: &str) -> Result<String, CliError> {
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }
}

/// Values gathered for one run, before pools are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RunAnswers {
    pub date: chrono::NaiveDate,
    pub distribution_total: Option<Cents>,
    pub diffusion_total: Option<Cents>,
}

/// Asks for every run parameter, writing string settings back into `config`.
/// An empty total means "derive from the rate".
pub fn collect(
    prompter: &mut dyn ParameterPrompter,
    config: &mut Config,
    answers: RunAnswers,
) -> Result<RunAnswers, CliError> {
    let date_default = answers.date.format("%Y-%m-%d").to_string();
    let date = parse_date(&prompter.text("Posting date", &date_default)?).map_err(CliError::Input)?;

    config.journal = prompter.text("Journal", &config.journal)?;
    config.base_label = prompter.text("Label", &config.base_label)?;
    config.accounts.revenue = prompter.text("Revenue account", &config.accounts.revenue)?;
    config.accounts.distribution = prompter.text(
        "Distribution commission account",
        &config.accounts.distribution,
    )?;
    config.accounts.diffusion =
        prompter.text("Diffusion commission account", &config.accounts.diffusion)?;
    config.rates.distribution =
        ask_rate(prompter, "Distribution rate (%)", config.rates.distribution)?;
    config.rates.diffusion = ask_rate(prompter, "Diffusion rate (%)", config.rates.diffusion)?;

    let distribution_total = ask_total(
        prompter,
        "Distribution commission total",
        answers.distribution_total,
    )?;
    let diffusion_total =
        ask_total(prompter, "Diffusion commission total", answers.diffusion_total)?;

    config.validate()?;
    Ok(RunAnswers {
        date,
        distribution_total,
        diffusion_total,
    })
}

fn ask_rate(
    prompter: &mut dyn ParameterPrompter,
    prompt: &str,
    current: Decimal,
) -> Result<Decimal, CliError> {
    parse_rate(&prompter.text(prompt, &current.to_string())?).map_err(CliError::Input)
}

fn ask_total(
    prompter: &mut dyn ParameterPrompter,
    prompt: &str,
    current: Option<Cents>,
) -> Result<Option<Cents>, CliError> {
    let default = current.map(|total| total.to_string()).unwrap_or_default();
    let answer = prompter.text(prompt, &default)?;
    if answer.is_empty() {
        return Ok(None);
    }
    parse_total(&answer).map(Some).map_err(CliError::Input)
}
