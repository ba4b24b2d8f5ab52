mod cli;
mod paths;

use std::fs::{self, File};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use formguard::{FieldEvaluator, MemoryHost, Orchestrator, RuleSet};
use patient_intake::form::{gate_label, slots_in_order};
use patient_intake::review::{render, review};
use patient_intake::{AppError, Submission, load_rules};
use simplelog::{Config, WriteLogger};

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Warning: {}", e);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => {
            let Some(dir) = paths::cache_dir() else {
                return Ok(());
            };
            fs::create_dir_all(&dir).map_err(|source| AppError::Io {
                path: dir.clone(),
                source,
            })?;
            paths::rotate_logs(&dir);
            paths::log_file().unwrap_or_else(|| dir.join("latest.log"))
        }
    };

    let file = File::create(&path).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;
    WriteLogger::init(cli.level(), Config::default(), file)?;
    Ok(())
}

/// Returns whether the input was valid.
fn run(cli: &Cli) -> Result<bool, AppError> {
    let rules = Arc::new(load_rules(cli.rules.as_deref())?);

    match &cli.command {
        Command::Validate { submission } => {
            let submission = Submission::load(submission)?;
            Ok(validate(rules, &submission, false))
        }
        Command::Review { submission } => {
            let submission = Submission::load(submission)?;
            Ok(validate(rules, &submission, true))
        }
        Command::Field { field, value } => {
            let result = FieldEvaluator::new(&rules).evaluate(field, value, &MemoryHost::new())?;
            println!("value: {}", result.formatted_value);
            match &result.error {
                Some(error) => println!("error: {}", error),
                None => println!("valid"),
            }
            Ok(result.is_valid())
        }
    }
}

fn validate(rules: Arc<RuleSet>, submission: &Submission, show_review: bool) -> bool {
    let host = submission.to_host(&rules);
    let mut form = Orchestrator::new(rules, host);
    let verdict = form.validate_all();
    log::info!(
        "Validated submission: {}",
        if verdict.is_valid() { "valid" } else { "invalid" }
    );

    for slot in slots_in_order(form.rules()) {
        if let Some(error) = form.host().error(slot) {
            println!("{}: {}", slot, error);
        }
    }

    if verdict.is_valid() && show_review {
        print!("{}", render(&review(form.host(), submission)));
    }
    println!("{}", gate_label(verdict.is_valid()));
    verdict.is_valid()
}
