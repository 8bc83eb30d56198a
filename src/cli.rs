//! Command-line interface: argument parsing and the top-level run loop.
//!
//! Thin by design — it wires `config::load_input_record` into
//! `allocator::generate` into `output`, and exists so the crate is runnable
//! as a real tool rather than just a library.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::allocator;
use crate::config;
use crate::error::Result;
use crate::output;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    fn as_hint(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

/// Deterministic hierarchical IPv4 CIDR planner.
#[derive(Debug, Parser)]
#[command(name = "cidr-planner", version, about)]
pub struct Cli {
    /// Path to the input record (JSON or YAML).
    #[arg(long)]
    pub config: PathBuf,

    /// Optional CSV destination; a colored terminal summary is printed
    /// instead when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override extension-based format sniffing.
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all but warnings and errors.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Effective `log::LevelFilter` implied by `-v`/`-q`, layered onto
    /// whatever `log4rs.yml` configured as the baseline.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Warn;
        }
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Run the planner end to end: load config, allocate, emit output.
pub fn run(cli: &Cli) -> Result<()> {
    log::set_max_level(cli.log_level());
    log::info!("loading config from {}", cli.config.display());

    let input = match &cli.format {
        Some(format) => {
            let text = std::fs::read_to_string(&cli.config).map_err(|e| crate::error::PlannerError::Io {
                path: cli.config.display().to_string(),
                source: e,
            })?;
            config::parse_input_record_str(&text, Some(format.as_hint()))?
        }
        None => config::load_input_record(&cli.config)?,
    };

    log::info!(
        "parsed input: {} account(s), {} subnet role(s)",
        input.accounts.len(),
        input.subnet_types.len()
    );

    let records = allocator::generate(&input)?;
    log::info!("generated {} allocation record(s)", records.len());

    match &cli.output {
        Some(path) => {
            output::write_csv(path, &records)?;
            log::info!("wrote CSV output to {}", path.display());
        }
        None => output::print_summary(&records),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_minimal_args() {
        let cli = Cli::parse_from(["cidr-planner", "--config", "plan.json"]);
        assert_eq!(cli.config, PathBuf::from("plan.json"));
        assert!(cli.output.is_none());
        assert_eq!(cli.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn verbose_and_quiet_adjust_level() {
        let cli = Cli::parse_from(["cidr-planner", "--config", "plan.json", "-vv"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Trace);

        let cli = Cli::parse_from(["cidr-planner", "--config", "plan.json", "-q"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }
}
