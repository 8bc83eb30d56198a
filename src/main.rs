//! cidr-planner - deterministic hierarchical IPv4 CIDR planner
//!
//! Reads an account/provider/region topology and a subnet-role catalog from
//! a config file, and emits a non-overlapping subnet allocation per
//! (account, provider, region, AZ, role) tuple.

use clap::Parser;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};

use cidr_planner::cli::{self, Cli};

fn init_logging() {
    if log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        return;
    }
    // No log4rs.yml in the current working directory - this tool is meant
    // to run from anywhere, not a fixed deployment, so fall back to a
    // console-only logger instead of failing to start.
    let stdout = ConsoleAppender::builder().build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(log::LevelFilter::Info))
        .expect("fallback logging config is well-formed");
    log4rs::init_config(config).expect("fallback logger failed to initialize");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    cli::run(&cli)?;
    Ok(())
}
