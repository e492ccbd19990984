use std::fs::File;
use std::io::{BufReader, IsTerminal};
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskgenie::cli::commands::Cli;
use taskgenie::cli::shell;
use taskgenie::clock::{Clock, FixedClock, SystemClock};
use taskgenie::config::Config;
use taskgenie::error::TaskGenieError;
use taskgenie::output;
use taskgenie::session::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli_args = Cli::parse();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    let json_output = cli_args.json;

    let exit_code = match run(cli_args) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<TaskGenieError>() {
                Some(err) if json_output => println!("{}", output::json::error(err)),
                _ => eprintln!("Error: {e:#}"),
            }
            1
        }
    };

    process::exit(exit_code);
}

fn run(cli_args: Cli) -> anyhow::Result<i32> {
    let config = Config::load(cli_args.config.as_deref())?;
    let (registry, defaults) = config.build()?;

    let clock: Box<dyn Clock> = match cli_args.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };
    let mut session = Session::new(registry, defaults, clock);

    let code = match cli_args.script {
        Some(path) => {
            let file = File::open(&path)
                .map_err(|e| TaskGenieError::io(format!("Cannot open script {}: {e}", path.display())))?;
            shell::run(&mut session, BufReader::new(file), cli_args.json, false)
        }
        None => shell::run_stdin(&mut session, cli_args.json),
    }
    .context("session input failed")?;

    Ok(code)
}
