mod cli;
mod config;
mod errors;
mod greet;
mod logging;

use std::io;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use guinputs::{App, RunOutcome};
use terminal::TerminalToolkit;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::greet::Greeting;

const DEFAULT_TITLE: &str = "GUInputs Test";

fn main() -> Result<()> {
    errors::init()?;
    let args = Cli::parse();
    let config = Config::new(args.config_dir.as_deref())?;
    let _log_guard = logging::init(&config)?;
    if config.sources.is_empty() {
        warn!("No configuration file found, using defaults");
    }

    let title = args
        .title
        .or_else(|| config.form.title.clone())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let dry_run = args.dry_run;

    let mut app = App::new();
    app.register(Some(&title), &Greeting::signature(), move |arguments| {
        if dry_run {
            println!("{}", serde_json::to_string_pretty(&arguments)?);
            return Ok(());
        }
        Greeting::from_arguments(&arguments)?.write_to(&mut io::stdout().lock())?;
        Ok(())
    })?;

    let mut toolkit = TerminalToolkit::new(config.terminal.clone());
    let outcome = app.run(&mut toolkit).map_err(|err| eyre!("{err:#}"))?;
    if outcome == RunOutcome::Dismissed {
        info!("form closed without submitting");
    }
    Ok(())
}
