use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "greeter",
    version,
    about = "Greets a list of names; asks for the arguments in a terminal form"
)]
pub struct Cli {
    /// Form title (overrides `[form] title` from the config)
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Directory holding config.json5 / config.toml
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Print the collected arguments as JSON instead of greeting
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["greeter", "--title", "Hi", "--dry-run"]).unwrap();
        assert_eq!(cli.title.as_deref(), Some("Hi"));
        assert!(cli.dry_run);
        assert!(cli.config_dir.is_none());
    }
}
