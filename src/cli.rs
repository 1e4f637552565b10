use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loadline")]
#[command(version)]
#[command(about = "Timeline viewer for scene, asset and mod load traces", long_about = None)]
pub struct Cli {
    /// Event log to open [default: <temp dir>/loadTimings.json]
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Print the transformed events as JSON instead of opening the viewer
    #[arg(long)]
    pub dump: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
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
    fn input_defaults_to_none() {
        let cli = Cli::parse_from(["loadline"]);
        assert!(cli.input.is_none());
        assert!(!cli.dump);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn flags_and_path() {
        let cli = Cli::parse_from(["loadline", "-vv", "--dump", "trace.json"]);
        assert_eq!(cli.input, Some(PathBuf::from("trace.json")));
        assert!(cli.dump);
        assert_eq!(cli.log_filter(), "debug");
    }
}
