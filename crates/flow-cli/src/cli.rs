use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flowtb",
    about = "Flow traceback: reconstruct demand paths from a supply-chain ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Trace a dataset and write its output sheet
    Trace(RunArgs),
    /// Trace a dataset and print the reconstructed paths
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// TOML config file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Input workbook directory
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Output workbook directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Dataset number selecting the input and output sheets
    #[arg(short, long)]
    pub dataset: Option<u32>,
    /// Dump the path store after every transaction (with --verbose)
    #[arg(long)]
    pub trace_paths: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub run: RunArgs,
    /// Print the raw path store instead of formatted records
    #[arg(long)]
    pub store: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trace() {
        let cli = Cli::try_parse_from(["flowtb", "trace"]).unwrap();
        if let Command::Trace(args) = cli.command {
            assert!(args.config.is_none());
            assert!(args.dataset.is_none());
            assert!(!args.trace_paths);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_trace_overrides() {
        let cli = Cli::try_parse_from([
            "flowtb", "trace", "-i", "ledger", "--output", "out", "-d", "3", "--trace-paths",
        ])
        .unwrap();
        if let Command::Trace(args) = cli.command {
            assert_eq!(args.input, Some(PathBuf::from("ledger")));
            assert_eq!(args.output, Some(PathBuf::from("out")));
            assert_eq!(args.dataset, Some(3));
            assert!(args.trace_paths);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show_store() {
        let cli = Cli::try_parse_from(["flowtb", "show", "--config", "ft.toml", "--store"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert!(args.store);
            assert_eq!(args.run.config, Some(PathBuf::from("ft.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["flowtb", "--verbose", "trace"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["flowtb", "show", "--format", "json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn rejects_bad_dataset() {
        assert!(Cli::try_parse_from(["flowtb", "trace", "-d", "two"]).is_err());
    }
}
