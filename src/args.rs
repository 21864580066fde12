use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Class expression parser CLI - inspects Tailwind-style class strings with
/// variant groups, important markers and arbitrary values
#[derive(Parser, Debug)]
#[command(name = "twin-parser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten an expression into items and structural errors
    Spread(QueryArgs),
    /// Resolve the element strictly under an offset
    Hover(PositionArgs),
    /// Resolve the completion context at an offset
    Suggest(PositionArgs),
    /// Check files for unterminated, empty and unrecognised constructs
    Check(CheckArgs),
}

/// Options shared by every command that builds a parser
#[derive(Args, Debug, Clone, Default)]
pub struct ParserArgs {
    /// Variant separator
    #[arg(
        short = 's',
        long = "separator",
        value_name = "SEP",
        help = "Separator between a variant and its body (overrides the config file)"
    )]
    pub separator: Option<String>,

    /// Configuration file path (YAML or JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to a parser configuration file (.yaml, .yml or .json)"
    )]
    pub config: Option<PathBuf>,
}

/// Arguments for the spread command
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Expression text; read from stdin when omitted
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Pretty-print the JSON output
    #[arg(long = "pretty", default_value_t = false)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose", default_value_t = false, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Arguments for the hover and suggest commands
#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Byte offset into the expression
    #[arg(short = 'p', long = "position", value_name = "OFFSET")]
    pub position: usize,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Input file patterns (glob patterns supported)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATTERN",
        required = true,
        num_args = 1..,
        help = "Input file patterns; each file is checked as one class expression"
    )]
    pub input: Vec<String>,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 0..,
        help = "Patterns to exclude from checking"
    )]
    pub exclude: Vec<String>,

    /// Report file path (JSON)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path where the JSON report will be written (stdout when omitted)"
    )]
    pub output: Option<PathBuf>,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Spread(args) => args.verbose,
            Commands::Hover(args) | Commands::Suggest(args) => args.query.verbose,
            Commands::Check(args) => args.verbose,
        }
    }
}

impl CheckArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("At least one input pattern must be provided".to_string());
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hover_command() {
        let cli = Cli::try_parse_from(["twin-parser", "hover", "hover:flex", "--position", "7"]).unwrap();
        match cli.command {
            Commands::Hover(args) => {
                assert_eq!(args.position, 7);
                assert_eq!(args.query.text.as_deref(), Some("hover:flex"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "twin-parser", "check", "-i", "a/*.txt", "b/*.txt", "-e", "a/skip.txt", "-j", "2", "-s", "_",
        ])
        .unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.input.len(), 2);
                assert_eq!(args.exclude, vec!["a/skip.txt"]);
                assert_eq!(args.jobs, Some(2));
                assert_eq!(args.parser.separator.as_deref(), Some("_"));
                assert!(args.validate().is_ok());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let cli = Cli::try_parse_from(["twin-parser", "check", "-i", "*.txt", "-j", "0"]).unwrap();
        let Commands::Check(args) = cli.command else { panic!("expected check") };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_position_is_required() {
        assert!(Cli::try_parse_from(["twin-parser", "suggest", "flex"]).is_err());
    }
}
