mod output;

use clap::{Parser, Subcommand};
pub use output::{ColorMode, OutputFormat};
use std::path::PathBuf;

/// Compile filter expression ASTs into search engine filter queries
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Profile with compiler settings (TOML)
    #[arg(long, global = true, env = "ES_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Field handled outside the filter; comparisons on it match everything
    #[arg(long, global = true)]
    pub skip_field: Option<String>,

    /// Ignore any skip field from the profile or --skip-field
    #[arg(long, global = true)]
    pub no_skip_field: bool,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile an AST document and print the filter query
    Compile {
        /// AST document (JSON or JSON5), "-" reads stdin
        file: PathBuf,
    },
    /// List the fields a filter references and how often
    Fields {
        /// AST document (JSON or JSON5), "-" reads stdin
        file: PathBuf,
    },
}

impl Cli {
    /// Log level implied by -v/-q
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
