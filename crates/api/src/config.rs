//! Service configuration and command line arguments.

use crate::format::TextStyle;
use crate::logging::LogFormat;
use clap::Parser;
use raqp_query::context::DEFAULT_MAX_ROWS;
use raqp_query::ExecutionContext;
use std::path::PathBuf;
use tracing::Level;

/// Settings shared by every request a service handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Most rows any single operator may produce. `None` disables the limit.
    pub max_rows: Option<usize>,
    pub text_style: TextStyle,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_rows: Some(DEFAULT_MAX_ROWS),
            text_style: TextStyle::default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = text_style;
        self
    }

    /// Returns the execution limits for one query.
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new().with_max_rows(self.max_rows)
    }
}

/// Runs relational algebra queries against a catalog of relations.
///
/// Log filtering can be overridden with `RAQP_LOG` directives, e.g.
/// `RAQP_LOG=raqp_query=debug`.
#[derive(Debug, Parser)]
#[clap(name = "raqp")]
#[clap(version)]
#[clap(about = "Relational algebra query processor", long_about = None)]
pub struct Args {
    /// File of relation definitions to load as the catalog.
    #[arg(short, long, env = "RAQP_CATALOG", value_parser)]
    pub catalog: Option<PathBuf>,

    /// Most rows any single operator may produce. Zero disables the limit.
    #[arg(long, env = "RAQP_MAX_ROWS", default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// How the text of each response is written.
    #[arg(long, env = "RAQP_TEXT_STYLE", value_enum, default_value_t = TextStyle::Summary)]
    pub text_style: TextStyle,

    /// Log verbosity. Repeat for more detail.
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Format of log output.
    #[arg(long, env = "RAQP_LOG_FORMAT", value_enum, default_value_t = LogFormat::HumanReadable)]
    pub log_format: LogFormat,

    /// Read one JSON request per line from stdin and write one JSON response
    /// per line.
    #[arg(long, conflicts_with = "queries")]
    pub stdin: bool,

    /// Check queries and report their columns without evaluating them.
    #[arg(long)]
    pub validate: bool,

    /// Queries to execute.
    #[clap(trailing_var_arg = true)]
    pub queries: Vec<String>,
}

impl Args {
    /// Returns the service configuration the arguments describe.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_rows: (self.max_rows > 0).then_some(self.max_rows),
            text_style: self.text_style,
        }
    }

    /// Returns the most verbose level that is logged.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
