//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use apiwire::HttpLogLevel;

use crate::commands::config::ConfigArgs;
use crate::commands::request::{BodyRequestArgs, RequestArgs};

/// Explore JSON APIs from the command line.
#[derive(Parser, Debug)]
#[command(name = "apiwire")]
#[command(author, version = env!("APIWIRE_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, env = "APIWIRE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Connect/read/write timeout in seconds
    #[arg(long, env = "APIWIRE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Accept any TLS certificate and hostname
    #[arg(long, global = true)]
    pub insecure: bool,

    /// How much of each exchange to log (shown with -vv)
    #[arg(long, value_enum, global = true)]
    pub http_log: Option<HttpLogArg>,

    /// JSON configuration file (overrides the saved configuration)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a GET request
    Get(RequestArgs),

    /// Send a DELETE request
    Delete(RequestArgs),

    /// Send a POST request with a JSON body
    Post(BodyRequestArgs),

    /// Send a PUT request with a JSON body
    Put(BodyRequestArgs),

    /// Show or save the effective configuration
    Config(ConfigArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum HttpLogArg {
    None,
    Basic,
    Headers,
    Body,
}

impl From<HttpLogArg> for HttpLogLevel {
    fn from(arg: HttpLogArg) -> Self {
        match arg {
            HttpLogArg::None => HttpLogLevel::None,
            HttpLogArg::Basic => HttpLogLevel::Basic,
            HttpLogArg::Headers => HttpLogLevel::Headers,
            HttpLogArg::Body => HttpLogLevel::Body,
        }
    }
}
