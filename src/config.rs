//! Command-line and environment configuration

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Storefront catalog, cart and model-context tool server", version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,

    /// Log output format
    #[arg(
        long,
        env = "STOREFRONT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    pub log_format: LogFormat,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Write the seed catalog to a file, replacing its contents
    Seed(SeedArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "STOREFRONT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "STOREFRONT_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory for persisted carts; carts stay in memory when unset
    #[arg(short, long, env = "STOREFRONT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Catalog JSON file; the built-in seed set is used when unset
    #[arg(short, long, env = "STOREFRONT_CATALOG")]
    pub catalog: Option<PathBuf>,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Root directory for per-session cart files
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join("sessions"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Catalog file to write
    #[arg(short, long, env = "STOREFRONT_CATALOG", default_value = "catalog.json")]
    pub out: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_rust=info,storefront=info".into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
