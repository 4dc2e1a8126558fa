//! brewhands - coffee ordering agent.
//!
//! Main entry point: CLI parsing, logging, and the tool-dispatch server.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use brewhands_tools_order::OrderConfig;

mod server;

/// brewhands CLI.
#[derive(Parser)]
#[command(name = "brewhands")]
#[command(about = "Coffee ordering agent: browser-driven order placement exposed as agent tools")]
#[command(version)]
struct Cli {
    /// State directory (cookie jar, favorites, logs)
    #[arg(long, default_value = ".brewhands", global = true)]
    state_dir: PathBuf,

    /// Chrome remote debugging port
    #[arg(long, default_value_t = 9222, global = true)]
    debug_port: u16,

    /// Run the browser visibly even for unattended operations
    #[arg(long, global = true)]
    headful: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tool requests over stdin/stdout (the default)
    Serve,
    /// Print the tool definitions as JSON and exit
    Tools,
}

/// Logs go to stderr and a rolling file; stdout carries the tool protocol
/// and must stay clean.
fn init_logging(state_dir: &Path) -> WorkerGuard {
    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, state_dir.join("logs"), "brewhands.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli.state_dir);

    let config = OrderConfig::default()
        .state_dir(cli.state_dir.clone())
        .debug_port(cli.debug_port)
        .headless(!cli.headful);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::run(config).await,
        Commands::Tools => server::print_tool_definitions(config).await,
    }
}
