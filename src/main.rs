//! CAPES Fetcher CLI application
//!
//! Command-line interface for listing and downloading CAPES open-data
//! catalog resources.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use capes_fetcher::cli::{handle_list, handle_run, Cli, Commands, RunArgs};
use capes_fetcher::config::AppConfig;
use capes_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.as_deref()).await?;

    init_logging(&cli, &config);

    info!("CAPES Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let quiet = cli.global.quiet;
    match cli.command {
        Some(Commands::List(args)) => {
            info!("Executing list command");
            handle_list(args, &config, quiet).await
        }
        Some(Commands::Run(args)) => {
            info!("Executing run command");
            handle_run(args, &config, quiet).await
        }
        None => {
            info!("No command given, running with defaults");
            handle_run(RunArgs::default(), &config, quiet).await
        }
    }
}

/// Initialize logging from CLI verbosity, falling back to `RUST_LOG` and then
/// to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let cli_level = cli.log_level().map(|level| level.to_string().to_lowercase());
    let rust_log_set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();

    let mut filter = EnvFilter::from_default_env();
    if let Some(directive) = crate_directive(cli_level, &config.logging.level, rust_log_set) {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

/// Directive for this crate's own logs
///
/// A verbosity flag always wins. Without one, `RUST_LOG` is left alone when
/// set, and the configured level applies otherwise.
fn crate_directive(
    cli_level: Option<String>,
    config_level: &str,
    rust_log_set: bool,
) -> Option<String> {
    match cli_level {
        Some(level) => Some(format!("capes_fetcher={}", level)),
        None if rust_log_set => None,
        None => Some(format!("capes_fetcher={}", config_level)),
    }
}
