use clap::Parser;

mod commands;
mod error;
mod http;
mod logging;

use commands::cli;
use error::{CliError, EXIT_ERROR};
use finguard_core::api::AppConfig;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e.report());
            EXIT_ERROR
        }
    };
    if code != 0 {
        std::process::exit(code);
    }
}

/// Runs one command; the log guard is dropped (and flushed) before returning.
async fn run(args: cli::Args) -> Result<i32, CliError> {
    let cfg = load_config(&args)?;
    let _log_guard = logging::init_tracing(&cfg.logging, args.log_level.as_deref());
    dispatch(args.command, &cfg).await
}

fn load_config(args: &cli::Args) -> Result<AppConfig, CliError> {
    let cfg = match args.config.as_deref() {
        Some(path) => finguard_core::config::load_from(path)?,
        None => finguard_core::config::load_default()?,
    };
    Ok(cfg)
}

async fn dispatch(cmd: cli::Commands, cfg: &AppConfig) -> Result<i32, CliError> {
    match cmd {
        cli::Commands::Ask(a) => commands::ask::handle_ask(a, cfg).await,
        cli::Commands::Provision(p) => commands::policy::handle_provision(p, cfg).await,
        cli::Commands::Validate(m) => commands::policy::handle_validate(m),
        cli::Commands::Model(m) => commands::policy::handle_model(m),
        cli::Commands::Serve(s) => commands::serve::handle_serve(s, cfg).await,
    }
}
