//! Taskwise CLI - Command-line interface for the task-understanding engine.

use clap::Parser;
use taskwise_cli::commands;
use taskwise_cli::{Cli, Command, Config, Formatter};
use taskwise_engine::EngineContext;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> taskwise_cli::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(mode) = cli.provider {
        config.engine.engine.provider_mode = mode;
    }
    debug!(
        "Provider mode {}, order {:?}",
        config.engine.engine.provider_mode, config.engine.engine.provider_order
    );

    let format = cli.format.map(Into::into).unwrap_or(config.cli.format);
    let color_enabled = !cli.no_color && config.cli.color;
    let formatter = Formatter::new(format, color_enabled);

    let context = EngineContext::from_config(config.engine.clone())?;
    let orchestrator = context.orchestrator();

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &orchestrator, &formatter).await,
        Command::Tags(args) => commands::execute_tags(args, &orchestrator, &formatter).await,
        Command::Breakdown(args) => {
            commands::execute_breakdown(args, &orchestrator, &formatter).await
        }
        Command::Priority(args) => {
            commands::execute_priority(args, &orchestrator, &formatter).await
        }
        Command::Providers => commands::execute_providers(&context, &formatter),
        Command::Config => commands::execute_config(&config),
    }
}
