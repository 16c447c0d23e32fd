//! Palaver CLI and REST API entry point.
//!
//! Binary name: `palaver`
//!
//! Parses CLI arguments, resolves configuration, wires services, then
//! dispatches to the appropriate command handler or starts the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use palaver_infra::config::resolve_service_config;
use palaver_observe::tracing_setup::{
    TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing,
};
use palaver_types::config::ServiceConfig;

use cli::{Cli, Commands, HistoryCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "palaver", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_service_config(&cli.config).await;
    let state = AppState::init(&config).await?;

    run_then_close(&state, dispatch(cli, &config, &state)).await
}

/// Await `command`, then close `state` whether or not the command succeeded.
async fn run_then_close<F>(state: &AppState, command: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let result = command.await;
    state.close().await;
    result
}

async fn dispatch(cli: Cli, config: &ServiceConfig, state: &AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, "HTTP server listening");
            if !cli.quiet {
                println!(
                    "  {} Palaver API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state.clone());

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("HTTP server stopped");
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Ask { message } => {
            cli::ask::ask(state, &message, cli.json).await?;
        }

        Commands::History { action } => match action {
            HistoryCommand::List => {
                cli::history::list_messages(state, cli.json).await?;
            }
            HistoryCommand::Add { role, content } => {
                cli::history::add_message(state, &role, &content, cli.json).await?;
            }
            HistoryCommand::Clear { force } => {
                cli::history::clear_messages(state, force, cli.json).await?;
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
