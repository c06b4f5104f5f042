//! gh2npm - package GitHub release binaries for npm
//!
//! This is the CLI application that drives the release pipeline through
//! the ops crate: resolve releases, stage their assets and invoke
//! npm-binary-releaser once per release.

mod cli;
mod error;
mod events;

use crate::cli::Cli;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use gh2npm_config::RunConfig;
use gh2npm_events::EventReceiver;
use gh2npm_github::GithubClient;
use gh2npm_net::NetClient;
use gh2npm_ops::{OpsContextBuilder, OpsCtx, RunReport};
use std::process;
use tokio::select;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    init_tracing(json_mode, cli.debug);

    if let Err(e) = run(cli).await {
        error!("run failed: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting gh2npm v{}", env!("CARGO_PKG_VERSION"));

    // File config first, then run-time overrides from CLI flags
    let mut config = RunConfig::load(&cli.config).await?;
    config.tag = cli.tag.clone();
    config.publish = cli.publish;
    config.validate()?;

    let token = RunConfig::github_token();
    if token.is_none() {
        warn!("GITHUB_TOKEN not set; using unauthenticated API rate limits");
    }

    let net = NetClient::with_defaults()?;
    let github = GithubClient::new(net.clone(), token);
    let (tx, rx) = gh2npm_events::channel();

    let ctx = OpsContextBuilder::new()
        .with_config(config)
        .with_net(net)
        .with_github(github)
        .with_event_sender(tx)
        .build()?;

    let mut handler = EventHandler::new(cli.debug);
    let report = execute_with_events(&ctx, rx, &mut handler, cli.json).await?;

    render_report(&report, cli.json)?;

    info!("Run completed successfully");
    Ok(())
}

/// Drive the pipeline while rendering its events concurrently
async fn execute_with_events(
    ctx: &OpsCtx,
    mut rx: EventReceiver,
    handler: &mut EventHandler,
    json_mode: bool,
) -> Result<RunReport, CliError> {
    let mut run_future = Box::pin(gh2npm_ops::run(ctx));

    loop {
        select! {
            result = &mut run_future => {
                // Drain whatever the pipeline emitted before finishing
                while let Ok(event) = rx.try_recv() {
                    if !json_mode {
                        handler.handle_event(event);
                    }
                }
                handler.finish();
                return result.map_err(Into::into);
            }
            event = rx.recv() => {
                if let Some(event) = event {
                    if !json_mode {
                        handler.handle_event(event);
                    }
                }
            }
        }
    }
}

/// Render the final run report to stdout
fn render_report(report: &RunReport, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    match report.versions.as_slice() {
        [] => println!("No releases to package."),
        versions => {
            for version in versions {
                println!("Packaged version {version}");
            }
        }
    }
    if report.dry_run {
        println!("Dry run: nothing was published.");
    }
    Ok(())
}

fn init_tracing(json_mode: bool, debug: bool) {
    if json_mode {
        // JSON mode: keep stderr clean for the report consumer
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter(EnvFilter::new("off"))
            .init();
        return;
    }

    let default_filter = if debug { "gh2npm=debug,info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
