//! APIHawk - Main Entry Point
//!
//! Parses the command line, loads settings, wires the reqwest executor and
//! the wordlist into the discovery engine and prints the report. Logs go to
//! stderr; the report is the only thing written to stdout.

mod cli;
mod output;

use std::sync::Arc;

use anyhow::Context;
use apihawk_application::{CancellationToken, DiscoverEndpoints};
use apihawk_infrastructure::{FileWordlist, ReqwestProbeExecutor, SettingsFile, TracingObserver};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, FuzzArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,apihawk=debug,apihawk_infrastructure=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Fuzz(args) => fuzz(args).await,
    }
}

async fn fuzz(args: FuzzArgs) -> anyhow::Result<()> {
    let loader = SettingsFile::new();
    let mut settings = match &args.config {
        Some(path) => loader.load(path).await?,
        None => loader.load_default().await?,
    };
    args.apply(&mut settings);

    let proxy = args.proxy();
    let executor = ReqwestProbeExecutor::new(&settings, proxy.as_slice())
        .context("failed to set up the HTTP client")?;
    let engine =
        DiscoverEndpoints::new(Arc::new(executor)).with_observer(Arc::new(TracingObserver));

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing with partial results");
            interrupt.cancel();
        }
    });

    let wordlist = FileWordlist::new(&args.wordlist);
    let format = args.format;
    let input = args.into_input(settings);
    tracing::info!(
        target_url = %input.target,
        method = %input.method,
        wordlist = %wordlist.path().display(),
        concurrency = input.settings.concurrency,
        "starting discovery"
    );

    let report = engine
        .execute_with_cancellation(input, &wordlist, token.receiver())
        .await?;
    print!("{}", output::render(&report, format)?);
    Ok(())
}
