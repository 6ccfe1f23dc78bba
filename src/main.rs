use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript_relay::client::{
    FileResultStore, FormController, HttpRelayClient, MemoryResultStore, ResultStore, SystemClipboard,
};
use yt_transcript_relay::utils::{extract_domain, format_elapsed};
use yt_transcript_relay::{
    output, Cli, Commands, Config, GeminiProvider, OutputFormat, RelayServer, TranscriptRelay,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().await?,
    };

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            serve(&config).await?;
        }
        Commands::Extract {
            url,
            relay,
            format,
            copy,
            no_persist,
        } => {
            let relay_url = relay.unwrap_or_else(|| config.client.relay_url.clone());
            let persist = config.client.persist_last_result && !no_persist;
            extract(&config, &relay_url, &url, &format, copy, persist, cli.quiet).await?;
        }
        Commands::Last { format } => {
            let form = saved_form(&config)?;
            match form.result() {
                Some(result) => output::print_to_console(result, &format)?,
                None => println!("No saved transcript."),
            }
        }
        Commands::Clear => {
            saved_form(&config)?.clear();
            println!("Transcript has been cleared.");
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Configuration file:");
                println!("  {}", Config::config_path()?.display());
                println!("Run with --show to print the effective configuration.");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "yt_transcript_relay=debug,tower_http=debug"
    } else {
        "yt_transcript_relay=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Controller mounted on the result file, as a reopened form would be
fn saved_form(config: &Config) -> Result<FormController> {
    let store = FileResultStore::new(config.store_path()?);
    Ok(FormController::new(
        Box::new(HttpRelayClient::new(config.client.relay_url.clone())),
        Box::new(SystemClipboard),
    )
    .with_store(Box::new(store)))
}

async fn serve(config: &Config) -> Result<()> {
    config.validate()?;

    let provider = GeminiProvider::from_config(&config.provider);
    let credentials = config.credentials();
    let relay = TranscriptRelay::new(Arc::new(provider), Arc::new(credentials));

    RelayServer::new(config.bind_addr()?, relay).run().await
}

async fn extract(
    config: &Config,
    relay_url: &str,
    url: &str,
    format: &OutputFormat,
    copy: bool,
    persist: bool,
    quiet: bool,
) -> Result<()> {
    let store: Box<dyn ResultStore> = if persist {
        Box::new(FileResultStore::new(config.store_path()?))
    } else {
        Box::new(MemoryResultStore::new())
    };

    let mut form = FormController::new(
        Box::new(HttpRelayClient::new(relay_url)),
        Box::new(SystemClipboard),
    )
    .with_store(store);
    form.set_url(url);

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    progress.set_message(format!(
        "Extracting transcript via {}...",
        extract_domain(relay_url).unwrap_or_else(|| relay_url.to_string())
    ));
    progress.enable_steady_tick(Duration::from_millis(100));

    let started = Instant::now();
    form.submit().await;
    progress.finish_and_clear();

    if let Some(error) = form.error() {
        anyhow::bail!("{}", error);
    }

    let result = form
        .result()
        .cloned()
        .context("Relay returned no transcript")?;
    output::print_to_console(&result, format)?;

    if !quiet {
        eprintln!("Extracted {} words in {}", form.word_count(), format_elapsed(started.elapsed()));
    }

    if copy {
        match form.copy() {
            Ok(()) if form.is_copied() => eprintln!("Copied to clipboard."),
            Ok(()) => {}
            Err(_) => eprintln!("{}", form.error().unwrap_or("Failed to copy to clipboard.")),
        }
    }

    Ok(())
}
