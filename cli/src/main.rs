//! CLI entrypoint for Readable Explainer
//!
//! This is the main binary that wires together all layers using
//! dependency injection: the Relay (use case + Gemini gateway + settings
//! store) listens on an in-process bus, and the Presenter talks to it
//! through that bus while drawing on the terminal.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use explainer_application::{Dispatcher, ExplainTextUseCase, SettingsStore};
use explainer_domain::PageContext;
use explainer_infrastructure::{
    ConfigLoader, FileConfig, FileSettingsStore, GeminiGateway, LocalMessageBus, validate_settings,
};
use explainer_presentation::{
    Cli, Command, ConfigAction, ConsoleFormatter, ExplainArgs, Presenter, PresenterOutcome,
    PresenterSettings, TerminalSurface,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting Readable Explainer");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            warn!("Invalid configuration: {}", issue);
        }
        let details: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        bail!("Invalid configuration:\n  {}", details.join("\n  "));
    }

    let store = FileSettingsStore::default_location()
        .context("Could not determine the platform config directory")?;
    debug!("Settings file: {}", store.path().display());

    match cli.command {
        Some(Command::Explain(args)) => run_explain(args, &config, store).await,
        Some(Command::Config { action }) => {
            run_config(action, store).await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Install the subscriber: stderr always, plus a file when requested.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

async fn run_explain(
    args: ExplainArgs,
    config: &FileConfig,
    store: FileSettingsStore,
) -> Result<ExitCode> {
    let text = if args.text == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read text from stdin")?;
        buffer
    } else {
        args.text.clone()
    };

    // === Dependency Injection ===
    // Relay side: settings store + Gemini gateway behind the use case
    let gateway = GeminiGateway::from_config(config).map_err(|e| anyhow!(e.user_message()))?;
    let use_case = Arc::new(ExplainTextUseCase::new(Arc::new(store), Arc::new(gateway)));

    let streaming = config.presenter.stream && !args.no_stream;
    let bus = LocalMessageBus::default();
    let shutdown = CancellationToken::new();
    let relay = tokio::spawn(bus.listener.run(use_case, streaming, shutdown.clone()));

    // Presenter side: dispatcher over the bus + terminal surface
    let dispatcher = Dispatcher::new(Arc::new(bus.channel))
        .with_timeout(Duration::from_secs(config.presenter.timeout_secs));
    let settings = PresenterSettings {
        typing_interval: Duration::from_millis(config.presenter.typing_interval_ms),
        reveal: args.reveal,
        reveal_chars_per_tick: config.presenter.reveal_chars_per_tick,
        reveal_tick: Duration::from_millis(config.presenter.reveal_tick_ms),
    };
    let presenter = Presenter::new(dispatcher, Box::new(TerminalSurface::stdout()), settings);
    presenter
        .set_page_context(PageContext::new(args.title.clone(), args.url.clone()))
        .await;

    let mut pushes = bus.pushes;
    let push_presenter = presenter.clone();
    let push_loop = tokio::spawn(async move {
        while let Some(push) = pushes.recv().await {
            push_presenter.on_push(push.session, push.message).await;
        }
    });

    let outcome = tokio::select! {
        outcome = presenter.explain(&text) => outcome,
        _ = tokio::signal::ctrl_c() => {
            presenter.on_key("Escape").await;
            PresenterOutcome::Cancelled
        }
    };

    shutdown.cancel();
    push_loop.abort();
    if let Err(e) = relay.await {
        warn!("Relay task ended abnormally: {}", e);
    }

    match outcome {
        PresenterOutcome::Explained { html, .. } => {
            if let Some(path) = &args.output {
                let title = if args.title.is_empty() { "Explanation" } else { &args.title };
                tokio::fs::write(path, ConsoleFormatter::html_document(title, &html))
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Explanation written to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        PresenterOutcome::Failed(_) => Ok(ExitCode::FAILURE),
        PresenterOutcome::Cancelled => Ok(ExitCode::from(130)),
        PresenterOutcome::NothingSelected => bail!("Nothing to explain: the text is empty"),
    }
}

async fn run_config(action: ConfigAction, store: FileSettingsStore) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = store.get().await?;
            println!("{}", ConsoleFormatter::settings(&settings, store.path()));
        }
        ConfigAction::Set { api_key, api_url } => {
            if api_key.is_none() && api_url.is_none() {
                bail!("Nothing to set. Pass --api-key and/or --api-url.");
            }

            // Merge with what is on disk, ignoring environment overrides
            let on_disk = FileSettingsStore::new(store.path())
                .without_env()
                .get()
                .await
                .unwrap_or_default();
            let key = api_key.or(on_disk.api_key).unwrap_or_default();
            let url = api_url.or(on_disk.api_url).unwrap_or_default();

            let settings = validate_settings(&key, &url)?;
            store.save(&settings).await?;
            println!("Settings saved to {}", store.path().display());
        }
    }
    Ok(())
}
