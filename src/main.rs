// ============================================================================
// RateChecker - Surveillance du cours EUR/PLN
// ============================================================================
// Toutes les N secondes, lance plusieurs checks concurrents contre l'API NBP,
// repère les jours hors bande et écrit un record JSON par check dans log.txt
//
// CONCEPTS RUST CLÉS :
// 1. Async dans sync : tokio::runtime::Runtime + block_on
// 2. Arrêt propre : CancellationToken déclenché par SIGINT / SIGTERM
// 3. Injection de dépendances : Arc<dyn Downloader>, Arc<dyn Outputter>
// ============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use ratechecker::api::NbpDownloader;
use ratechecker::checker::RateChecker;
use ratechecker::cli::Args;
use ratechecker::output::{prepare_log_file, LogFileOutputter};

// ============================================================================
// Initialisation du logging
// ============================================================================
// - Logs de diagnostic (tracing) : ./logs/ratechecker.log, rotation quotidienne,
//   plus une copie compacte sur stderr
// - Les records des checks, eux, vont dans log.txt et sur stdout (Outputter)
// ============================================================================

/// Initialise le système de logging
///
/// # Utilisation
/// ```bash
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=ratechecker=trace cargo run -- --interval 2
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "ratechecker.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratechecker=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialised");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    // Erreurs de démarrage : fatales, avant tout planning
    let config = args.checker_config().context("Configuration invalide")?;
    let settings = args.runtime_settings();

    prepare_log_file(&settings.log_file)?;

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let result = runtime.block_on(async {
        let downloader = NbpDownloader::new(settings.api_url.clone(), settings.request_timeout)?;
        let outputter = LogFileOutputter::open(&settings.log_file, settings.echo_to_console).await?;
        info!(log_file = %outputter.path().display(), url = %downloader.url(), "RateChecker starting up");

        let checker = RateChecker::new(Arc::new(downloader), Arc::new(outputter), config)
            .context("Configuration invalide")?;

        let shutdown = CancellationToken::new();
        spawn_signal_listener(shutdown.clone());

        checker.run(shutdown).await;

        // Laisse les checks en vol terminer leur ligne de log
        let in_flight = checker.in_flight();
        if in_flight > 0 {
            info!(in_flight, grace = ?settings.grace_period, "Waiting for in-flight checks");
        }
        if !checker.drain(Some(settings.grace_period)).await {
            // pending_writes : checks qui avaient leurs cours, record perdu
            warn!(
                in_flight = checker.in_flight(),
                pending_writes = checker.pending_writes(),
                "Grace period elapsed, abandoning in-flight checks"
            );
        }

        info!("RateChecker exited normally");
        Ok::<(), anyhow::Error>(())
    });

    if let Err(e) = &result {
        error!(error = ?e, "RateChecker exited with error");
    }

    result
}

/// Annule `shutdown` à la réception de SIGINT (Ctrl+C) ou SIGTERM
fn spawn_signal_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        match signal {
            Ok(name) => info!(signal = name, "Terminating due to signal"),
            Err(e) => error!(error = ?e, "Failed to listen for shutdown signals, stopping"),
        }
        shutdown.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).context("Échec de l'écoute de SIGTERM")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Échec de l'écoute de SIGINT")?;
            Ok("SIGINT")
        }
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c().await.context("Échec de l'écoute de Ctrl+C")?;
    Ok("Ctrl+C")
}
