// ============================================================================
// RateChecker : orchestration des checks périodiques
// ============================================================================
// À chaque tick, lance `checks_per_interval` checks concurrents.
// Un check = téléchargement -> classification -> CheckRecord -> outputter.
//
// CONCEPTS RUST :
// 1. Arc<dyn Trait> : downloader et outputter partagés entre toutes les tâches
// 2. TaskTracker : garde la trace des tâches lancées (attente possible à l'arrêt)
//    - La boucle de planning ne les attend JAMAIS
//    - drain() permet d'attendre la fin des checks en vol
// 3. Semaphore (optionnel) : borne le nombre de checks exécutés en même temps
// 4. Isolation des erreurs : une erreur reste dans sa tâche, elle est loggée
//    puis oubliée ; ni les autres checks ni le planning ne sont affectés
// 5. AtomicUsize : compte les checks qui ont leurs cours et écrivent leur record
// ============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, info_span, Instrument};

use super::classifier::find_target_days;
use super::ticker::{Tick, Ticker};
use crate::api::Downloader;
use crate::config::CheckerConfig;
use crate::errors::{CheckError, ConfigError, PersistError};
use crate::models::CheckRecord;
use crate::output::Outputter;

/// Orchestrateur des checks
///
/// États : Idle (construit) -> Scheduled (run en cours) -> Stopped (annulé).
/// Il ne s'arrête jamais de lui-même et un check en échec ne le fait pas échouer.
pub struct RateChecker {
    downloader: Arc<dyn Downloader>,
    outputter: Arc<dyn Outputter>,
    config: CheckerConfig,
    tracker: TaskTracker,
    permits: Option<Arc<Semaphore>>,
    pending_writes: Arc<AtomicUsize>,
}

impl RateChecker {
    /// Crée l'orchestrateur après validation de la configuration
    pub fn new(
        downloader: Arc<dyn Downloader>,
        outputter: Arc<dyn Outputter>,
        config: CheckerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pending_writes = Arc::new(AtomicUsize::new(0));
        let outputter: Arc<dyn Outputter> = Arc::new(CountingOutputter {
            inner: outputter,
            pending: Arc::clone(&pending_writes),
        });

        Ok(Self {
            downloader,
            outputter,
            config,
            tracker: TaskTracker::new(),
            permits: config.max_in_flight.map(|n| Arc::new(Semaphore::new(n))),
            pending_writes,
        })
    }

    /// Nombre de checks lancés et pas encore terminés
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Checks en vol dont le téléchargement est terminé et dont le record
    /// n'est pas encore écrit
    pub fn pending_writes(&self) -> usize {
        self.pending_writes.load(Ordering::SeqCst)
    }

    /// Borne sur les checks exécutés en même temps (None = illimité)
    pub fn max_in_flight(&self) -> Option<usize> {
        self.config.max_in_flight
    }

    /// Boucle de planning : tourne jusqu'à l'annulation de `shutdown`
    ///
    /// - Aucun check au démarrage : le premier lot part après un intervalle complet
    /// - Chaque tick lance un lot sans attendre les lots précédents
    /// - Après l'annulation, plus aucun lot n'est lancé ; les checks en vol
    ///   continuent (voir drain())
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = Ticker::new(self.config.interval, shutdown.clone());

        info!(
            interval = ?ticker.period(),
            checks_per_interval = self.config.checks_per_interval,
            lower_limit = self.config.lower_limit,
            upper_limit = self.config.upper_limit,
            max_in_flight = ?self.config.max_in_flight,
            "Rate checker scheduled"
        );

        while let Some(tick) = ticker.tick().await {
            if shutdown.is_cancelled() {
                break;
            }
            self.launch_batch(tick);
        }

        info!(in_flight = self.in_flight(), "Rate checker stopped, no new checks will be launched");
    }

    /// Attend la fin des checks en vol
    ///
    /// - grace = None : attend sans limite
    /// - grace = Some(d) : abandonne l'attente après d (les tâches ne sont pas tuées)
    ///
    /// Retourne true si tous les checks se sont terminés.
    pub async fn drain(&self, grace: Option<Duration>) -> bool {
        self.tracker.close();

        match grace {
            None => {
                self.tracker.wait().await;
                true
            }
            Some(grace) => tokio::time::timeout(grace, self.tracker.wait()).await.is_ok(),
        }
    }

    /// Lance un lot de checks indépendants
    fn launch_batch(&self, tick: Tick) {
        debug!(
            tick = tick.number,
            late = ?tick.scheduled_at.elapsed(),
            checks = self.config.checks_per_interval,
            in_flight = self.in_flight(),
            "Launching check batch"
        );

        for index in 0..self.config.checks_per_interval {
            let downloader = Arc::clone(&self.downloader);
            let outputter = Arc::clone(&self.outputter);
            let permits = self.permits.clone();
            let config = self.config;
            let timestamp = Utc::now();
            let span = info_span!("check", tick = tick.number, index);

            self.tracker.spawn(
                async move {
                    // CONCEPT RUST : le permit est libéré au drop, à la fin de la tâche
                    let _permit = match permits {
                        Some(semaphore) => match semaphore.acquire_owned().await {
                            Ok(permit) => Some(permit),
                            Err(_) => return,
                        },
                        None => None,
                    };

                    match run_check(downloader.as_ref(), outputter.as_ref(), &config, timestamp).await {
                        Ok(record) => debug!(
                            target_days = record.target_days.len(),
                            duration_ms = record.request_duration_ms,
                            "Check completed"
                        ),
                        Err(err) => report_failure(&err),
                    }
                }
                .instrument(span),
            );
        }
    }
}

/// Exécute un check complet
///
/// `timestamp` est le moment où le check a été lancé ; il est repris tel quel
/// dans le record et dans l'erreur éventuelle.
pub async fn run_check(
    downloader: &dyn Downloader,
    outputter: &dyn Outputter,
    config: &CheckerConfig,
    timestamp: DateTime<Utc>,
) -> Result<CheckRecord, CheckError> {
    let (rates, metadata) = downloader
        .get_rates()
        .await
        .map_err(|source| CheckError::Fetch { timestamp, source })?;

    let target_days = find_target_days(&rates, config.lower_limit, config.upper_limit);
    let record = CheckRecord::new(timestamp, metadata, target_days);

    outputter
        .output(&record)
        .await
        .map_err(|source| CheckError::Persist { timestamp, source })?;

    Ok(record)
}

/// Outputter intercalé par le RateChecker : compte les écritures en cours
///
/// La classification est synchrone : un check qui est dans output() a donc
/// déjà téléchargé ses cours.
struct CountingOutputter {
    inner: Arc<dyn Outputter>,
    pending: Arc<AtomicUsize>,
}

#[async_trait]
impl Outputter for CountingOutputter {
    async fn output(&self, record: &CheckRecord) -> Result<(), PersistError> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let result = self.inner.output(record).await;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn report_failure(err: &CheckError) {
    match err {
        CheckError::Fetch { timestamp, source } => match source.metadata() {
            Some(metadata) => error!(
                %timestamp,
                status = %metadata.response_status,
                content_type = %metadata.response_content_type,
                duration_ms = metadata.request_duration_ms,
                error = %source,
                "Check failed while fetching rates"
            ),
            None => error!(%timestamp, error = %source, "Check failed while fetching rates"),
        },
        CheckError::Persist { timestamp, source } => {
            error!(%timestamp, error = %source, "Check failed while writing record")
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// Horloge tokio en pause (start_paused) : les sleeps avancent le temps
// virtuel instantanément, les assertions de timing sont déterministes.
// ============================================================================
