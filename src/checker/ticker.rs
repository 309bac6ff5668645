// ============================================================================
// Ticker : déclencheur périodique annulable
// ============================================================================
// Produit un Tick toutes les `period`, jusqu'à l'annulation.
//
// CONCEPTS RUST :
// 1. tokio::time::interval_at : premier tick après UNE période complète
//    (pas de tick immédiat au démarrage)
// 2. tokio::select! biased : l'annulation est vérifiée avant le timer
// 3. Option<Tick> : None = ticker arrêté, la boucle appelante se termine
// ============================================================================

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::MAX_INTERVAL;

/// Un déclenchement du planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Numéro du tick (1 pour le premier)
    pub number: u64,

    /// Instant prévu du déclenchement
    pub scheduled_at: Instant,
}

/// Déclencheur périodique arrêté par un CancellationToken
pub struct Ticker {
    interval: Interval,
    shutdown: CancellationToken,
    count: u64,
}

impl Ticker {
    /// Arme le timer : le premier tick arrive à `now + period`
    ///
    /// Un tick manqué (runtime bloqué plus d'une période) est sauté,
    /// pas rattrapé en rafale. Une période au-delà de MAX_INTERVAL est ramenée
    /// à MAX_INTERVAL (sinon `now + period` déborde).
    pub fn new(period: Duration, shutdown: CancellationToken) -> Self {
        let period = period.min(MAX_INTERVAL);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            interval,
            shutdown,
            count: 0,
        }
    }

    /// Attend le prochain tick, ou None si l'annulation est demandée
    pub async fn tick(&mut self) -> Option<Tick> {
        if self.shutdown.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            scheduled_at = self.interval.tick() => {
                self.count += 1;
                Some(Tick { number: self.count, scheduled_at })
            }
        }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// CONCEPT : start_paused = true
// - L'horloge tokio est figée et avance automatiquement quand tout dort
// - Les tests de temps sont instantanés et déterministes
// ============================================================================
