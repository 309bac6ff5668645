// ============================================================================
// Structure : CheckerConfig
// ============================================================================
// Configuration du RateChecker, fixée au démarrage et jamais modifiée.
//
// CONCEPT RUST : Valeur immuable passée au constructeur
// - Pas de variable globale (static mut) pour les limites ou l'intervalle
// - Le RateChecker reçoit sa config par valeur et la garde pour lui
// - Clone est bon marché : que des types Copy
// ============================================================================

use std::time::Duration;

use crate::errors::ConfigError;

/// Intervalle par défaut entre deux ticks
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
/// Intervalle maximal accepté (un an) : au-delà, l'échéance du timer déborde
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);
/// Nombre de checks lancés à chaque tick
pub const DEFAULT_CHECKS_PER_INTERVAL: usize = 10;
pub const DEFAULT_LOWER_LIMIT: f64 = 4.5;
pub const DEFAULT_UPPER_LIMIT: f64 = 4.7;

/// Paramètres de l'ordonnancement et de la classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerConfig {
    /// Période entre deux ticks
    pub interval: Duration,

    /// Nombre de checks concurrents lancés par tick
    pub checks_per_interval: usize,

    /// Un cours strictement inférieur est "hors bande"
    pub lower_limit: f64,

    /// Un cours strictement supérieur est "hors bande"
    pub upper_limit: f64,

    /// Nombre maximal de checks exécutés en même temps
    /// - None : pas de limite (les lots peuvent se chevaucher librement)
    /// - Some(n) : les checks en trop attendent une place
    pub max_in_flight: Option<usize>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            checks_per_interval: DEFAULT_CHECKS_PER_INTERVAL,
            lower_limit: DEFAULT_LOWER_LIMIT,
            upper_limit: DEFAULT_UPPER_LIMIT,
            max_in_flight: None,
        }
    }
}

impl CheckerConfig {
    /// Vérifie la cohérence de la configuration
    ///
    /// CONCEPT RUST : Result<(), E>
    /// - Ok(()) : rien à signaler
    /// - Err(e) : première incohérence trouvée
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.interval > MAX_INTERVAL {
            return Err(ConfigError::IntervalTooLarge { max: MAX_INTERVAL });
        }
        if self.checks_per_interval == 0 {
            return Err(ConfigError::ZeroChecks);
        }
        if !self.lower_limit.is_finite() {
            return Err(ConfigError::NonFiniteLimit { name: "basse", value: self.lower_limit });
        }
        if !self.upper_limit.is_finite() {
            return Err(ConfigError::NonFiniteLimit { name: "haute", value: self.upper_limit });
        }
        if self.lower_limit > self.upper_limit {
            return Err(ConfigError::InvertedLimits {
                lower: self.lower_limit,
                upper: self.upper_limit,
            });
        }
        if self.max_in_flight == Some(0) {
            return Err(ConfigError::ZeroInFlight);
        }
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
