// ============================================================================
// Ligne de commande
// ============================================================================
// CONCEPT RUST : clap derive
// - Chaque champ de la struct devient un flag
// - Les doc comments (///) deviennent l'aide de --help
// - default_value_t : valeur par défaut typée
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::NBP_EUR_LAST_100_URL;
use crate::config::{
    CheckerConfig, DEFAULT_CHECKS_PER_INTERVAL, DEFAULT_INTERVAL, DEFAULT_LOWER_LIMIT,
    DEFAULT_UPPER_LIMIT,
};
use crate::errors::ConfigError;
use crate::output::DEFAULT_LOG_FILE;

/// Surveille le cours EUR/PLN du NBP et logge les jours hors bande
#[derive(Parser, Debug, Clone)]
#[command(name = "ratechecker", version)]
pub struct Args {
    /// Cadence des checks, en secondes
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_secs())]
    pub interval: u64,

    /// Nombre de checks lancés à chaque intervalle
    #[arg(long = "number-of-checks", alias = "numberOfChecks", default_value_t = DEFAULT_CHECKS_PER_INTERVAL)]
    pub number_of_checks: usize,

    /// Un cours strictement inférieur est signalé
    #[arg(long, default_value_t = DEFAULT_LOWER_LIMIT, allow_negative_numbers = true)]
    pub lower_limit: f64,

    /// Un cours strictement supérieur est signalé
    #[arg(long, default_value_t = DEFAULT_UPPER_LIMIT, allow_negative_numbers = true)]
    pub upper_limit: f64,

    /// Nombre maximal de checks exécutés en même temps (illimité par défaut)
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Fichier de log des checks (l'ancien est renommé en <fichier>.old)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// URL de l'API de cours
    #[arg(long, default_value = NBP_EUR_LAST_100_URL)]
    pub api_url: String,

    /// Timeout d'une requête HTTP, en secondes
    #[arg(long, default_value_t = 10)]
    pub request_timeout: u64,

    /// Délai d'attente des checks en vol à l'arrêt, en secondes
    #[arg(long, default_value_t = 5)]
    pub grace_period: u64,

    /// N'affiche pas les records sur la sortie standard
    #[arg(long, short)]
    pub quiet: bool,
}

/// Réglages d'exécution hors orchestrateur
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub log_file: PathBuf,
    pub api_url: String,
    pub request_timeout: Duration,
    pub grace_period: Duration,
    pub echo_to_console: bool,
}

impl Args {
    /// Construit une CheckerConfig validée
    pub fn checker_config(&self) -> Result<CheckerConfig, ConfigError> {
        let config = CheckerConfig {
            interval: Duration::from_secs(self.interval),
            checks_per_interval: self.number_of_checks,
            lower_limit: self.lower_limit,
            upper_limit: self.upper_limit,
            max_in_flight: self.max_in_flight,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            log_file: self.log_file.clone(),
            api_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout),
            grace_period: Duration::from_secs(self.grace_period),
            echo_to_console: !self.quiet,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["ratechecker"]);

        let config = args.checker_config().unwrap();
        assert_eq!(config, CheckerConfig::default());

        let settings = args.runtime_settings();
        assert_eq!(settings.log_file, PathBuf::from("log.txt"));
        assert_eq!(settings.api_url, NBP_EUR_LAST_100_URL);
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.grace_period, Duration::from_secs(5));
        assert!(settings.echo_to_console);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "ratechecker",
            "--interval",
            "2",
            "--number-of-checks",
            "3",
            "--lower-limit",
            "4.1",
            "--upper-limit",
            "4.9",
            "--max-in-flight",
            "8",
            "--log-file",
            "/tmp/rates.log",
            "--quiet",
        ]);

        let config = args.checker_config().unwrap();
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.checks_per_interval, 3);
        assert_eq!(config.lower_limit, 4.1);
        assert_eq!(config.upper_limit, 4.9);
        assert_eq!(config.max_in_flight, Some(8));

        let settings = args.runtime_settings();
        assert_eq!(settings.log_file, PathBuf::from("/tmp/rates.log"));
        assert!(!settings.echo_to_console);
    }

    #[test]
    fn test_legacy_flag_name() {
        let args = Args::parse_from(["ratechecker", "--numberOfChecks", "7"]);
        assert_eq!(args.number_of_checks, 7);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero = Args::parse_from(["ratechecker", "--interval", "0"]);
        assert_eq!(zero.checker_config(), Err(ConfigError::ZeroInterval));

        let inverted = Args::parse_from(["ratechecker", "--lower-limit", "5", "--upper-limit", "4"]);
        assert!(matches!(inverted.checker_config(), Err(ConfigError::InvertedLimits { .. })));

        let huge = Args::parse_from(["ratechecker", "--interval", "18446744073709551615"]);
        assert!(matches!(huge.checker_config(), Err(ConfigError::IntervalTooLarge { .. })));

        assert!(Args::try_parse_from(["ratechecker", "--interval", "-1"]).is_err());
    }
}
