// ============================================================================
// Module : output
// ============================================================================
// Destination des CheckRecord (fichier de log, console)
// ============================================================================

pub mod log_file; // Fichier JSON lines + stdout

use async_trait::async_trait;

use crate::errors::PersistError;
use crate::models::CheckRecord;

/// Destination des records
///
/// Send + Sync : appelé en concurrence par tous les checks, sans verrou externe.
/// Une erreur n'est jamais fatale pour l'appelant.
#[async_trait]
pub trait Outputter: Send + Sync {
    async fn output(&self, record: &CheckRecord) -> Result<(), PersistError>;
}

pub use log_file::{prepare_log_file, LogFileOutputter, DEFAULT_LOG_FILE};
