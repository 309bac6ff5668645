// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
// ============================================================================

pub mod rate;     // Table de cours (rate.rs)
pub mod metadata; // Métadonnées de requête (metadata.rs)
pub mod record;   // Ligne du log (record.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use ratechecker::models::rate::SingleRate;
// On peut faire : use ratechecker::models::SingleRate;
pub use metadata::RequestMetadata;
pub use rate::{ExchangeRateSet, SingleRate};
pub use record::CheckRecord;
