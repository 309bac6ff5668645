// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de cours et le trait qu'il implémente
//
// CONCEPT RUST : Trait comme point d'injection
// - Le RateChecker ne connaît que le trait Downloader
// - En production : NbpDownloader (HTTP)
// - En test : un faux downloader qui renvoie des données préparées
// ============================================================================

pub mod nbp; // Client API NBP

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::{ExchangeRateSet, RequestMetadata};

/// Source de la table de cours
///
/// Send + Sync : partagé entre tous les checks concurrents (via Arc),
/// sans verrou externe.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Télécharge une table de cours complète, ou une erreur (jamais de résultat partiel)
    async fn get_rates(&self) -> Result<(ExchangeRateSet, RequestMetadata), FetchError>;
}

// Re-export des éléments principaux
pub use nbp::{NbpDownloader, NBP_EUR_LAST_100_URL};
