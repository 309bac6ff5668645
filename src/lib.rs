// ============================================================================
// RateChecker - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;     // Client API NBP + trait Downloader
pub mod checker; // Planning, checks concurrents, classification
pub mod cli;     // Arguments de la ligne de commande
pub mod config;  // CheckerConfig
pub mod errors;  // Types d'erreurs
pub mod models;  // Structures de données
pub mod output;  // Fichier de log + trait Outputter
