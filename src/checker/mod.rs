// ============================================================================
// Module : checker
// ============================================================================
// Le coeur de l'application : planning périodique, checks concurrents,
// classification des cours.
// ============================================================================

pub mod classifier;   // Jours hors bande (fonction pure)
pub mod orchestrator; // RateChecker
pub mod ticker;       // Déclencheur périodique annulable

pub use classifier::find_target_days;
pub use orchestrator::{run_check, RateChecker};
pub use ticker::{Tick, Ticker};
