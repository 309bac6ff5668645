// ============================================================================
// Classification des cours
// ============================================================================
// Repère les jours dont le cours moyen sort de la bande [lower, upper].
//
// CONCEPT RUST : Fonction pure + iterators
// - Emprunte la table (&ExchangeRateSet) sans la modifier
// - filter() + map() + collect() : pas de boucle manuelle
// - L'ordre de la réponse est conservé, les doublons aussi
// ============================================================================

use crate::models::ExchangeRateSet;

/// Retourne les dates dont `mid < lower_limit` ou `mid > upper_limit`
///
/// Les bornes elles-mêmes sont dans la bande. Un mid NaN n'est jamais retenu
/// (toute comparaison avec NaN est fausse).
pub fn find_target_days(rates: &ExchangeRateSet, lower_limit: f64, upper_limit: f64) -> Vec<String> {
    rates
        .rates
        .iter()
        .filter(|rate| rate.mid_value < lower_limit || rate.mid_value > upper_limit)
        .map(|rate| rate.effective_date.clone())
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================
