// ============================================================================
// Structures : ExchangeRateSet / SingleRate
// ============================================================================
// Représente la table de cours renvoyée par l'API NBP
// (ex: http://api.nbp.pl/api/exchangerates/rates/a/eur/last/100/?format=json)
//
// CONCEPTS RUST :
// 1. #[serde(rename = "...")] : le nom JSON diffère du nom Rust
// 2. f64 pour "mid" : la valeur est numérique dès le décodage
//    - Une chaîne ("4.35") à cet endroit est un JSON invalide pour nous
//    - Pas de parsing manuel plus tard, donc pas d'erreur de conversion possible
// ============================================================================

use serde::{Deserialize, Serialize};

/// Une cotation datée
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleRate {
    /// Identifiant de la table de cotation (ex: "201/A/NBP/2024")
    #[serde(rename = "no")]
    pub rate_number: String,

    /// Date d'effet telle que fournie par l'API (ex: "2024-01-02")
    #[serde(rename = "effectiveDate")]
    pub effective_date: String,

    /// Cours moyen
    #[serde(rename = "mid")]
    pub mid_value: f64,
}

impl SingleRate {
    pub fn new(rate_number: impl Into<String>, effective_date: impl Into<String>, mid_value: f64) -> Self {
        Self {
            rate_number: rate_number.into(),
            effective_date: effective_date.into(),
            mid_value,
        }
    }
}

/// Table de cours d'une devise
///
/// CONCEPT RUST : Ownership
/// - Chaque check possède sa propre ExchangeRateSet
/// - Pas de partage entre checks concurrents : pas besoin d'Arc ni de Mutex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSet {
    /// Type de table NBP ("A", "B" ou "C")
    pub table: String,

    /// Nom de la devise (ex: "euro")
    pub currency: String,

    /// Code ISO 4217 (ex: "EUR")
    #[serde(rename = "code")]
    pub currency_code: String,

    /// Cotations dans l'ordre de la réponse (pas forcément triées par date)
    pub rates: Vec<SingleRate>,
}

impl ExchangeRateSet {
    pub fn new(
        table: impl Into<String>,
        currency: impl Into<String>,
        currency_code: impl Into<String>,
        rates: Vec<SingleRate>,
    ) -> Self {
        Self {
            table: table.into(),
            currency: currency.into(),
            currency_code: currency_code.into(),
            rates,
        }
    }

    /// Nombre de cotations
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NBP_SAMPLE: &str = r#"{
        "table": "A",
        "currency": "euro",
        "code": "EUR",
        "rates": [
            {"no": "001/A/NBP/2024", "effectiveDate": "2024-01-02", "mid": 4.3480},
            {"no": "002/A/NBP/2024", "effectiveDate": "2024-01-03", "mid": 4.3646}
        ]
    }"#;

    #[test]
    fn test_deserialize_nbp_payload() {
        let set: ExchangeRateSet = serde_json::from_str(NBP_SAMPLE).unwrap();

        assert_eq!(set.table, "A");
        assert_eq!(set.currency, "euro");
        assert_eq!(set.currency_code, "EUR");
        assert_eq!(set.len(), 2);
        assert_eq!(set.rates[0].rate_number, "001/A/NBP/2024");
        assert_eq!(set.rates[1].effective_date, "2024-01-03");
        assert!((set.rates[1].mid_value - 4.3646).abs() < 1e-9);
    }

    #[test]
    fn test_string_mid_is_rejected() {
        // "mid" doit être un nombre : une chaîne est une erreur de décodage
        let payload = r#"{
            "table": "A", "currency": "euro", "code": "EUR",
            "rates": [{"no": "x", "effectiveDate": "2024-01-02", "mid": "4.35"}]
        }"#;

        let result: Result<ExchangeRateSet, _> = serde_json::from_str(payload);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_rates_is_valid() {
        let payload = r#"{"table": "A", "currency": "euro", "code": "EUR", "rates": []}"#;
        let set: ExchangeRateSet = serde_json::from_str(payload).unwrap();
        assert!(set.is_empty());
    }
}
