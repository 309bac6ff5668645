// ============================================================================
// Structure : CheckRecord
// ============================================================================
// L'unité écrite dans le log : une ligne JSON par check.
//
// Exemple de ligne :
// {"outputTimestamp":"2024-01-05T10:00:05.012Z","requestDuration":87,
//  "respHTTPCode":"200 OK","respContentType":"application/json",
//  "respValidJSON":true,"targetDays":["2024-01-02"]}
//
// CONCEPTS RUST :
// 1. #[serde(rename = "...")] : noms de champs imposés par le format du log
// 2. targetDays est TOUJOURS présent (liste vide si rien n'est hors bande)
//    - Pas de skip_serializing_if : le log reste homogène ligne par ligne
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RequestMetadata;

/// Résultat structuré d'un check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Moment où le check a été lancé
    #[serde(rename = "outputTimestamp")]
    pub timestamp: DateTime<Utc>,

    /// Durée de la requête (ms)
    #[serde(rename = "requestDuration")]
    pub request_duration_ms: i64,

    #[serde(rename = "respHTTPCode")]
    pub response_status: String,

    #[serde(rename = "respContentType")]
    pub response_content_type: String,

    #[serde(rename = "respValidJSON")]
    pub response_valid_json: bool,

    /// Dates dont le cours moyen est hors de la bande
    #[serde(rename = "targetDays")]
    pub target_days: Vec<String>,
}

impl CheckRecord {
    /// Assemble un record à partir des métadonnées de la requête
    ///
    /// CONCEPT RUST : Move
    /// - metadata et target_days sont consommés (pas de clone)
    /// - Le record devient propriétaire des Strings
    pub fn new(timestamp: DateTime<Utc>, metadata: RequestMetadata, target_days: Vec<String>) -> Self {
        Self {
            timestamp,
            request_duration_ms: metadata.request_duration_ms,
            response_status: metadata.response_status,
            response_content_type: metadata.response_content_type,
            response_valid_json: metadata.response_valid_json,
            target_days,
        }
    }

    /// Sérialise le record en une ligne JSON (sans retour à la ligne)
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_metadata() -> RequestMetadata {
        RequestMetadata::new(42, "200 OK", "application/json", true)
    }

    #[test]
    fn test_record_field_names() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 5).unwrap();
        let record = CheckRecord::new(timestamp, sample_metadata(), vec!["2024-01-02".to_string()]);

        let value: serde_json::Value = serde_json::to_value(&record).unwrap();

        let raw_timestamp = value["outputTimestamp"].as_str().unwrap();
        assert!(raw_timestamp.starts_with("2024-01-05T10:00:05"));
        let parsed: DateTime<Utc> = raw_timestamp.parse().unwrap();
        assert_eq!(parsed, timestamp);
        assert_eq!(value["requestDuration"], 42);
        assert_eq!(value["respHTTPCode"], "200 OK");
        assert_eq!(value["respContentType"], "application/json");
        assert_eq!(value["respValidJSON"], true);
        assert_eq!(value["targetDays"], serde_json::json!(["2024-01-02"]));
    }

    #[test]
    fn test_empty_target_days_is_emitted() {
        let record = CheckRecord::new(Utc::now(), sample_metadata(), Vec::new());
        let line = record.to_json_line().unwrap();

        assert!(line.contains("\"targetDays\":[]"));
        assert!(!line.contains('\n'));
    }
}
