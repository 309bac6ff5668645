// ============================================================================
// Structure : RequestMetadata
// ============================================================================
// Décrit le déroulement d'une requête HTTP vers l'API de cours.
// Produite une fois par téléchargement, consommée aussitôt pour construire
// un CheckRecord (jamais écrite seule dans le log).
// ============================================================================

/// Métadonnées d'un téléchargement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Durée de l'aller-retour HTTP en millisecondes
    pub request_duration_ms: i64,

    /// Statut HTTP sous forme de texte (ex: "200 OK")
    pub response_status: String,

    /// Media type du header Content-Type, sans paramètres (ex: "application/json")
    pub response_content_type: String,

    /// true si le corps a été décodé avec succès
    pub response_valid_json: bool,
}

impl RequestMetadata {
    pub fn new(
        request_duration_ms: i64,
        response_status: impl Into<String>,
        response_content_type: impl Into<String>,
        response_valid_json: bool,
    ) -> Self {
        Self {
            request_duration_ms,
            response_status: response_status.into(),
            response_content_type: response_content_type.into(),
            response_valid_json,
        }
    }
}
