// ============================================================================
// Module : errors
// ============================================================================
// Taxonomie des erreurs de la bibliothèque
//
// CONCEPT RUST : thiserror vs anyhow
// - thiserror : erreurs typées, l'appelant peut faire un match sur la variante
// - anyhow : erreurs opaques avec contexte, pratique dans main()
// - Ici : thiserror pour ce qui traverse les traits Downloader / Outputter,
//   anyhow pour le démarrage de l'application
// ============================================================================

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::RequestMetadata;

/// Échec d'un téléchargement (confiné au check qui l'a produit)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Erreur réseau : connexion, timeout, lecture du corps
    #[error("échec de la requête HTTP : {0}")]
    Transport(#[source] reqwest::Error),

    /// Statut HTTP hors 2xx
    #[error("statut HTTP inattendu : {}", .metadata.response_status)]
    Status { metadata: RequestMetadata },

    /// Content-Type autre que application/json
    #[error("Content-Type inattendu : {:?}", .metadata.response_content_type)]
    ContentType { metadata: RequestMetadata },

    /// Corps illisible en tant que table de cours
    #[error("corps JSON invalide : {source}")]
    InvalidBody {
        metadata: RequestMetadata,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Métadonnées de la réponse, si une réponse a été reçue
    pub fn metadata(&self) -> Option<&RequestMetadata> {
        match self {
            FetchError::Transport(_) => None,
            FetchError::Status { metadata }
            | FetchError::ContentType { metadata }
            | FetchError::InvalidBody { metadata, .. } => Some(metadata),
        }
    }
}

/// Échec de l'écriture d'un record
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("échec de la sérialisation du record : {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("échec de l'écriture dans le fichier de log : {0}")]
    Io(#[from] std::io::Error),
}

/// Échec d'un check, avec l'horodatage du check concerné
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("check du {timestamp} : téléchargement des cours impossible")]
    Fetch {
        timestamp: DateTime<Utc>,
        #[source]
        source: FetchError,
    },

    #[error("check du {timestamp} : envoi du record à l'outputter impossible")]
    Persist {
        timestamp: DateTime<Utc>,
        #[source]
        source: PersistError,
    },
}

impl CheckError {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CheckError::Fetch { timestamp, .. } | CheckError::Persist { timestamp, .. } => *timestamp,
        }
    }
}

/// Configuration invalide (erreur de démarrage)
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("l'intervalle doit être strictement positif")]
    ZeroInterval,

    #[error("l'intervalle ne peut pas dépasser {max:?}")]
    IntervalTooLarge { max: Duration },

    #[error("le nombre de checks par intervalle doit être strictement positif")]
    ZeroChecks,

    #[error("la limite {name} doit être un nombre fini (reçu {value})")]
    NonFiniteLimit { name: &'static str, value: f64 },

    #[error("limite basse ({lower}) supérieure à la limite haute ({upper})")]
    InvertedLimits { lower: f64, upper: f64 },

    #[error("max_in_flight doit être strictement positif")]
    ZeroInFlight,
}
