// ============================================================================
// API Client : NBP (Narodowy Bank Polski)
// ============================================================================
// Récupère la table des cours moyens EUR/PLN depuis l'API publique du NBP
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : la requête ne bloque pas le thread
// 2. Erreurs typées : chaque cause d'échec a sa variante de FetchError
// 3. Serde : désérialisation JSON vers ExchangeRateSet
// 4. Partage : reqwest::Client est clonable et utilisable en concurrence
// ============================================================================

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

use super::Downloader;
use crate::errors::FetchError;
use crate::models::{ExchangeRateSet, RequestMetadata};

/// Les 100 dernières cotations de l'euro (table A)
pub const NBP_EUR_LAST_100_URL: &str =
    "http://api.nbp.pl/api/exchangerates/rates/a/eur/last/100/?format=json";

/// User-Agent de navigateur pour éviter d'être bloqué par l'API
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/118.0";

const EXPECTED_MEDIA_TYPE: &str = "application/json";

/// Downloader HTTP vers l'API NBP
///
/// CONCEPT RUST : Client construit une seule fois
/// - reqwest::Client garde un pool de connexions
/// - &self suffit pour envoyer des requêtes : pas de Mutex nécessaire
#[derive(Debug, Clone)]
pub struct NbpDownloader {
    client: reqwest::Client,
    url: String,
}

impl NbpDownloader {
    /// Crée un downloader pour `url` avec un timeout par requête
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Downloader for NbpDownloader {
    /// Télécharge et décode la table de cours
    ///
    /// Ordre des vérifications :
    /// 1. transport (connexion, timeout, lecture du corps)
    /// 2. statut HTTP 2xx
    /// 3. Content-Type application/json
    /// 4. décodage JSON
    ///
    /// La durée mesurée couvre l'envoi de la requête et la lecture complète du corps.
    #[instrument(skip(self), fields(url = %self.url))]
    async fn get_rates(&self) -> Result<(ExchangeRateSet, RequestMetadata), FetchError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(parse_media_type)
            .unwrap_or_default();

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let duration_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);
        debug!(status = %status, content_type = %content_type, duration_ms, bytes = body.len(), "Received HTTP response");

        // response_valid_json passe à true seulement après un décodage réussi
        let mut metadata = RequestMetadata::new(duration_ms, status.to_string(), content_type, false);

        if !status.is_success() {
            warn!(status = %status, "NBP API returned error status");
            return Err(FetchError::Status { metadata });
        }

        if !metadata.response_content_type.eq_ignore_ascii_case(EXPECTED_MEDIA_TYPE) {
            warn!(content_type = %metadata.response_content_type, "Unexpected content type");
            return Err(FetchError::ContentType { metadata });
        }

        match serde_json::from_slice::<ExchangeRateSet>(&body) {
            Ok(rates) => {
                metadata.response_valid_json = true;
                debug!(rates = rates.len(), code = %rates.currency_code, "Decoded rate table");
                Ok((rates, metadata))
            }
            Err(source) => {
                warn!(error = %source, "Response body is not a valid rate table");
                Err(FetchError::InvalidBody { metadata, source })
            }
        }
    }
}

/// Extrait le media type d'un header Content-Type
///
/// "application/json; charset=utf-8" -> "application/json"
///
/// CONCEPT RUST : Iterator::find
/// - split(';') découpe en morceaux
/// - find() garde le premier morceau contenant un '/'
/// - Les paramètres (charset=...) sont ignorés
fn parse_media_type(header: &str) -> String {
    header
        .split(';')
        .map(str::trim)
        .find(|part| part.contains('/'))
        .unwrap_or_default()
        .to_string()
}

// ============================================================================
// Tests unitaires
// ============================================================================
// Les tests de get_rates() parlent à un petit serveur HTTP local (tokio::net)
// qui renvoie une réponse préparée : pas de dépendance au vrai réseau.
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const VALID_BODY: &str = r#"{"table":"A","currency":"euro","code":"EUR","rates":[
        {"no":"001/A/NBP/2024","effectiveDate":"2024-01-02","mid":4.3480},
        {"no":"002/A/NBP/2024","effectiveDate":"2024-01-03","mid":4.8000}]}"#;

    fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            content_type,
            body.len(),
            body
        )
    }

    /// Lance un serveur qui répond une seule fois puis ferme la connexion
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/api/exchangerates/rates/a/eur/last/100/?format=json", addr)
    }

    fn downloader(url: String) -> NbpDownloader {
        NbpDownloader::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_media_type() {
        assert_eq!(parse_media_type("application/json; charset=utf-8"), "application/json");
        assert_eq!(parse_media_type("charset=utf-8; text/html"), "text/html");
        assert_eq!(parse_media_type("  application/json  "), "application/json");
        assert_eq!(parse_media_type("garbage"), "");
        assert_eq!(parse_media_type(""), "");
    }

    #[tokio::test]
    async fn test_get_rates_success() {
        let url = serve_once(http_response("200 OK", "application/json; charset=utf-8", VALID_BODY)).await;

        let (rates, metadata) = downloader(url).get_rates().await.unwrap();

        assert_eq!(rates.currency_code, "EUR");
        assert_eq!(rates.len(), 2);
        assert!((rates.rates[1].mid_value - 4.8).abs() < 1e-9);
        assert_eq!(metadata.response_status, "200 OK");
        assert_eq!(metadata.response_content_type, "application/json");
        assert!(metadata.response_valid_json);
        assert!(metadata.request_duration_ms >= 0);
    }

    #[tokio::test]
    async fn test_get_rates_error_status() {
        let url = serve_once(http_response("404 Not Found", "application/json", "{}")).await;

        let err = downloader(url).get_rates().await.unwrap_err();

        match err {
            FetchError::Status { metadata } => {
                assert_eq!(metadata.response_status, "404 Not Found");
                assert!(!metadata.response_valid_json);
            }
            other => panic!("variante inattendue : {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_rates_wrong_content_type() {
        let url = serve_once(http_response("200 OK", "text/html; charset=utf-8", "<html></html>")).await;

        let err = downloader(url).get_rates().await.unwrap_err();

        assert!(matches!(err, FetchError::ContentType { .. }));
        assert_eq!(err.metadata().unwrap().response_content_type, "text/html");
    }

    #[tokio::test]
    async fn test_get_rates_invalid_json() {
        let body = r#"{"table":"A","currency":"euro","code":"EUR","rates":[{"no":"x","effectiveDate":"2024-01-02","mid":"4.35"}]}"#;
        let url = serve_once(http_response("200 OK", "application/json", body)).await;

        let err = downloader(url).get_rates().await.unwrap_err();

        match &err {
            FetchError::InvalidBody { metadata, .. } => {
                assert_eq!(metadata.response_status, "200 OK");
                assert!(!metadata.response_valid_json);
            }
            other => panic!("variante inattendue : {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_rates_connection_refused() {
        // Réserve un port puis le libère : personne n'écoute dessus
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = downloader(format!("http://{}/", addr)).get_rates().await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(err.metadata().is_none());
    }
}
