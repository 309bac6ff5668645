// ============================================================================
// Outputter : fichier de log JSON (+ console)
// ============================================================================
// Chaque CheckRecord devient UNE ligne JSON ajoutée à la fin de log.txt,
// et est recopié sur stdout.
//
// CONCEPTS RUST :
// 1. tokio::sync::Mutex : verrou async, peut être tenu pendant un .await
// 2. Une ligne = un seul write_all : deux checks concurrents ne peuvent pas
//    entrelacer leurs lignes
// 3. Rotation au démarrage : log.txt existant -> log.txt.old
// 4. Console = Box<dyn Write> : stdout en production, un buffer en test ;
//    une écriture refusée (pipe fermé) remonte en PersistError, sans panic
// ============================================================================

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::Outputter;
use crate::errors::PersistError;
use crate::models::CheckRecord;

/// Nom par défaut du fichier de log des checks
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Chemin de la sauvegarde : "log.txt" -> "log.txt.old"
pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".old");
    PathBuf::from(backup)
}

/// Prépare le fichier de log avant le démarrage des checks
///
/// - Si le fichier existe : il est renommé en <nom>.old (l'ancienne sauvegarde est écrasée)
/// - Un nouveau fichier vide est créé
///
/// Une erreur ici est fatale : l'application s'arrête avant de planifier quoi que ce soit.
pub fn prepare_log_file(path: &Path) -> Result<()> {
    if path.exists() {
        let backup = backup_path(path);
        std::fs::rename(path, &backup).with_context(|| {
            format!("Échec du renommage de {} en {}", path.display(), backup.display())
        })?;
        info!(from = %path.display(), to = %backup.display(), "Existing log file backed up");
    }

    std::fs::File::create(path)
        .with_context(|| format!("Échec de la création du fichier de log {}", path.display()))?;

    Ok(())
}

/// Sortie console des records
type Console = Box<dyn Write + Send>;

/// Outputter qui ajoute les records à un fichier (et à stdout si demandé)
///
/// CONCEPT RUST : Mutex<File>
/// - Le fichier est ouvert une fois en mode append
/// - Le Mutex est interne à l'outputter : l'appelant n'a rien à verrouiller
pub struct LogFileOutputter {
    path: PathBuf,
    file: Mutex<File>,
    console: Option<Mutex<Console>>,
}

impl LogFileOutputter {
    /// Ouvre `path` en mode ajout (le fichier doit déjà exister, cf. prepare_log_file)
    pub async fn open(path: impl Into<PathBuf>, echo_to_console: bool) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Échec de l'ouverture du fichier de log {}", path.display()))?;

        debug!(path = %path.display(), echo_to_console, "Log file opened for appending");
        let console = echo_to_console.then(|| Mutex::new(Box::new(std::io::stdout()) as Console));
        Ok(Self {
            path,
            file: Mutex::new(file),
            console,
        })
    }

    /// Remplace la sortie console (stdout par défaut)
    pub fn with_console(mut self, writer: impl Write + Send + 'static) -> Self {
        self.console = Some(Mutex::new(Box::new(writer)));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Outputter for LogFileOutputter {
    async fn output(&self, record: &CheckRecord) -> Result<(), PersistError> {
        let mut line = record.to_json_line()?;
        line.push('\n');

        {
            let mut file = self.file.lock().await;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }

        if let Some(console) = &self.console {
            let mut console = console.lock().await;
            console.write_all(line.as_bytes())?;
            console.flush()?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
