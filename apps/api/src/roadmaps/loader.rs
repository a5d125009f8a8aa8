//! Canonical roadmap loader.
//!
//! `AppState` holds an `Arc<dyn RoadmapLoader>`; production reads `<dir>/<key>.json`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::models::Roadmap;

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("No roadmap file for job '{0}'")]
    NotFound(String),

    #[error("Failed to read roadmap '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Roadmap '{key}' is not a valid roadmap document: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait RoadmapLoader: Send + Sync {
    /// Loads a fresh copy of the canonical roadmap for a job-file key.
    async fn load(&self, job_key: &str) -> Result<Roadmap, RoadmapError>;
}

/// Reads canonical roadmaps from JSON files in one directory.
pub struct FsRoadmapLoader {
    dir: PathBuf,
}

impl FsRoadmapLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name for a key: lowercased, spaces → underscores, `.json` appended.
    /// Keys that could escape the directory have no file.
    fn file_name(job_key: &str) -> Option<String> {
        let stem = job_key.trim().to_lowercase().replace(' ', "_");
        let escapes = stem.contains(['/', '\\']) || stem.contains("..");
        if stem.is_empty() || escapes {
            return None;
        }
        Some(format!("{stem}.json"))
    }
}

#[async_trait]
impl RoadmapLoader for FsRoadmapLoader {
    async fn load(&self, job_key: &str) -> Result<Roadmap, RoadmapError> {
        let file_name =
            Self::file_name(job_key).ok_or_else(|| RoadmapError::NotFound(job_key.to_string()))?;
        let path = self.dir.join(file_name);
        debug!("Loading canonical roadmap from {}", path.display());

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RoadmapError::NotFound(job_key.to_string()))
            }
            Err(source) => {
                return Err(RoadmapError::Io {
                    key: job_key.to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| RoadmapError::Parse {
            key: job_key.to_string(),
            source,
        })
    }
}
