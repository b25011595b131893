use std::future::Future;
use std::path::{Path, PathBuf};

use super::domain::TrainingDataset;

/// Where session records come from. Implementations must hand back a
/// consistent snapshot per call and be safe to share across requests.
/// Loading is the only suspension point in a request.
pub trait SessionSource: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<TrainingDataset, DataSourceError>> + Send;
}

/// Error enumeration for data source failures.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to read training data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("training data in {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON document on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSource for JsonFileSource {
    async fn load(&self) -> Result<TrainingDataset, DataSourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DataSourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&raw).map_err(|source| DataSourceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

/// Fixed dataset held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionSource {
    dataset: TrainingDataset,
}

impl InMemorySessionSource {
    pub fn new(dataset: TrainingDataset) -> Self {
        Self { dataset }
    }
}

impl SessionSource for InMemorySessionSource {
    async fn load(&self) -> Result<TrainingDataset, DataSourceError> {
        Ok(self.dataset.clone())
    }
}
