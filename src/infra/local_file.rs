use crate::app::ports::{DataSource, RawTable};
use crate::error::LoadError;
use async_trait::async_trait;
use std::path::PathBuf;

/// CSV file on the local filesystem, resolved relative to the working directory.
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for LocalFileSource {
    fn mode(&self) -> &'static str {
        "local"
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<RawTable, LoadError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::SourceNotFound {
                    path: self.path.clone(),
                }
            } else {
                LoadError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        Ok(RawTable {
            origin: self.describe(),
            bytes,
        })
    }
}
