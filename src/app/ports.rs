use async_trait::async_trait;

use crate::error::LoadError;

/// Raw table bytes as retrieved from a data origin.
#[derive(Clone, Debug)]
pub struct RawTable {
    /// Human readable origin (URL, path or `synthetic`).
    pub origin: String,
    pub bytes: Vec<u8>,
}

/// A data origin for the activity CSV.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Mode label used in logs and metrics (`remote`, `local`, `synthetic`).
    fn mode(&self) -> &'static str;

    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<RawTable, LoadError>;
}
