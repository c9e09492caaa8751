//! JSON file implementation of the ChainStore trait.
//!
//! The whole chain is written as one pretty-printed JSON array. Writes go to a
//! sibling temporary file which is then renamed over the target, so a crash
//! mid-write leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use timechain_core::Chain;

use crate::error::Result;
use crate::record::{decode_snapshot, encode_snapshot};
use crate::traits::ChainStore;

/// Snapshot file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    persist_index: bool,
}

impl JsonFileStore {
    /// Store the chain at `path`. The file is created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            persist_index: false,
        }
    }

    /// Write an explicit `index` into each record.
    pub fn persist_index(mut self, enabled: bool) -> Self {
        self.persist_index = enabled;
        self
    }

    /// The snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ChainStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Chain>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let chain = decode_snapshot(&text)?;
        tracing::debug!(path = %self.path.display(), blocks = chain.len(), "loaded snapshot");
        Ok(Some(chain))
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        let text = encode_snapshot(chain, self.persist_index)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, text.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), blocks = chain.len(), "wrote snapshot");
        Ok(())
    }
}
