//! Partition-scoped file store with atomic writes

use std::path::{Path, PathBuf};

use strata_core::Result;

use crate::path_router::resolve_storage_path;

/// File store rooted at a single directory, with every operation routed
/// through the partition context.
///
/// The tenant prefix is derived per operation, so a store handle created at
/// request setup stays correct even if the surrounding context changes.
/// Writes go to a temporary sibling first and are renamed into place, so a
/// failed write never leaves a partial file.
#[derive(Debug, Clone)]
pub struct TenantFileStore {
    root: PathBuf,
}

impl TenantFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root this store serves
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a relative path under the current partition
    pub fn full_path(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(self.root.join(resolve_storage_path(relative)?))
    }

    /// Write a file under the current partition, atomically.
    ///
    /// # Errors
    /// - `Error::InvalidPath` for paths that escape the partition
    /// - `Error::Io` for filesystem failures
    pub async fn write(&self, relative: impl AsRef<Path>, contents: &[u8]) -> Result<PathBuf> {
        let final_path = self.full_path(relative)?;
        if let Some(parent) = final_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut temp_path = final_path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        if let Err(e) = tokio::fs::write(&temp_path, contents).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(path = %final_path.display(), "file written");
        Ok(final_path)
    }

    /// Read a file under the current partition.
    pub async fn read(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.full_path(relative)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Whether a file exists under the current partition
    pub async fn exists(&self, relative: impl AsRef<Path>) -> Result<bool> {
        let path = self.full_path(relative)?;
        Ok(tokio::fs::try_exists(path).await?)
    }

    /// Remove a file under the current partition.
    pub async fn remove(&self, relative: impl AsRef<Path>) -> Result<()> {
        let path = self.full_path(relative)?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}
