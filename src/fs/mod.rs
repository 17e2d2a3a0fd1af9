//! File sources: locate the files a plugin scans and open them for extraction
//!
//! A [`FileSource`] turns a plugin's target path into an ordered list of
//! [`TargetFile`]s. Handles are opened here and handed to the extractor by
//! value, so each handle is read once and closed when extraction finishes.

mod single;
mod walk;

pub use single::SingleFile;
pub use walk::DirectoryWalk;

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;

/// An opened file together with the path it was found at
#[derive(Debug)]
pub struct TargetFile {
    pub path: PathBuf,
    pub file: File,
}

impl TargetFile {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, FileSourceError> {
        let path = path.into();
        let file = File::open(&path)
            .await
            .map_err(|source| FileSourceError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }
}

#[derive(Debug, Error)]
pub enum FileSourceError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Directory walk task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Produces the files a plugin should extract from
#[async_trait]
pub trait FileSource<C: Sync>: Send + Sync {
    async fn get_files(&self, path: &Path, config: &C) -> Result<Vec<TargetFile>, FileSourceError>;
}
