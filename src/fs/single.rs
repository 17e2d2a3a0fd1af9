use super::{FileSource, FileSourceError, TargetFile};
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Treats the plugin path as exactly one file
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleFile;

#[async_trait]
impl<C: Sync> FileSource<C> for SingleFile {
    async fn get_files(&self, path: &Path, _config: &C) -> Result<Vec<TargetFile>, FileSourceError> {
        debug!(path = %path.display(), "Opening single file");
        Ok(vec![TargetFile::open(path).await?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_single_file_returns_one_target() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom-environment-variables.json");
        fs::write(&path, "{}").unwrap();

        let files = SingleFile.get_files(&path, &()).await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, path);
    }

    #[tokio::test]
    async fn test_single_file_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.json");

        let err = SingleFile.get_files(&path, &()).await.unwrap_err();

        match err {
            FileSourceError::Open { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected Open error, got {:?}", other),
        }
    }
}
