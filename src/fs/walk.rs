use super::{FileSource, FileSourceError, TargetFile};
use async_trait::async_trait;
use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Recursively walks a directory and keeps files whose full path matches a pattern.
///
/// Hidden files and files excluded by VCS ignore rules are included, since
/// `.env` files are usually both. Entries are visited in file-name order.
#[derive(Debug, Clone)]
pub struct DirectoryWalk {
    pattern: Regex,
}

impl DirectoryWalk {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }
}

#[async_trait]
impl<C: Sync> FileSource<C> for DirectoryWalk {
    async fn get_files(&self, path: &Path, _config: &C) -> Result<Vec<TargetFile>, FileSourceError> {
        let root = path.to_path_buf();
        let pattern = self.pattern.clone();
        let paths = tokio::task::spawn_blocking(move || matching_paths(&root, &pattern)).await??;

        debug!(
            path = %path.display(),
            pattern = %self.pattern,
            matches = paths.len(),
            "Directory walk complete"
        );

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(TargetFile::open(path).await?);
        }
        Ok(files)
    }
}

fn matching_paths(root: &Path, pattern: &Regex) -> Result<Vec<PathBuf>, FileSourceError> {
    if !root.exists() {
        return Err(FileSourceError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(FileSourceError::NotADirectory(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.io_error().is_some() => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
            Err(source) => {
                return Err(FileSourceError::Walk {
                    path: root.to_path_buf(),
                    source,
                })
            }
        };

        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && pattern.is_match(&entry.path().to_string_lossy()) {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}
