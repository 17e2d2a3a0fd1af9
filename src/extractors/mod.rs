// Extractors turn an opened file into named result fields.
// Plugins combine these building blocks with their own field names and patterns.

pub mod json;
pub mod lines;

pub use json::collect_string_values;
pub use lines::LinePatternExtractor;

use crate::pipeline::ResultSet;
use async_trait::async_trait;
use std::io;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses one file into a [`ResultSet`].
///
/// The file handle is consumed so it is released as soon as extraction ends.
#[async_trait]
pub trait Extractor<C: Sync>: Send + Sync {
    async fn extract(&self, file: File, config: &C) -> Result<ResultSet, ExtractError>;
}

/// Reads the whole file into memory
pub async fn read_to_string(mut file: File) -> Result<String, ExtractError> {
    let mut content = String::new();
    file.read_to_string(&mut content).await?;
    Ok(content)
}
