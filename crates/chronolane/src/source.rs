//! Where raw event records come from.
//!
//! Sources hand back raw bytes; decoding and the degrade-to-empty policy live in
//! [`load_events`].

use chronolane_core::Event;
use chronolane_core::ingest::{events_from_slice, events_from_slice_strict};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported event source location: {location}")]
    UnsupportedLocation { location: String },
    #[error(transparent)]
    Decode(#[from] chronolane_core::Error),
}

pub trait EventSource: Send + Sync {
    /// Fetches the raw JSON payload.
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, SourceError>>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for FileSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, SourceError>> {
        let path = self.path.clone();
        async move { std::fs::read(&path).map_err(|source| SourceError::Io { path, source }) }
            .boxed()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory payload. Handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    bytes: Vec<u8>,
}

impl StaticSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl EventSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, SourceError>> {
        futures::future::ready(Ok(self.bytes.clone())).boxed()
    }

    fn describe(&self) -> String {
        format!("<static {} bytes>", self.bytes.len())
    }
}

/// Resolves a plain filesystem path or a `file://` URL to a source.
///
/// Single-letter schemes are treated as Windows drive letters, i.e. plain paths.
pub fn source_from_location(location: &str) -> Result<Box<dyn EventSource>, SourceError> {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| SourceError::UnsupportedLocation {
                    location: location.to_string(),
                })?;
            Ok(Box::new(FileSource::new(path)))
        }
        Ok(url) if url.scheme().len() > 1 => Err(SourceError::UnsupportedLocation {
            location: location.to_string(),
        }),
        _ => Ok(Box::new(FileSource::new(location))),
    }
}

/// Fetches and decodes events, degrading every failure to an empty list.
pub async fn load_events(source: &dyn EventSource) -> Vec<Event> {
    match source.fetch().await {
        Ok(bytes) => events_from_slice(&bytes),
        Err(err) => {
            tracing::error!(source = %source.describe(), error = %err, "failed to fetch events");
            Vec::new()
        }
    }
}

/// Like [`load_events`] but surfaces fetch and decode failures.
pub async fn load_events_strict(source: &dyn EventSource) -> Result<Vec<Event>, SourceError> {
    let bytes = source.fetch().await?;
    Ok(events_from_slice_strict(&bytes)?)
}
