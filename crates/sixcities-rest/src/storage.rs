//! Uploaded files on the local disk.

use bytes::Bytes;
use sixcities_core::BoxFuture;
use sixcities_middleware::{FileStorage, UploadedFile};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes uploads into one directory under random names.
#[derive(Debug, Clone)]
pub struct DiskFileStorage {
    directory: PathBuf,
}

impl DiskFileStorage {
    /// Stores files under `directory`. See [`ensure_dir`](Self::ensure_dir).
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The upload directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the upload directory if it is missing.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await
    }

    /// Whether `name` has the shape of a name handed out by [`save`](FileStorage::save):
    /// a hyphenated UUID plus an optional lowercase alphanumeric extension.
    ///
    /// Anything else, including names with separators or `..`, is never read.
    pub fn is_stored_name(name: &str) -> bool {
        let (stem, ext) = match name.split_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (name, None),
        };
        let ext_ok = ext.map_or(true, |ext| {
            !ext.is_empty()
                && ext
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });
        stem.len() == 36 && Uuid::try_parse(stem).is_ok() && ext_ok
    }

    /// Contents of the stored file `name`, or `None` when there is no such file.
    pub async fn read(&self, name: &str) -> anyhow::Result<Option<Bytes>> {
        if !Self::is_stored_name(name) {
            return Ok(None);
        }
        let path = self.directory.join(name);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(anyhow::Error::new(e).context(format!("failed to read {}", path.display())))
            }
        }
    }

    fn stored_name(file: &UploadedFile) -> String {
        let id = Uuid::new_v4();
        match file.extension() {
            Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
            None => id.to_string(),
        }
    }
}

impl FileStorage for DiskFileStorage {
    fn save(&self, file: UploadedFile) -> BoxFuture<'_, anyhow::Result<String>> {
        Box::pin(async move {
            let name = Self::stored_name(&file);
            let path = self.directory.join(&name);
            tokio::fs::write(&path, &file.data).await.map_err(|e| {
                anyhow::Error::new(e).context(format!("failed to write {}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), bytes = file.data.len(), "upload stored");
            Ok(name)
        })
    }
}

/// Content type served for a stored file name.
pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}
