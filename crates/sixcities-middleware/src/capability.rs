//! Collaborator interfaces consumed by the guard and upload stages.
//!
//! Domain modules implement these; the stages only call them.

use bytes::Bytes;
use sixcities_core::BoxFuture;

/// Existence check for one entity kind.
pub trait DocumentExists: Send + Sync + 'static {
    /// `true` if an entity with `id` is stored.
    fn exists_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>>;
}

/// A file received in a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

impl UploadedFile {
    /// Extension of the client file name, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    }
}

/// Persistent storage for uploaded files.
pub trait FileStorage: Send + Sync + 'static {
    /// Stores `file` and returns the name it was stored under.
    fn save(&self, file: UploadedFile) -> BoxFuture<'_, anyhow::Result<String>>;
}
