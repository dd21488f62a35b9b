//! Media storage for uploaded images and synthesized audio
//!
//! Files are written once under a generated UUID and never cleaned up. Each
//! request gets a fresh identifier, so concurrent requests never contend for
//! the same path.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Error, Result};

/// Location of a stored upload
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Identifier the file was stored under
    pub id: Uuid,
    /// Full path to the stored file
    pub path: PathBuf,
}

/// Location of a stored audio artifact
#[derive(Debug, Clone)]
pub struct StoredAudio {
    /// Filename within the audio directory
    pub filename: String,
    /// Full path to the stored file
    pub path: PathBuf,
}

/// Flat-directory store for uploads and audio artifacts
#[derive(Debug, Clone)]
pub struct MediaStore {
    upload_dir: PathBuf,
    audio_dir: PathBuf,
}

impl MediaStore {
    /// Create a store, creating both directories if absent
    ///
    /// # Errors
    ///
    /// Returns error if a directory cannot be created
    pub fn new(upload_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        let audio_dir = audio_dir.into();
        for dir in [&upload_dir, &audio_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Storage(format!("failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(Self {
            upload_dir,
            audio_dir,
        })
    }

    /// Persist an uploaded image under a fresh UUID
    ///
    /// The extension of the client-supplied filename is carried over when
    /// present so the stored file keeps a recognizable type.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails
    pub async fn save_upload(&self, data: &[u8], original_filename: &str) -> Result<StoredUpload> {
        let id = Uuid::new_v4();
        let filename = match Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
        {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        };
        let path = self.upload_dir.join(filename);
        tokio::fs::write(&path, data).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "upload stored");
        Ok(StoredUpload { id, path })
    }

    /// Persist synthesized audio as `{uuid}.mp3`
    ///
    /// # Errors
    ///
    /// Returns error if the write fails
    pub async fn save_audio(&self, data: &[u8]) -> Result<StoredAudio> {
        let filename = format!("{}.mp3", Uuid::new_v4());
        let path = self.audio_dir.join(&filename);
        tokio::fs::write(&path, data).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "audio stored");
        Ok(StoredAudio { filename, path })
    }

    /// Resolve a stored audio file by name
    ///
    /// Returns `None` when the file does not exist or the name fails the
    /// traversal guard (path separators or parent references).
    #[must_use]
    pub fn resolve_audio(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        let path = self.audio_dir.join(filename);
        path.is_file().then_some(path)
    }

    /// Upload directory path
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Audio directory path
    #[must_use]
    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().join("uploads"), dir.path().join("audio")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn upload_keeps_extension() {
        let (_dir, store) = temp_store();
        let stored = store.save_upload(b"bytes", "photo.png").await.unwrap();
        assert_eq!(stored.path.extension().unwrap(), "png");
        assert!(stored.path.is_file());
    }

    #[tokio::test]
    async fn upload_without_extension() {
        let (_dir, store) = temp_store();
        let stored = store.save_upload(b"bytes", "photo").await.unwrap();
        assert!(stored.path.extension().is_none());
    }

    #[tokio::test]
    async fn uploads_never_collide() {
        let (_dir, store) = temp_store();
        let a = store.save_upload(b"same", "a.jpg").await.unwrap();
        let b = store.save_upload(b"same", "b.jpg").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.path, b.path);
    }

    #[tokio::test]
    async fn audio_roundtrip() {
        let (_dir, store) = temp_store();
        let stored = store.save_audio(b"mp3").await.unwrap();
        let resolved = store.resolve_audio(&stored.filename).unwrap();
        assert_eq!(resolved, stored.path);
    }

    #[test]
    fn traversal_names_rejected() {
        let (_dir, store) = temp_store();
        assert!(store.resolve_audio("../secret.mp3").is_none());
        assert!(store.resolve_audio("a/b.mp3").is_none());
        assert!(store.resolve_audio("..\\evil.mp3").is_none());
        assert!(store.resolve_audio("").is_none());
    }

    #[test]
    fn missing_audio_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.resolve_audio("does-not-exist.mp3").is_none());
    }
}
