use std::path::PathBuf;

use tracing::warn;
use uuid::Uuid;

use crate::web::error::AppError;

/// Subdirectory of the media root holding recipe images.
pub const RECIPE_IMAGE_DIR: &str = "recipes";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Identifies the payload from its magic number.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Durable file store for uploaded media, rooted at a configured directory.
/// Stored paths are always relative to the root.
#[derive(Clone, Debug)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Writes the payload under a fresh random name and returns the relative
    /// path. Client-supplied filenames are never used; the extension comes
    /// from the sniffed format.
    pub async fn store_image(&self, data: &[u8]) -> Result<String, AppError> {
        let format = ImageFormat::sniff(data).ok_or_else(|| {
            AppError::InvalidInput("Uploaded payload is not a recognized image.".to_string())
        })?;

        let relative = format!("{RECIPE_IMAGE_DIR}/{}.{}", Uuid::new_v4(), format.extension());
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::InternalServerError(format!("Failed to create media directory: {e}"))
            })?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::InternalServerError(format!("Failed to write image file: {e}")))?;
        Ok(relative)
    }

    /// Best-effort delete; a file that is already gone is not an error.
    pub async fn remove(&self, relative: &str) {
        let path = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to remove stored media file.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\nrest-of-file";

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(ImageFormat::sniff(PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a......"), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::sniff(b"RIFF\x24\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
    }

    #[test]
    fn test_sniff_rejects_arbitrary_bytes() {
        assert_eq!(ImageFormat::sniff(b"not an image"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
        // RIFF container that is not WebP
        assert_eq!(ImageFormat::sniff(b"RIFF\x24\x00\x00\x00WAVEfmt "), None);
    }

    #[tokio::test]
    async fn test_store_and_remove_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let relative = store.store_image(PNG_MAGIC).await.unwrap();
        assert!(relative.starts_with("recipes/"));
        assert!(relative.ends_with(".png"));
        assert!(store.absolute(&relative).exists());

        store.remove(&relative).await;
        assert!(!store.absolute(&relative).exists());

        // Removing again is a no-op.
        store.remove(&relative).await;
    }

    #[tokio::test]
    async fn test_store_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let result = store.store_image(b"plain text payload").await;
        assert!(result.is_err());
    }
}
