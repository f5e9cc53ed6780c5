//! URL image cache
//!
//! Logos are referenced by URL. Each URL is downloaded once and kept on disk
//! under the hex SHA-256 of the URL, so repeated receipts never hit the
//! network again. A cache file that no longer decodes is treated as a miss.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::DynamicImage;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ImageCacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Bad status code: {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Anything that can turn an image URL into a decoded image
///
/// Called from blocking render code, never from an async context.
pub trait ImageSource: Send + Sync {
    fn load(&self, url: &str) -> Result<DynamicImage, ImageCacheError>;
}

/// Disk-backed image cache keyed by URL hash
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    /// Create a cache rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache file path for a URL
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.dir.join(hex::encode(Sha256::digest(url.as_bytes())))
    }

    fn read_cached(&self, path: &Path) -> Option<DynamicImage> {
        let bytes = std::fs::read(path).ok()?;
        match image::load_from_memory(&bytes) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cached image is corrupt, re-downloading");
                None
            }
        }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ImageCacheError> {
        // Blocking client is built and dropped on the calling (blocking) thread
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| ImageCacheError::Http(e.to_string()))?;

        let resp = client
            .get(url)
            .send()
            .map_err(|e| ImageCacheError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ImageCacheError::Status(resp.status().as_u16()));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| ImageCacheError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Atomic write: tmp file + rename
    fn store(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }
}

impl ImageSource for ImageCache {
    #[instrument(skip(self))]
    fn load(&self, url: &str) -> Result<DynamicImage, ImageCacheError> {
        let path = self.cache_path(url);

        if let Some(img) = self.read_cached(&path) {
            debug!("Image cache hit");
            return Ok(img);
        }

        let bytes = self.download(url)?;

        // A failed cache write only costs a re-download next time
        if let Err(e) = self.store(&path, &bytes) {
            warn!(error = %e, "Failed to write image cache");
        }

        let img = image::load_from_memory(&bytes)?;
        info!(size = bytes.len(), "Image downloaded");
        Ok(img)
    }
}
