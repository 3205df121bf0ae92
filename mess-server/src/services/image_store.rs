//! Image Store Service
//!
//! 菜品图片存储：校验、统一转 JPEG、按内容哈希命名。
//!
//! Files are named by the SHA-256 of their compressed bytes, so the same
//! picture uploaded twice lands on the same file and needs no extra
//! deduplication bookkeeping.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::utils::AppError;

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for dish images
const JPEG_QUALITY: u8 = 85;

/// URL prefix under which stored images are served
pub const IMAGE_URL_PREFIX: &str = "/uploads/images/";

/// A stored image, as reported back to the uploader
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct ImageStoreService {
    images_dir: PathBuf,
}

impl ImageStoreService {
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Validate, re-encode as JPEG and persist an uploaded image
    pub async fn store(&self, data: Vec<u8>, original_name: &str) -> Result<StoredImage, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }

        let ext = PathBuf::from(original_name)
            .extension()
            .and_then(|e| e.to_str().map(|s| s.to_lowercase()))
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {original_name}"))
            })?;

        validate_image(&data, &ext)?;

        let compressed = compress_to_jpeg(&data)?;
        let hash = calculate_hash(&compressed);
        let filename = format!("{hash}.jpg");
        let file_path = self.images_dir.join(&filename);

        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create images directory: {e}")))?;

        if !file_path.exists() {
            tokio::fs::write(&file_path, &compressed)
                .await
                .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;
        } else {
            tracing::info!(original_name, filename, "Duplicate image, reusing existing file");
        }

        tracing::info!(
            original_name,
            size = compressed.len(),
            hash = %hash,
            "Image stored"
        );

        Ok(StoredImage {
            url: format!("{IMAGE_URL_PREFIX}{filename}"),
            filename,
            original_name: original_name.to_string(),
            size: compressed.len(),
        })
    }

    /// Best-effort removal of a stored image by its public URL.
    /// URLs pointing elsewhere are ignored.
    pub async fn remove_by_url(&self, url: &str) {
        let Some(filename) = url.strip_prefix(IMAGE_URL_PREFIX) else {
            return;
        };
        if filename.is_empty() || filename.contains("..") || filename.contains('/') {
            return;
        }

        let file_path = self.images_dir.join(filename);
        match tokio::fs::remove_file(&file_path).await {
            Ok(_) => tracing::info!(filename, "Removed image file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(filename, error = %e, "Failed to remove image file"),
        }
    }
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    }

    Ok(buffer)
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({ext}): {e}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 120, 40]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn store_names_file_by_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStoreService::new(dir.path().to_path_buf());

        let first = store.store(tiny_png(), "dosa.png").await.unwrap();
        let second = store.store(tiny_png(), "same-dosa.png").await.unwrap();

        assert_eq!(first.filename, second.filename);
        assert!(first.url.starts_with(IMAGE_URL_PREFIX));
        assert!(dir.path().join(&first.filename).exists());
    }

    #[tokio::test]
    async fn remove_by_url_deletes_only_own_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStoreService::new(dir.path().to_path_buf());

        let stored = store.store(tiny_png(), "idli.png").await.unwrap();
        let path = dir.path().join(&stored.filename);
        assert!(path.exists());

        // Foreign URL is a no-op
        store.remove_by_url("https://cdn.example.com/pic.jpg").await;
        assert!(path.exists());

        store.remove_by_url(&stored.url).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn rejects_non_image_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStoreService::new(dir.path().to_path_buf());

        let err = store.store(b"not an image".to_vec(), "menu.png").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStoreService::new(dir.path().to_path_buf());

        let err = store.store(tiny_png(), "menu.gif").await;
        assert!(err.is_err());
    }
}
