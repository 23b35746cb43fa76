//! Checks applied to user-supplied images before they reach the scorer.

use image::{imageops, DynamicImage};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_PREVIEW_MAX_WIDTH: u32 = 800;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("no image data")]
    Empty,
    #[error("file is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("file is not a recognized image format")]
    NotAnImage,
    #[error("image could not be decoded: {0}")]
    Decode(String),
    #[error("could not read {path}: {message}")]
    Read { path: String, message: String },
}

/// A decoded upload plus a downsized RGBA preview for display.
#[derive(Clone)]
pub struct UploadedImage {
    pub id: String,
    pub image: Arc<DynamicImage>,
    pub preview: Arc<Preview>,
}

pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("id", &self.id)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

impl PartialEq for UploadedImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

pub fn read_upload(path: &Path) -> Result<Vec<u8>, UploadError> {
    std::fs::read(path).map_err(|e| UploadError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub fn decode_upload(
    bytes: &[u8],
    max_bytes: usize,
    preview_max_width: u32,
) -> Result<UploadedImage, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let format = image::guess_format(bytes).map_err(|_| UploadError::NotAnImage)?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| UploadError::Decode(e.to_string()))?;

    let preview = downscale(&image, preview_max_width).to_rgba8();

    Ok(UploadedImage {
        id: image_id(bytes),
        image: Arc::new(image),
        preview: Arc::new(Preview {
            width: preview.width(),
            height: preview.height(),
            rgba: preview.into_raw(),
        }),
    })
}

/// Shrinks to `max_width`, keeping the aspect ratio. Narrower images are
/// returned unchanged.
pub fn downscale(image: &DynamicImage, max_width: u32) -> DynamicImage {
    if image.width() <= max_width || max_width == 0 {
        return image.clone();
    }

    let height = ((max_width as f64 / image.width() as f64) * image.height() as f64).round() as u32;
    image.resize_exact(max_width, height.max(1), imageops::FilterType::Triangle)
}

pub fn image_id(bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 30, 30]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_accepts_png() {
        let bytes = png(32, 16);

        let upload = decode_upload(&bytes, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PREVIEW_MAX_WIDTH).unwrap();

        assert_eq!((upload.image.width(), upload.image.height()), (32, 16));
        assert_eq!((upload.preview.width, upload.preview.height), (32, 16));
        assert_eq!(upload.preview.rgba.len(), 32 * 16 * 4);
        assert_eq!(upload.id, image_id(&bytes));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            decode_upload(&[], DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PREVIEW_MAX_WIDTH).unwrap_err(),
            UploadError::Empty
        );
    }

    #[test]
    fn test_rejects_oversize_before_decoding() {
        let bytes = vec![0u8; 2048];
        assert_eq!(
            decode_upload(&bytes, 1024, DEFAULT_PREVIEW_MAX_WIDTH).unwrap_err(),
            UploadError::TooLarge { size: 2048, max: 1024 }
        );
    }

    #[test]
    fn test_rejects_non_image() {
        let bytes = b"%PDF-1.4 definitely not a picture".to_vec();
        assert_eq!(
            decode_upload(&bytes, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PREVIEW_MAX_WIDTH).unwrap_err(),
            UploadError::NotAnImage
        );
    }

    #[test]
    fn test_rejects_truncated_image() {
        let mut bytes = png(32, 32);
        bytes.truncate(40);
        assert!(matches!(
            decode_upload(&bytes, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PREVIEW_MAX_WIDTH),
            Err(UploadError::Decode(_))
        ));
    }

    #[test]
    fn test_preview_is_downscaled() {
        let bytes = png(1600, 400);

        let upload = decode_upload(&bytes, DEFAULT_MAX_UPLOAD_BYTES, 800).unwrap();

        assert_eq!((upload.preview.width, upload.preview.height), (800, 200));
        assert_eq!(upload.image.width(), 1600);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_upload(Path::new("/no/such/photo.jpg")).unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
    }
}
