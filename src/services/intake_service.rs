use crate::error::AppError;
use crate::models::intake_types::{ImageMime, SelectedImage};
use base64::Engine;
use std::path::Path;

/// Read a user-picked file into a `SelectedImage`.
///
/// The check is shallow: the extension must be jpg/jpeg/png, and if the
/// leading bytes identify a format it must be one of those two as well.
/// Nothing is decoded.
pub async fn load_image(path: &Path) -> Result<SelectedImage, AppError> {
    let declared = ImageMime::from_path(path).ok_or_else(|| AppError {
        message: format!("Unsupported image type: {} (expected JPG or PNG)", path.display()),
    })?;

    let bytes = tokio::fs::read(path).await.map_err(|e| AppError {
        message: format!("Failed to read image {}: {}", path.display(), e),
    })?;

    let mime = match image::guess_format(&bytes) {
        Ok(format) => match ImageMime::from_format(format) {
            Some(sniffed) => {
                if sniffed != declared {
                    log::warn!(
                        "{} has a {} extension but {} content",
                        path.display(),
                        declared.as_str(),
                        sniffed.as_str()
                    );
                }
                sniffed
            }
            None => {
                return Err(format!(
                    "Unsupported image content in {}: {:?}",
                    path.display(),
                    format
                )
                .into())
            }
        },
        // Unrecognised signature; the extension filter is all we have.
        Err(_) => declared,
    };

    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let image = SelectedImage::new(file_name, mime, bytes);
    if image.is_empty() {
        return Err(format!("Image file is empty: {}", path.display()).into());
    }

    log::debug!("Loaded {} ({} bytes, {})", image.file_name, image.len(), mime.as_str());
    Ok(image)
}

/// Encode the image as an inline `data:` URI.
pub fn preview_data_uri(image: &SelectedImage) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    format!("data:{};base64,{}", image.mime.as_str(), b64)
}

/// Build the preview off the async runtime's worker threads.
pub async fn derive_preview(image: SelectedImage) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || preview_data_uri(&image))
        .await
        .map_err(|e| AppError {
            message: format!("Preview task join failed: {}", e),
        })
}
