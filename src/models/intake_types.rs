use crate::error::AppError;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// File extensions offered by the file picker filter.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "png" => Some(ImageMime::Png),
            _ => None,
        }
    }

    pub fn from_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageMime::Jpeg),
            image::ImageFormat::Png => Some(ImageMime::Png),
            _ => None,
        }
    }
}

/// The image the user picked. Never written anywhere.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime: ImageMime,
    pub bytes: Arc<[u8]>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, mime: ImageMime, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Number of predictions requested per submission, always within `MIN..=MAX`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ResultCount(u8);

impl ResultCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: u8 = 5;

    /// Clamps any integer input into range, the way a bounded slider does.
    pub fn clamped(value: i64) -> Self {
        ResultCount(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for ResultCount {
    fn default() -> Self {
        ResultCount(Self::DEFAULT)
    }
}

impl TryFrom<i64> for ResultCount {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(ResultCount(value as u8))
        } else {
            Err(format!(
                "Result count must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )
            .into())
        }
    }
}

impl std::fmt::Display for ResultCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
