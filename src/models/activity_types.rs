use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

pub const GALLERY_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Identifies one outstanding host request until its result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Ok,
    Canceled,
    Failed,
}

/// Reference to a piece of content in the image store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUri(Url);

impl ContentUri {
    pub fn from_file_path(path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(Self)
    }

    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.0.to_file_path().ok()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Picker launch parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryRequest {
    pub mime_types: Vec<String>,
    pub grant_read: bool,
}

impl Default for GalleryRequest {
    fn default() -> Self {
        Self {
            mime_types: GALLERY_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
            grant_read: true,
        }
    }
}

impl GalleryRequest {
    /// File extensions accepted by the mime filter, for pickers that filter by name.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts = Vec::new();
        for mime in &self.mime_types {
            let candidates: &[&'static str] = match mime.to_ascii_lowercase().as_str() {
                "image/jpeg" => &["jpeg", "jpg"],
                "image/jpg" => &["jpg"],
                "image/png" => &["png"],
                _ => &[],
            };
            for ext in candidates {
                if !exts.contains(ext) {
                    exts.push(*ext);
                }
            }
        }
        exts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub positive: String,
    pub negative: String,
}

impl ConfirmDialog {
    pub fn download_image() -> Self {
        Self {
            title: "Download Image?".to_string(),
            message: "Do you want to download this image to your device?".to_string(),
            positive: "Yes".to_string(),
            negative: "No".to_string(),
        }
    }
}

/// The host's answer to a request issued under some [`RequestToken`].
#[derive(Debug, Clone)]
pub enum ActivityResult {
    Permission { granted: bool },
    CameraPreview(Option<DynamicImage>),
    Gallery {
        code: ResultCode,
        data: Option<ContentUri>,
    },
    Confirm { confirmed: bool },
}

impl ActivityResult {
    pub fn name(&self) -> &'static str {
        match self {
            ActivityResult::Permission { .. } => "permission",
            ActivityResult::CameraPreview(_) => "camera_preview",
            ActivityResult::Gallery { .. } => "gallery",
            ActivityResult::Confirm { .. } => "confirm",
        }
    }
}
