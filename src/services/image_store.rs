use crate::error::AppError;
use crate::models::activity_types::ContentUri;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::PathBuf;

pub const PNG_MIME: &str = "image/png";
pub const DISPLAY_NAME_PREFIX: &str = "Mushroom_Images";

/// Opens picked content and creates new image entries.
pub trait ContentResolver {
    /// `Ok(None)` when the content no longer exists.
    fn open_input(&self, uri: &ContentUri) -> Result<Option<Box<dyn Read>>, AppError>;

    /// Creates an empty entry. `Ok(None)` when the store refuses it.
    fn insert(&mut self, display_name: &str, mime_type: &str) -> Result<Option<ContentUri>, AppError>;

    fn open_output(&mut self, uri: &ContentUri) -> Result<Box<dyn Write>, AppError>;

    fn delete(&mut self, uri: &ContentUri) -> Result<(), AppError>;
}

pub fn display_name(timestamp_secs: i64) -> String {
    format!("{}{}", DISPLAY_NAME_PREFIX, timestamp_secs)
}

/// Writes `bitmap` as a new PNG entry named after `timestamp_secs`.
///
/// Returns the new entry, or `None` when the store refused to create one.
/// An encoder failure removes the half-written entry and surfaces as an I/O
/// error.
pub fn save_bitmap<S: ContentResolver + ?Sized>(
    store: &mut S,
    bitmap: &DynamicImage,
    timestamp_secs: i64,
) -> Result<Option<ContentUri>, AppError> {
    let name = display_name(timestamp_secs);
    let Some(uri) = store.insert(&name, PNG_MIME)? else {
        log::warn!("Image store refused new entry {}", name);
        return Ok(None);
    };

    if let Err(e) = write_png(store, &uri, bitmap) {
        log::error!("Couldn't save the bitmap to {}: {}", uri, e);
        if let Err(cleanup) = store.delete(&uri) {
            log::warn!("Failed to remove partial entry {}: {}", uri, cleanup);
        }
        return Err(AppError::io("Couldn't save the bitmap"));
    }

    log::info!("Saved image as {}", uri);
    Ok(Some(uri))
}

fn write_png<S: ContentResolver + ?Sized>(
    store: &mut S,
    uri: &ContentUri,
    bitmap: &DynamicImage,
) -> Result<(), AppError> {
    let rgba = bitmap.to_rgba8();
    let mut output = store.open_output(uri)?;
    PngEncoder::new(&mut output).write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ColorType::Rgba8.into(),
    )?;
    output.flush()?;
    Ok(())
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        _ => "png",
    }
}

/// Image store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn path_of(uri: &ContentUri) -> Result<PathBuf, AppError> {
        uri.to_file_path()
            .ok_or_else(|| AppError::io(format!("Not a file reference: {}", uri)))
    }
}

impl ContentResolver for FsImageStore {
    fn open_input(&self, uri: &ContentUri) -> Result<Option<Box<dyn Read>>, AppError> {
        let path = Self::path_of(uri)?;
        match File::open(&path) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::io(format!("Cannot open {}: {}", path.display(), e))),
        }
    }

    fn insert(&mut self, display_name: &str, mime_type: &str) -> Result<Option<ContentUri>, AppError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            AppError::io(format!("Failed to create image directory {}: {}", self.root.display(), e))
        })?;

        let ext = extension_for(mime_type);
        for attempt in 0..100u32 {
            let file_name = if attempt == 0 {
                format!("{}.{}", display_name, ext)
            } else {
                format!("{}_{}.{}", display_name, attempt, ext)
            };
            let path = self.root.join(file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(ContentUri::from_file_path(&path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::io(format!("Cannot create {}: {}", path.display(), e)))
                }
            }
        }
        Ok(None)
    }

    fn open_output(&mut self, uri: &ContentUri) -> Result<Box<dyn Write>, AppError> {
        let path = Self::path_of(uri)?;
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| AppError::io(format!("Cannot write {}: {}", path.display(), e)))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn delete(&mut self, uri: &ContentUri) -> Result<(), AppError> {
        let path = Self::path_of(uri)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
