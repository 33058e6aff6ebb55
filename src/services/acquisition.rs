use crate::error::AppError;
use crate::models::activity_types::{ActivityResult, ContentUri, GalleryRequest, RequestToken, ResultCode};
use crate::services::dispatcher::Continuation;
use crate::services::host::Host;
use crate::services::image_store::ContentResolver;
use image::DynamicImage;
use std::io::Read;

/// Something that produces a bitmap through a host round trip.
pub trait ImageSource {
    /// Continuation the dispatcher parks while the host is busy.
    fn continuation(&self) -> Continuation;

    fn launch<H: Host>(&self, host: &mut H, token: RequestToken);

    /// Turns the host's answer into a bitmap. `None` means nothing to show.
    fn accept<S: ContentResolver + ?Sized>(&self, result: ActivityResult, store: &S) -> Option<DynamicImage>;
}

/// Live preview capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct CameraSource;

impl ImageSource for CameraSource {
    fn continuation(&self) -> Continuation {
        Continuation::CameraPreview
    }

    fn launch<H: Host>(&self, host: &mut H, token: RequestToken) {
        host.launch_camera_preview(token);
    }

    fn accept<S: ContentResolver + ?Sized>(&self, result: ActivityResult, _store: &S) -> Option<DynamicImage> {
        match result {
            ActivityResult::CameraPreview(Some(bitmap)) => Some(bitmap),
            ActivityResult::CameraPreview(None) => {
                log::debug!("Camera preview cancelled");
                None
            }
            other => {
                log::warn!("Camera got unexpected {} result", other.name());
                None
            }
        }
    }
}

/// System picker limited to the gallery mime types.
#[derive(Debug, Default, Clone)]
pub struct GallerySource {
    pub request: GalleryRequest,
}

impl ImageSource for GallerySource {
    fn continuation(&self) -> Continuation {
        Continuation::GalleryPick
    }

    fn launch<H: Host>(&self, host: &mut H, token: RequestToken) {
        host.launch_gallery(&self.request, token);
    }

    fn accept<S: ContentResolver + ?Sized>(&self, result: ActivityResult, store: &S) -> Option<DynamicImage> {
        let (code, data) = match result {
            ActivityResult::Gallery { code, data } => (code, data),
            other => {
                log::warn!("Gallery got unexpected {} result", other.name());
                return None;
            }
        };

        if code != ResultCode::Ok {
            log::error!("Error in selecting image (result code {:?})", code);
            return None;
        }

        let uri = data?;
        log::info!("Picked {}", uri);
        match read_bitmap(store, &uri) {
            Ok(Some(bitmap)) => Some(bitmap),
            Ok(None) => {
                log::error!("No content behind {}", uri);
                None
            }
            Err(e) => {
                log::error!("Failed to decode {}: {}", uri, e);
                None
            }
        }
    }
}

/// Opens picked content through the resolver and decodes it.
pub fn read_bitmap<S: ContentResolver + ?Sized>(
    store: &S,
    uri: &ContentUri,
) -> Result<Option<DynamicImage>, AppError> {
    let Some(mut reader) = store.open_input(uri)? else {
        return Ok(None);
    };
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(Some(image::load_from_memory(&bytes)?))
}
