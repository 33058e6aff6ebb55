use crate::error::AppError;
use base64::Engine;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder};

/// Encodes a bitmap for display in the webview.
pub fn encode_png(bitmap: &DynamicImage) -> Result<String, AppError> {
    let rgba = bitmap.to_rgba8();
    let mut png_bytes = Vec::with_capacity(rgba.as_raw().len() / 2);
    PngEncoder::new_with_quality(&mut png_bytes, CompressionType::Fast, FilterType::NoFilter)
        .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ColorType::Rgba8.into())?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(&png_bytes);
    Ok(format!("data:image/png;base64,{}", b64))
}

/// Decodes a `data:image/...;base64,` URL (or bare base64) into a bitmap.
pub fn decode(data_url: &str) -> Result<DynamicImage, AppError> {
    let payload = match data_url.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => {
            if !header.ends_with(";base64") {
                return Err(format!("Unsupported data URL header: {}", header).into());
            }
            payload
        }
        _ => data_url,
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::from(format!("Invalid base64 image data: {}", e)))?;
    Ok(image::load_from_memory(&bytes)?)
}
