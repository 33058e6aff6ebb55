//! Bitmap to display text, one stage at a time.
//!
//! `Bitmap` → [`normalize`] → `RgbaImage` → [`to_tensor`] → [`TensorImage`]
//! → [`infer`] → `Vec<Category>` → [`presenter::present`] → [`Outcome`].

use crate::error::AppError;
use crate::models::classify_types::{Category, Outcome};
use crate::services::classifier::inference::{self, ImageClassifier, InputSpec, TensorImage};
use crate::services::presenter;
use image::{DynamicImage, RgbaImage};
use std::time::Instant;

pub fn normalize(bitmap: &DynamicImage) -> RgbaImage {
    inference::normalize_bitmap(bitmap)
}

pub fn to_tensor(pixels: &RgbaImage, spec: &InputSpec) -> Result<TensorImage, AppError> {
    TensorImage::from_rgba(pixels, spec)
}

pub fn infer<C: ImageClassifier + ?Sized>(
    classifier: &mut C,
    tensor: &TensorImage,
) -> Result<Vec<Category>, AppError> {
    let mut categories = classifier.process(tensor)?;
    inference::sort_descending(&mut categories);
    Ok(categories)
}

/// Runs every stage on the calling thread.
pub fn run<C: ImageClassifier + ?Sized>(
    classifier: &mut C,
    bitmap: &DynamicImage,
) -> Result<Outcome, AppError> {
    let start = Instant::now();
    let pixels = normalize(bitmap);
    let tensor = to_tensor(&pixels, classifier.input_spec())?;
    let categories = infer(classifier, &tensor)?;
    log::debug!(
        "Classified {}x{} bitmap in {:?}",
        bitmap.width(),
        bitmap.height(),
        start.elapsed()
    );
    Ok(presenter::present(&categories))
}
