use crate::models::classify_types::{Category, Outcome, THRESHOLD};

/// Picks what to show for a sorted category list.
pub fn present(categories: &[Category]) -> Outcome {
    let Some(first) = categories.first() else {
        log::error!("No output from model");
        return Outcome::NoOutput;
    };

    if first.score >= THRESHOLD {
        log::info!("Recognized {:?} ({:.3})", first.label, first.score);
        Outcome::Recognized(first.label.clone())
    } else {
        log::info!("Object not recognized (best {:?} at {:.3})", first.label, first.score);
        Outcome::NotRecognized
    }
}
