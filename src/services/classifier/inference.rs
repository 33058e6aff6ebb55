use crate::error::AppError;
use crate::models::classify_types::Category;
use crate::services::classifier::model_manager::{ModelConfig, OutputKind};
use image::{DynamicImage, RgbaImage};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

// ImageNet normalization constants
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

pub const DEFAULT_INPUT_SIZE: u32 = 224;
pub const MAX_INPUT_SIZE: u32 = 4096;

/// Shape and normalization the model expects from its single image input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            size: DEFAULT_INPUT_SIZE,
            mean: MEAN,
            std: STD,
        }
    }
}

/// NCHW float tensor ready for a forward pass.
#[derive(Debug, Clone)]
pub struct TensorImage {
    pub tensor: Array4<f32>,
}

impl TensorImage {
    pub fn from_rgba(pixels: &RgbaImage, spec: &InputSpec) -> Result<Self, AppError> {
        let size = spec.size;
        if size == 0 || size > MAX_INPUT_SIZE {
            return Err(AppError::model(format!(
                "Model input size must be between 1 and {}, got {}",
                MAX_INPUT_SIZE, size
            )));
        }

        let resized = image::imageops::resize(
            pixels,
            size,
            size,
            image::imageops::FilterType::Triangle,
        );

        // Alpha is dropped; the model sees three planes.
        let hw = size as usize * size as usize;
        let mut data = vec![0f32; 3 * hw];
        for (i, pixel) in resized.pixels().enumerate() {
            for c in 0..3 {
                data[c * hw + i] = (pixel[c] as f32 / 255.0 - spec.mean[c]) / spec.std[c];
            }
        }

        let tensor = Array4::from_shape_vec((1, 3, size as usize, size as usize), data)
            .map_err(|e| AppError::model(format!("Failed to create tensor: {}", e)))?;

        Ok(Self { tensor })
    }

    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }
}

/// Copies any decoded bitmap into the fixed 4-channel layout used downstream.
pub fn normalize_bitmap(bitmap: &DynamicImage) -> RgbaImage {
    bitmap.to_rgba8()
}

/// Turns raw model scores into labelled categories, highest score first.
pub fn scores_to_categories(scores: &[f32], labels: &[String], output: OutputKind) -> Vec<Category> {
    let probabilities: Vec<f32> = match output {
        OutputKind::Probabilities => scores.to_vec(),
        OutputKind::Logits => softmax(scores),
    };

    let mut categories: Vec<Category> = probabilities
        .into_iter()
        .enumerate()
        .map(|(idx, score)| {
            let label = labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", idx));
            Category { label, score }
        })
        .collect();
    sort_descending(&mut categories);
    categories
}

pub fn sort_descending(categories: &mut [Category]) {
    categories.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max_logit = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp_sum: f32 = logits.iter().map(|&x| (x - max_logit).exp()).sum();
    logits.iter().map(|&x| (x - max_logit).exp() / exp_sum).collect()
}

/// Anything that can score a tensor image. The ONNX session is the real one.
pub trait ImageClassifier {
    fn input_spec(&self) -> &InputSpec;

    /// One synchronous forward pass. The result is sorted, highest score first.
    fn process(&mut self, image: &TensorImage) -> Result<Vec<Category>, AppError>;
}

pub struct OnnxClassifier {
    session: Session,
    labels: Vec<String>,
    spec: InputSpec,
    output: OutputKind,
}

impl OnnxClassifier {
    pub fn new(session: Session, config: &ModelConfig) -> Result<Self, AppError> {
        Ok(Self {
            session,
            labels: config.labels()?,
            spec: config.input_spec(),
            output: config.output,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl ImageClassifier for OnnxClassifier {
    fn input_spec(&self) -> &InputSpec {
        &self.spec
    }

    fn process(&mut self, image: &TensorImage) -> Result<Vec<Category>, AppError> {
        // Single image input
        let input_name = self.session.inputs()[0].name().to_string();

        let input_tensor = Value::from_array(image.tensor.clone())
            .map_err(|e| AppError::model(format!("Failed to create tensor value: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![input_name.as_str() => input_tensor])
            .map_err(|e| AppError::model(format!("Inference failed: {}", e)))?;

        let output_value = outputs
            .values()
            .next()
            .ok_or_else(|| AppError::model("Model produced no outputs"))?;

        let (_, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| AppError::model(format!("Failed to extract output tensor: {}", e)))?;

        Ok(scores_to_categories(data, &self.labels, self.output))
    }
}
