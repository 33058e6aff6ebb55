use crate::error::AppError;
use crate::services::classifier::inference::{
    InputSpec, OnnxClassifier, DEFAULT_INPUT_SIZE, MAX_INPUT_SIZE, MEAN, STD,
};
use ort::session::Session;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const MODEL_FILE: &str = "model.onnx";
pub const CONFIG_FILE: &str = "config.json";
pub const MAX_LABELS: usize = 100_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    #[default]
    Logits,
    Probabilities,
}

fn default_image_size() -> u32 {
    DEFAULT_INPUT_SIZE
}

fn default_mean() -> [f32; 3] {
    MEAN
}

fn default_std() -> [f32; 3] {
    STD
}

/// Contents of the `config.json` shipped next to the model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub id2label: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    #[serde(default = "default_mean")]
    pub image_mean: [f32; 3],
    #[serde(default = "default_std")]
    pub image_std: [f32; 3],
    #[serde(default)]
    pub output: OutputKind,
}

impl ModelConfig {
    pub fn parse(content: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(content)?;
        if config.image_size == 0 || config.image_size > MAX_INPUT_SIZE {
            return Err(AppError::model(format!(
                "image_size must be between 1 and {}, got {}",
                MAX_INPUT_SIZE, config.image_size
            )));
        }
        Ok(config)
    }

    /// Labels ordered by class index. Gaps in `id2label` become `class_<n>`.
    pub fn labels(&self) -> Result<Vec<String>, AppError> {
        let mut indexed: Vec<(usize, String)> = self
            .id2label
            .iter()
            .filter_map(|(k, v)| {
                let idx = k.parse::<usize>().ok()?;
                let label = v.as_str().unwrap_or("unknown").to_string();
                Some((idx, label))
            })
            .collect();
        indexed.sort_by_key(|(idx, _)| *idx);

        let len = match indexed.last() {
            Some((idx, _)) => idx
                .checked_add(1)
                .filter(|len| *len <= MAX_LABELS)
                .ok_or_else(|| {
                    AppError::model(format!("id2label index {} exceeds {} classes", idx, MAX_LABELS))
                })?,
            None => 0,
        };
        let mut labels: Vec<String> = (0..len).map(|i| format!("class_{}", i)).collect();
        for (idx, label) in indexed {
            labels[idx] = label;
        }
        Ok(labels)
    }

    pub fn input_spec(&self) -> InputSpec {
        InputSpec {
            size: self.image_size,
            mean: self.image_mean,
            std: self.image_std,
        }
    }
}

/// Locates the bundled model and builds a classifier from it.
#[derive(Clone, Debug)]
pub struct ModelManager {
    pub model_dir: PathBuf,
    intra_threads: usize,
}

impl ModelManager {
    pub fn new(model_dir: PathBuf, intra_threads: usize) -> Self {
        Self {
            model_dir,
            intra_threads: intra_threads.max(1),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.model_dir.join(CONFIG_FILE)
    }

    pub fn is_available(&self) -> bool {
        self.model_path().exists() && self.config_path().exists()
    }

    pub fn load_config(&self) -> Result<ModelConfig, AppError> {
        let config_path = self.config_path();
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            AppError::model(format!("Failed to read config file {}: {}", config_path.display(), e))
        })?;
        ModelConfig::parse(&content)
    }

    /// Blocking; runs on the caller's thread.
    pub fn load(&self) -> Result<OnnxClassifier, AppError> {
        let config = self.load_config()?;
        let model_path = self.model_path();
        if !model_path.exists() {
            return Err(AppError::model(format!("Model not found at {}", model_path.display())));
        }

        let session = build_session(&model_path, self.intra_threads)?;
        let classifier = OnnxClassifier::new(session, &config)?;
        log::info!(
            "Loaded model {} with {} labels",
            model_path.display(),
            classifier.labels().len()
        );
        Ok(classifier)
    }
}

fn build_session(model_path: &Path, intra_threads: usize) -> Result<Session, AppError> {
    let _ = ort::init().with_name("mushroom-lens").commit();

    let session = Session::builder()
        .map_err(|e| AppError::model(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
        .map_err(|e| AppError::model(format!("Failed to set optimization level: {}", e)))?
        .with_intra_threads(intra_threads)
        .map_err(|e| AppError::model(format!("Failed to set intra threads: {}", e)))?
        .with_execution_providers([
            ort::execution_providers::CPUExecutionProvider::default().build(),
        ])
        .map_err(|e| AppError::model(format!("Failed to register CPU execution provider: {}", e)))?
        .commit_from_file(model_path)
        .map_err(|e| AppError::model(format!("Failed to load ONNX model: {}", e)))?;

    Ok(session)
}
