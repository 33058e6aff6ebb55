use serde::Serialize;

/// Minimum top score for a label to be shown. Inclusive.
pub const THRESHOLD: f32 = 0.4;

pub const NOT_RECOGNIZED_TEXT: &str = "Object not recognized";
pub const NO_OUTPUT_TEXT: &str = "No output from model";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    pub score: f32,
}

impl Category {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// What the presenter decided to show for one classification call.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Outcome {
    Recognized(String),
    NotRecognized,
    NoOutput,
}

impl Outcome {
    pub fn display_text(&self) -> &str {
        match self {
            Outcome::Recognized(label) => label,
            Outcome::NotRecognized => NOT_RECOGNIZED_TEXT,
            Outcome::NoOutput => NO_OUTPUT_TEXT,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ModelStatus {
    pub ready: bool,
    pub error: Option<String>,
}
