use crate::models::intake_types::ResultCount;
use serde::{Deserialize, Serialize};

/// Generic message shown for every failed submission.
pub const FAILURE_NOTICE: &str = "Failed to classify mushroom. Please try again.";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    /// Species label as sent by the service, e.g. `Amanita_muscaria`.
    pub name: String,
    pub confidence: f64,
}

impl Prediction {
    /// Label with `_` separators replaced by spaces. Display only.
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }
}

/// Body of a successful prediction response.
#[derive(Debug, Deserialize, Clone)]
pub struct PredictResponse {
    pub top_n: Vec<Prediction>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Error,
    Success,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoImage,
    AlreadyInFlight,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Skipped { reason: SkipReason },
    /// Predictions were received and stored.
    Classified { count: usize },
    /// Predictions were received for an image that has since been replaced or cleared.
    /// They are discarded and `last_outcome` is left as it was.
    Superseded,
    /// The request failed; the failure notice is showing.
    Failed { notice: String },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResultRow {
    pub rank: usize,
    pub label: String,
    pub confidence: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsView {
    Empty { caption: String, placeholder: String },
    Ranked { caption: String, rows: Vec<ResultRow> },
}

/// Everything the UI layer needs to draw the classifier.
#[derive(Debug, Serialize, Clone)]
pub struct ClassifierSnapshot {
    pub has_image: bool,
    pub file_name: Option<String>,
    pub preview: Option<String>,
    pub result_count: ResultCount,
    pub state: SubmissionState,
    pub last_outcome: Option<SubmissionState>,
    pub can_submit: bool,
    pub notice: Option<String>,
    pub results: ResultsView,
}
