use crate::error::AppError;
use crate::models::classify_types::{
    ClassifierSnapshot, Prediction, SkipReason, SubmissionState, SubmitOutcome, FAILURE_NOTICE,
};
use crate::models::intake_types::{ResultCount, SelectedImage};
use crate::services::intake_service;
use crate::services::prediction_client::{PredictionRequest, PredictionService};
use crate::services::results_view;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ClassifierState {
    image: Option<SelectedImage>,
    preview: Option<String>,
    predictions: Vec<Prediction>,
    result_count: ResultCount,
    state: SubmissionState,
    last_outcome: Option<SubmissionState>,
    notice: Option<String>,
    /// Bumped on every selection and clear. Async results tagged with an older value are dropped.
    generation: u64,
}

/// Handle to the classifier's state.
///
/// Clones share the same state. The lock is only held for short synchronous
/// updates, never across the preview or network awaits.
#[derive(Clone, Default)]
pub struct UploadClassifier {
    inner: Arc<Mutex<ClassifierState>>,
}

/// A pending preview derivation for one selection.
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    pub generation: u64,
    pub image: SelectedImage,
}

/// Holds `InFlight` for the duration of a submission and puts the state back
/// to `Idle` when dropped, whichever way the submission ends.
struct InFlightGuard {
    inner: Arc<Mutex<ClassifierState>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.state = SubmissionState::Idle;
    }
}

impl UploadClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ClassifierState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept a new image. Drops the old preview, predictions and notice right away.
    pub fn select(&self, image: SelectedImage) -> PreviewTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.image = Some(image.clone());
        state.preview = None;
        state.predictions.clear();
        state.notice = None;

        log::info!(
            "Selected {} ({} bytes), generation {}",
            image.file_name,
            image.len(),
            state.generation
        );

        PreviewTicket {
            generation: state.generation,
            image,
        }
    }

    /// Apply a finished preview. Returns false if the selection it was made for is gone.
    pub fn complete_preview(&self, generation: u64, data_uri: String) -> bool {
        let mut state = self.lock();
        if state.generation != generation || state.image.is_none() {
            log::debug!(
                "Dropping stale preview for generation {} (current {})",
                generation,
                state.generation
            );
            return false;
        }
        state.preview = Some(data_uri);
        true
    }

    /// Drop a selection whose preview could not be built, so no image is left without one.
    /// Returns false if a newer selection or clear already replaced it.
    pub fn fail_preview(&self, generation: u64) -> bool {
        let mut state = self.lock();
        if state.generation != generation || state.image.is_none() {
            return false;
        }
        state.generation += 1;
        state.image = None;
        state.preview = None;
        log::warn!("Preview failed, selection dropped (generation {})", state.generation);
        true
    }

    /// Select `image` and wait for its preview. Yields the data URI if it was applied.
    pub async fn select_and_preview(&self, image: SelectedImage) -> Result<Option<String>, AppError> {
        let ticket = self.select(image);
        let data_uri = match intake_service::derive_preview(ticket.image).await {
            Ok(data_uri) => data_uri,
            Err(e) => {
                self.fail_preview(ticket.generation);
                return Err(e);
            }
        };
        if self.complete_preview(ticket.generation, data_uri.clone()) {
            Ok(Some(data_uri))
        } else {
            Ok(None)
        }
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.image = None;
        state.preview = None;
        state.predictions.clear();
        state.notice = None;
        log::info!("Cleared selection, generation {}", state.generation);
    }

    pub fn set_result_count(&self, value: i64) -> ResultCount {
        let count = ResultCount::clamped(value);
        if count.get() as i64 != value {
            log::debug!("Result count {} clamped to {}", value, count);
        }
        self.lock().result_count = count;
        count
    }

    pub fn result_count(&self) -> ResultCount {
        self.lock().result_count
    }

    pub fn has_image(&self) -> bool {
        self.lock().image.is_some()
    }

    pub fn preview(&self) -> Option<String> {
        self.lock().preview.clone()
    }

    pub fn predictions(&self) -> Vec<Prediction> {
        self.lock().predictions.clone()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.lock().state
    }

    pub fn last_outcome(&self) -> Option<SubmissionState> {
        self.lock().last_outcome
    }

    pub fn can_submit(&self) -> bool {
        let state = self.lock();
        state.image.is_some() && state.state != SubmissionState::InFlight
    }

    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }

    pub fn dismiss_notice(&self) {
        self.lock().notice = None;
    }

    pub fn snapshot(&self) -> ClassifierSnapshot {
        let state = self.lock();
        ClassifierSnapshot {
            has_image: state.image.is_some(),
            file_name: state.image.as_ref().map(|i| i.file_name.clone()),
            preview: state.preview.clone(),
            result_count: state.result_count,
            state: state.state,
            last_outcome: state.last_outcome,
            can_submit: state.image.is_some() && state.state != SubmissionState::InFlight,
            notice: state.notice.clone(),
            results: results_view::render(&state.predictions),
        }
    }

    /// Send the current image and result count to `service` once.
    ///
    /// No-op without an image or while another submission is in flight.
    /// Errors never escape: they become the failure notice and leave the
    /// current predictions as they were.
    pub async fn submit<S>(&self, service: &S) -> SubmitOutcome
    where
        S: PredictionService + ?Sized,
    {
        let (request, generation) = {
            let mut state = self.lock();
            if state.state == SubmissionState::InFlight {
                log::debug!("Submission ignored: one is already in flight");
                return SubmitOutcome::Skipped {
                    reason: SkipReason::AlreadyInFlight,
                };
            }
            let image = match state.image.clone() {
                Some(image) => image,
                None => {
                    log::debug!("Submission ignored: no image selected");
                    return SubmitOutcome::Skipped {
                        reason: SkipReason::NoImage,
                    };
                }
            };
            state.state = SubmissionState::InFlight;
            state.notice = None;
            let request = PredictionRequest {
                image,
                result_count: state.result_count,
            };
            (request, state.generation)
        };
        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
        };

        let result = service.predict(request).await;

        let outcome = {
            let mut state = self.lock();
            match result {
                Ok(predictions) => {
                    if state.generation == generation {
                        state.state = SubmissionState::Success;
                        state.last_outcome = Some(SubmissionState::Success);
                        let count = predictions.len();
                        state.predictions = predictions;
                        log::info!("Received {} predictions", count);
                        SubmitOutcome::Classified { count }
                    } else {
                        log::info!(
                            "Discarding predictions for generation {} (current {})",
                            generation,
                            state.generation
                        );
                        SubmitOutcome::Superseded
                    }
                }
                Err(err) => {
                    log::error!("Classification failed: {}", err);
                    state.state = SubmissionState::Error;
                    state.last_outcome = Some(SubmissionState::Error);
                    state.notice = Some(FAILURE_NOTICE.to_string());
                    SubmitOutcome::Failed {
                        notice: FAILURE_NOTICE.to_string(),
                    }
                }
            }
        };

        drop(guard);
        outcome
    }
}
