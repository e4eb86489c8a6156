use crate::error::AppError;
use crate::models::classify_types::{ClassifierSnapshot, SubmitOutcome};
use crate::models::intake_types::ResultCount;
use crate::services::prediction_client::HttpPredictionClient;
use crate::services::upload_classifier::UploadClassifier;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

#[tauri::command]
pub fn get_classifier_snapshot(classifier: State<'_, UploadClassifier>) -> ClassifierSnapshot {
    classifier.snapshot()
}

#[tauri::command]
pub fn set_result_count(classifier: State<'_, UploadClassifier>, value: i64) -> ResultCount {
    classifier.set_result_count(value)
}

#[tauri::command]
pub fn dismiss_notice(classifier: State<'_, UploadClassifier>) {
    classifier.dismiss_notice();
}

#[tauri::command]
pub async fn submit_image(
    app: AppHandle,
    classifier: State<'_, UploadClassifier>,
    client: State<'_, HttpPredictionClient>,
) -> Result<SubmitOutcome, AppError> {
    let outcome = classifier.submit(client.inner()).await;

    if let SubmitOutcome::Failed { notice } = &outcome {
        app.dialog()
            .message(notice.clone())
            .title("Mushroom Classifier")
            .kind(MessageDialogKind::Error)
            .show(|_| {});
    }

    let _ = app.emit("classification-finished", &outcome);
    Ok(outcome)
}
