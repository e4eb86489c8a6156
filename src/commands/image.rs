use crate::error::AppError;
use crate::models::classify_types::ClassifierSnapshot;
use crate::models::intake_types::ACCEPTED_EXTENSIONS;
use crate::services::intake_service;
use crate::services::upload_classifier::{PreviewTicket, UploadClassifier};
use std::path::Path;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::DialogExt;

/// Show the native file picker, restricted to JPG/PNG, and select the result.
/// Returns `None` when the user cancels.
#[tauri::command]
pub async fn pick_image(
    app: AppHandle,
    classifier: State<'_, UploadClassifier>,
) -> Result<Option<ClassifierSnapshot>, AppError> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Images", ACCEPTED_EXTENSIONS)
        .pick_file(move |picked| {
            let _ = tx.send(picked);
        });

    let picked = rx.await.map_err(|e| AppError {
        message: format!("File dialog closed unexpectedly: {}", e),
    })?;

    let Some(file_path) = picked else {
        return Ok(None);
    };

    let path = file_path.into_path().map_err(|e| AppError {
        message: format!("Unsupported file location: {}", e),
    })?;

    accept(&app, classifier.inner(), &path).await.map(Some)
}

#[tauri::command]
pub async fn select_image(
    app: AppHandle,
    classifier: State<'_, UploadClassifier>,
    path: String,
) -> Result<ClassifierSnapshot, AppError> {
    accept(&app, classifier.inner(), Path::new(&path)).await
}

#[tauri::command]
pub fn clear_image(classifier: State<'_, UploadClassifier>) -> ClassifierSnapshot {
    classifier.clear();
    classifier.snapshot()
}

async fn accept(
    app: &AppHandle,
    classifier: &UploadClassifier,
    path: &Path,
) -> Result<ClassifierSnapshot, AppError> {
    let image = intake_service::load_image(path).await?;
    let ticket = classifier.select(image);
    spawn_preview(app.clone(), classifier.clone(), ticket);
    Ok(classifier.snapshot())
}

// Fire and forget; a newer selection makes this completion a no-op.
fn spawn_preview(app: AppHandle, classifier: UploadClassifier, ticket: PreviewTicket) {
    tauri::async_runtime::spawn(async move {
        match intake_service::derive_preview(ticket.image).await {
            Ok(data_uri) => {
                if classifier.complete_preview(ticket.generation, data_uri.clone()) {
                    let _ = app.emit("preview-ready", data_uri);
                }
            }
            Err(e) => {
                log::error!("Failed to build preview: {}", e);
                if classifier.fail_preview(ticket.generation) {
                    let _ = app.emit("preview-failed", e.message);
                }
            }
        }
    });
}
