#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

/// Route the `log` macros to stderr, `RUST_LOG` style, defaulting to `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use config::ClientConfig;
    use services::prediction_client::HttpPredictionClient;
    use services::upload_classifier::UploadClassifier;

    init_logging();

    let config = ClientConfig::from_env();
    let client = HttpPredictionClient::new(&config);
    log::info!("Prediction endpoint: {}", client.url());

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .manage(UploadClassifier::new())
        .manage(client)
        .invoke_handler(tauri::generate_handler![
            commands::image::pick_image,
            commands::image::select_image,
            commands::image::clear_image,
            commands::classifier::get_classifier_snapshot,
            commands::classifier::set_result_count,
            commands::classifier::dismiss_notice,
            commands::classifier::submit_image,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
