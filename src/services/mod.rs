pub mod intake_service;
pub mod prediction_client;
pub mod results_view;
pub mod upload_classifier;
