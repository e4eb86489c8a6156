use clap::Parser;
use mushroom_classifier_lib::config::ClientConfig;
use mushroom_classifier_lib::models::classify_types::SubmitOutcome;
use mushroom_classifier_lib::services::intake_service;
use mushroom_classifier_lib::services::prediction_client::HttpPredictionClient;
use mushroom_classifier_lib::services::results_view::{self, DISCLAIMER};
use mushroom_classifier_lib::services::upload_classifier::UploadClassifier;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mushroom-classify", about = "Identify a mushroom species from a photo")]
struct Options {
    /// JPG or PNG image to classify
    image: PathBuf,
    /// How many predictions to request, clamped to 1..=10
    #[arg(short = 'n', long, default_value_t = 5, allow_negative_numbers = true)]
    top_n: i64,
    /// Origin of the prediction service
    #[arg(long, env = "MUSHROOM_API_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    mushroom_classifier_lib::init_logging();
    let options = Options::parse();

    let config = options
        .base_url
        .map(ClientConfig::with_base_url)
        .unwrap_or_default();
    let client = HttpPredictionClient::new(&config);
    let classifier = UploadClassifier::new();
    let count = classifier.set_result_count(options.top_n);

    let image = match intake_service::load_image(&options.image).await {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let file_name = image.file_name.clone();

    if let Err(e) = classifier.select_and_preview(image).await {
        log::warn!("Preview unavailable: {}", e);
    }

    println!("Classifying {} (top {})...", file_name, count);
    let outcome = classifier.submit(&client).await;
    if let SubmitOutcome::Failed { notice } = outcome {
        eprintln!("{}", notice);
        return ExitCode::FAILURE;
    }

    println!("{}", results_view::render(&classifier.predictions()));
    println!();
    println!("{}", DISCLAIMER);
    ExitCode::SUCCESS
}
