use crate::config::ClientConfig;
use crate::error::SubmitError;
use crate::models::classify_types::{PredictResponse, Prediction};
use crate::models::intake_types::{ResultCount, SelectedImage};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub image: SelectedImage,
    pub result_count: ResultCount,
}

/// The remote classifier. One call is one request; nothing is retried or cached.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: PredictionRequest) -> Result<Vec<Prediction>, SubmitError>;
}

#[derive(Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    url: String,
}

impl HttpPredictionClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.predict_url(),
        }
    }

    pub fn with_client(config: &ClientConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            url: config.predict_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn build_form(request: &PredictionRequest) -> Result<Form, SubmitError> {
    let part = Part::bytes(request.image.bytes.to_vec())
        .file_name(request.image.file_name.clone())
        .mime_str(request.image.mime.as_str())?;

    Ok(Form::new()
        .part("image", part)
        .text("n", request.result_count.to_string()))
}

/// Pull the ranked list out of a response body, keeping the service's order.
pub fn parse_predictions(body: &[u8]) -> Result<Vec<Prediction>, SubmitError> {
    let response: PredictResponse = serde_json::from_slice(body)?;
    Ok(response.top_n)
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, request: PredictionRequest) -> Result<Vec<Prediction>, SubmitError> {
        let form = build_form(&request)?;

        log::info!(
            "POST {} ({}, {} bytes, n={})",
            self.url,
            request.image.file_name,
            request.image.len(),
            request.result_count
        );

        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Transport(format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;
        parse_predictions(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intake_types::ImageMime;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const SAMPLE_BODY: &str = r#"{"top_n":[{"name":"Amanita_muscaria","confidence":0.87},{"name":"Boletus_edulis","confidence":0.10}]}"#;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Accept one connection, answer it with `status` and `body`, and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = find(&request, b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());

            loop {
                let done = match content_length {
                    Some(len) => request.len() >= header_end + len,
                    None => request.ends_with(b"0\r\n\r\n"),
                };
                if done {
                    break;
                }
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{}", addr), handle)
    }

    // Loopback only; ignore any proxy configured in the environment.
    fn client_for(base: String) -> HttpPredictionClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpPredictionClient::with_client(&ClientConfig::with_base_url(base), client)
    }

    fn request(n: i64) -> PredictionRequest {
        PredictionRequest {
            image: SelectedImage::new("cap.png", ImageMime::Png, b"\x89PNG-fake-bytes".to_vec()),
            result_count: ResultCount::clamped(n),
        }
    }

    #[test]
    fn parses_top_n_in_service_order() {
        let predictions = parse_predictions(SAMPLE_BODY.as_bytes()).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].name, "Amanita_muscaria");
        assert_eq!(predictions[1].name, "Boletus_edulis");
        assert!((predictions[0].confidence - 0.87).abs() < 1e-12);
    }

    #[test]
    fn does_not_reorder_ascending_input() {
        let body = br#"{"top_n":[{"name":"a","confidence":0.1},{"name":"b","confidence":0.9}]}"#;
        let names: Vec<String> = parse_predictions(body).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        assert!(matches!(parse_predictions(b"not json"), Err(SubmitError::Parse(_))));
        assert!(matches!(
            parse_predictions(br#"{"predictions":[]}"#),
            Err(SubmitError::Parse(_))
        ));
        assert!(matches!(
            parse_predictions(br#"{"top_n":[{"name":"a"}]}"#),
            Err(SubmitError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn posts_multipart_image_and_n() {
        let (base, server) = serve_once("200 OK", SAMPLE_BODY).await;
        let client = client_for(base);

        let predictions = client.predict(request(3)).await.unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].name, "Amanita_muscaria");

        let raw = server.await.unwrap();
        let text = String::from_utf8_lossy(&raw).to_ascii_lowercase();
        assert!(text.starts_with("post /mushrooms/api/predict http/1.1"));
        assert!(text.contains("multipart/form-data; boundary="));
        assert!(text.contains("name=\"image\""));
        assert!(text.contains("filename=\"cap.png\""));
        assert!(text.contains("content-type: image/png"));
        assert!(text.contains("name=\"n\"\r\n\r\n3\r\n"));
        assert!(find(&raw, b"\x89PNG-fake-bytes").is_some());
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let client = client_for(base);

        let err = client.predict(request(5)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(ref m) if m.contains("500")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn ok_status_with_bad_body_is_a_parse_error() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>").await;
        let client = client_for(base);

        let err = client.predict(request(5)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Parse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let err = client.predict(request(5)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }
}
