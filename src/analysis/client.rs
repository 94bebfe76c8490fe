use super::error::AnalysisError;
use super::messages::{self, AnalysisRequest, FILE_FIELD};
use crate::feedback::FeedbackCollection;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("classroom-feedback/", env!("CARGO_PKG_VERSION"));

/// The remote service that turns a recording into feedback.
///
/// One call issues exactly one request; there is no retry.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<FeedbackCollection, AnalysisError>;
}

/// HTTP client for `POST {base_url}/analyze`
pub struct HttpAnalysisClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let endpoint = format!("{}/analyze", base_url.trim_end_matches('/'));
        info!("Analysis service endpoint: {}", endpoint);

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<FeedbackCollection, AnalysisError> {
        let file = request.file;

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| AnalysisError::Network(format!("invalid MIME type: {}", e)))?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(
            "Submitting {} ({} bytes) to {}",
            file.name,
            file.size(),
            self.endpoint
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = messages::failure_message(&body);
            warn!("Analysis service returned {}: {}", status, message);
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Server response: {}", body);

        let feedback = messages::parse_analysis_body(&body)?;
        info!("Received {} feedback items for {}", feedback.len(), file.name);

        Ok(feedback)
    }
}
