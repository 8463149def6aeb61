//! Fireworks image-generation client
//!
//! Submits a text prompt to Fireworks' asynchronous workflow endpoint and
//! polls for the result with a fixed-interval loop. The service's string
//! status codes are inconsistently aliased (`Ready`/`Complete`/`Finished`
//! all mean done), so they are normalized into [`JobStatus`] at the
//! boundary and the rest of the crate only ever sees the enum.

use crate::config::ImageServiceConfig;
use crate::error::{Result, StoryError};
use crate::pipeline::progress::ProgressSink;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Normalized status of an image-generation job
///
/// Non-terminal statuses keep the poll loop running; `Ready` and `Failed`
/// stop it. Statuses the service invents that we do not recognize are
/// carried as `Other` and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Job accepted, not started yet
    Queued,
    /// Job running
    Processing,
    /// Terminal: result available
    Ready,
    /// Terminal: service reported failure
    Failed,
    /// Unrecognized status string; polling continues
    Other(String),
}

impl JobStatus {
    /// Maps the service's raw status string onto the normalized enum
    ///
    /// The alias sets are case-sensitive, matching what the API actually
    /// emits.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Ready" | "Complete" | "Finished" => Self::Ready,
            "Failed" | "Error" => Self::Failed,
            "Queued" | "Pending" => Self::Queued,
            "Processing" | "Running" => Self::Processing,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns true when this status ends the polling loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Reference to a generated image
///
/// The service returns either an HTTP(S) URL or a base64-encoded binary
/// payload; the two are mutually exclusive and discriminated by the
/// `"http"` prefix of the result field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    /// Image hosted by the service, referenced by URL
    Url(String),
    /// Image embedded as a `data:` URL with a base64 payload
    Inline(String),
}

impl ImageRef {
    /// Returns the URL or data-URL string for display
    pub fn reference(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Inline(data_url) => data_url,
        }
    }

    /// Returns true for a URL reference, false for an inline payload
    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

/// Submit request body
#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    prompt: &'a str,
}

/// Submit response body
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    request_id: Option<String>,
}

/// Poll request body
#[derive(Debug, Serialize)]
struct PollRequest<'a> {
    id: &'a str,
}

/// Poll response body
#[derive(Debug, Deserialize)]
struct PollResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result: Option<PollResult>,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PollResult {
    #[serde(default)]
    sample: Option<String>,
}

/// Fireworks asynchronous image-generation client
///
/// # Examples
///
/// ```no_run
/// use storystrip::config::ImageServiceConfig;
/// use storystrip::pipeline::progress::NullProgress;
/// use storystrip::providers::FireworksClient;
///
/// # async fn example() -> storystrip::error::Result<()> {
/// let config = ImageServiceConfig {
///     api_key: Some("fw_test".to_string()),
///     ..Default::default()
/// };
/// let client = FireworksClient::new(config)?;
/// let image = client.generate("a three panel comic", &NullProgress).await?;
/// println!("{}", image.reference());
/// # Ok(())
/// # }
/// ```
pub struct FireworksClient {
    client: Client,
    config: ImageServiceConfig,
}

impl FireworksClient {
    /// Create a new Fireworks client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ImageServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("storystrip/0.2.0")
            .build()
            .map_err(StoryError::Network)?;

        tracing::info!(
            "Initialized image client: base={}, model={}",
            config.api_base,
            config.model_path
        );

        Ok(Self { client, config })
    }

    fn submit_url(&self) -> String {
        format!("{}/{}", self.config.api_base, self.config.model_path)
    }

    fn result_url(&self) -> String {
        format!("{}/get_result", self.submit_url())
    }

    /// Generates an image for the given prompt
    ///
    /// Submits the prompt, then polls at a fixed interval until the job
    /// reaches a terminal status or the attempt budget is exhausted. Every
    /// poll, whatever its status, consumes one attempt and is reported to
    /// the progress sink.
    ///
    /// # Arguments
    ///
    /// * `prompt` - Full text prompt for the image generator
    /// * `progress` - Sink receiving per-attempt progress reports
    ///
    /// # Errors
    ///
    /// * `StoryError::Submission` - the service returned no request id
    /// * `StoryError::GenerationFailed` - the service reported failure
    /// * `StoryError::Decode` - the inline payload was not valid base64
    /// * `StoryError::MissingImage` - ready status but no result field
    /// * `StoryError::PollTimeout` - no terminal status within the budget
    /// * `StoryError::Network` - transport failure on submit or poll
    pub async fn generate(&self, prompt: &str, progress: &dyn ProgressSink) -> Result<ImageRef> {
        let request_id = self.submit(prompt).await?;
        tracing::info!("Image generation started: id={}", truncate_id(&request_id));

        let max_attempts = self.config.max_attempts;
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=max_attempts {
            tokio::time::sleep(interval).await;
            progress.poll_attempt(attempt, max_attempts);

            let poll = self.poll(&request_id).await?;
            let status = JobStatus::parse(poll.status.as_deref().unwrap_or_default());
            tracing::debug!("Poll {}/{}: status={:?}", attempt, max_attempts, status);

            match status {
                JobStatus::Ready => {
                    let sample = poll.result.and_then(|r| r.sample);
                    return match sample {
                        Some(s) if s.starts_with("http") => Ok(ImageRef::Url(s)),
                        Some(s) if !s.is_empty() => decode_inline(&s),
                        _ => {
                            tracing::warn!("Ready status without image data");
                            Err(StoryError::MissingImage.into())
                        }
                    };
                }
                JobStatus::Failed => {
                    let details = poll
                        .details
                        .unwrap_or_else(|| "Unknown error".to_string());
                    tracing::error!("Image generation failed: {}", details);
                    return Err(StoryError::GenerationFailed(details).into());
                }
                // Queued, Processing, or anything unrecognized: keep polling
                _ => {}
            }
        }

        tracing::warn!("Image generation timed out after {} attempts", max_attempts);
        Err(StoryError::PollTimeout {
            attempts: max_attempts,
        }
        .into())
    }

    /// Submits the generation request and extracts the job id
    async fn submit(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.submit_url())
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .header("Accept", "application/json")
            .json(&SubmitRequest { prompt })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Image submit request failed: {}", e);
                StoryError::Network(e)
            })?;

        let submit: SubmitResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse submit response: {}", e);
            StoryError::Network(e)
        })?;

        match submit.request_id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(StoryError::Submission.into()),
        }
    }

    /// Queries the job status by request id
    async fn poll(&self, request_id: &str) -> Result<PollResponse> {
        let response = self
            .client
            .post(self.result_url())
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .header("Accept", "image/jpeg")
            .json(&PollRequest { id: request_id })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Image poll request failed: {}", e);
                StoryError::Network(e)
            })?;

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse poll response: {}", e);
            StoryError::Network(e).into()
        })
    }
}

/// Decodes a base64 image payload and re-encodes it as a data URL for
/// display
///
/// The payload's format is sniffed to pick the MIME type, defaulting to
/// JPEG when the bytes are not a recognizable image container.
fn decode_inline(payload: &str) -> Result<ImageRef> {
    let bytes = BASE64.decode(payload.trim()).map_err(|e| {
        tracing::error!("Error decoding image payload: {}", e);
        StoryError::Decode(e.to_string())
    })?;

    let mime = image::guess_format(&bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("image/jpeg");

    let encoded = BASE64.encode(&bytes);
    Ok(ImageRef::Inline(format!("data:{};base64,{}", mime, encoded)))
}

/// Shortens a request id for log output
///
/// The id is service-provided and opaque, so slicing falls back to the
/// whole string when byte 8 is not a character boundary.
fn truncate_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ready_aliases() {
        assert_eq!(JobStatus::parse("Ready"), JobStatus::Ready);
        assert_eq!(JobStatus::parse("Complete"), JobStatus::Ready);
        assert_eq!(JobStatus::parse("Finished"), JobStatus::Ready);
    }

    #[test]
    fn test_status_failed_aliases() {
        assert_eq!(JobStatus::parse("Failed"), JobStatus::Failed);
        assert_eq!(JobStatus::parse("Error"), JobStatus::Failed);
    }

    #[test]
    fn test_status_non_terminal() {
        assert_eq!(JobStatus::parse("Queued"), JobStatus::Queued);
        assert_eq!(JobStatus::parse("Processing"), JobStatus::Processing);
        assert!(!JobStatus::parse("Queued").is_terminal());
        assert!(!JobStatus::parse("Processing").is_terminal());
    }

    #[test]
    fn test_status_aliases_are_case_sensitive() {
        // The API emits capitalized statuses; lowercase variants are not
        // part of the alias set and must keep the loop polling.
        assert_eq!(
            JobStatus::parse("ready"),
            JobStatus::Other("ready".to_string())
        );
        assert!(!JobStatus::parse("ready").is_terminal());
    }

    #[test]
    fn test_status_unknown_keeps_polling() {
        let status = JobStatus::parse("Warming");
        assert_eq!(status, JobStatus::Other("Warming".to_string()));
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Ready.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_image_ref_kinds() {
        let url = ImageRef::Url("https://cdn.example/img.jpg".to_string());
        assert!(url.is_url());
        assert_eq!(url.reference(), "https://cdn.example/img.jpg");

        let inline = ImageRef::Inline("data:image/jpeg;base64,AAAA".to_string());
        assert!(!inline.is_url());
        assert!(inline.reference().starts_with("data:image/jpeg"));
    }

    #[test]
    fn test_decode_inline_valid_payload() {
        // Minimal PNG header so format sniffing picks image/png
        let png_header: &[u8] = &[
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
        ];
        let payload = BASE64.encode(png_header);

        let image = decode_inline(&payload).unwrap();
        match image {
            ImageRef::Inline(data_url) => {
                assert!(data_url.starts_with("data:image/png;base64,"));
                assert!(data_url.ends_with(&payload));
            }
            ImageRef::Url(_) => panic!("expected inline reference"),
        }
    }

    #[test]
    fn test_decode_inline_unknown_format_defaults_jpeg() {
        let payload = BASE64.encode(b"not an image container");
        let image = decode_inline(&payload).unwrap();
        assert!(image.reference().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_decode_inline_invalid_base64() {
        let err = decode_inline("!!! not base64 !!!").unwrap_err();
        assert!(err.to_string().contains("Image decode error"));
    }

    #[test]
    fn test_poll_response_deserialization() {
        let json = r#"{
            "status": "Ready",
            "result": { "sample": "https://cdn.example/img.jpg" }
        }"#;
        let poll: PollResponse = serde_json::from_str(json).unwrap();
        assert_eq!(poll.status.as_deref(), Some("Ready"));
        assert_eq!(
            poll.result.unwrap().sample.as_deref(),
            Some("https://cdn.example/img.jpg")
        );
        assert!(poll.details.is_none());
    }

    #[test]
    fn test_poll_response_missing_fields() {
        let poll: PollResponse = serde_json::from_str("{}").unwrap();
        assert!(poll.status.is_none());
        assert!(poll.result.is_none());
    }

    #[test]
    fn test_submit_response_missing_id() {
        let submit: SubmitResponse = serde_json::from_str("{}").unwrap();
        assert!(submit.request_id.is_none());
    }

    #[test]
    fn test_truncate_id() {
        assert_eq!(truncate_id("abcdefghij"), "abcdefgh");
        assert_eq!(truncate_id("abc"), "abc");
    }

    #[test]
    fn test_truncate_id_multibyte() {
        // Byte 8 lands mid-character; the whole id is kept instead of
        // panicking
        let id = "réq-idé-longer";
        assert_eq!(truncate_id(id), id);
        assert_eq!(truncate_id("日本語の識別子です"), "日本語の識別子です");
    }

    #[test]
    fn test_client_urls() {
        let config = ImageServiceConfig {
            api_base: "http://localhost:9000".to_string(),
            model_path: "workflows/test-model".to_string(),
            ..Default::default()
        };
        let client = FireworksClient::new(config).unwrap();
        assert_eq!(
            client.submit_url(),
            "http://localhost:9000/workflows/test-model"
        );
        assert_eq!(
            client.result_url(),
            "http://localhost:9000/workflows/test-model/get_result"
        );
    }
}
