use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{JobStatus, SummaryNotes, Transcript};

/// One polled job-status snapshot.
///
/// Identity fields are optional because the service fills them in as the
/// pipeline learns them (the title arrives once the download stage has
/// resolved the source metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Server-supplied failure detail, set when `status` is `Error`.
    #[serde(default, rename = "error")]
    pub error_message: Option<String>,
}

/// Credentials for the external note service, either given explicitly by
/// the user or resolved from the service's stored configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotePageCredentials {
    Explicit { token: String, parent_page_id: String },
    Stored,
}

/// Content block pushed to the external note service as a new page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePageContent {
    pub title: String,
    pub channel: String,
    pub source_url: String,
    pub summary: String,
    pub key_points: Vec<String>,
    /// Timestamped transcript lines, already formatted for display.
    pub transcript_lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePageRequest {
    pub content: NotePageContent,
    pub credentials: NotePageCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePageResponse {
    /// URL of the created page, when the service reports one.
    #[serde(default)]
    pub page_url: Option<String>,
}

/// The job-processing service contract.
///
/// The engine only ever talks to the service through this trait, so tests
/// can script a fake and the HTTP wiring stays in one place.
#[async_trait]
pub trait JobApi: Send + Sync + 'static {
    /// Fetches the current status snapshot for a job.
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ApiError>;

    /// Fetches the completed transcript.
    async fn transcript(&self, job_id: &str) -> Result<Transcript, ApiError>;

    /// Fetches the generated summary notes.
    async fn notes(&self, job_id: &str) -> Result<SummaryNotes, ApiError>;

    /// Fetches the cumulative transcription log. Each response is the
    /// authoritative full state, not a delta.
    async fn logs(&self, job_id: &str) -> Result<Vec<String>, ApiError>;

    /// Regenerates the summary notes, optionally with a different model.
    async fn regenerate_notes(
        &self,
        job_id: &str,
        model: Option<&str>,
    ) -> Result<SummaryNotes, ApiError>;

    /// Creates a page on the external note service from exported content.
    async fn export_note_page(
        &self,
        request: &NotePageRequest,
    ) -> Result<NotePageResponse, ApiError>;
}

/// `JobApi` over HTTP, matching the job service's REST routes.
pub struct HttpJobApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct LogsResponse {
    logs: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RegenerateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct NotePageBody<'a> {
    content: &'a NotePageContent,
    #[serde(rename = "notionToken", skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(rename = "notionPageId", skip_serializing_if = "Option::is_none")]
    parent_page_id: Option<&'a str>,
}

impl HttpJobApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a response, mapping non-success statuses to
    /// `ApiError::Service` with the server's `{"error": ...}` detail when
    /// the body carries one.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ServiceError>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            return Err(ApiError::Service {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/job/{job_id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn transcript(&self, job_id: &str) -> Result<Transcript, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/transcript/{job_id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn notes(&self, job_id: &str) -> Result<SummaryNotes, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/notes/{job_id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn logs(&self, job_id: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/logs/{job_id}")))
            .send()
            .await?;
        let body: LogsResponse = Self::decode(response).await?;
        Ok(body.logs)
    }

    async fn regenerate_notes(
        &self,
        job_id: &str,
        model: Option<&str>,
    ) -> Result<SummaryNotes, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/regenerate_notes/{job_id}")))
            .json(&RegenerateBody { model })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn export_note_page(
        &self,
        request: &NotePageRequest,
    ) -> Result<NotePageResponse, ApiError> {
        let (token, parent_page_id) = match &request.credentials {
            NotePageCredentials::Explicit {
                token,
                parent_page_id,
            } => (Some(token.as_str()), Some(parent_page_id.as_str())),
            NotePageCredentials::Stored => (None, None),
        };
        let response = self
            .client
            .post(self.url("/api/export/notion"))
            .json(&NotePageBody {
                content: &request.content,
                token,
                parent_page_id,
            })
            .send()
            .await?;
        Self::decode(response).await
    }
}
