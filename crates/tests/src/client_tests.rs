use serde_json::json;
use vidscribe_core::{
    ApiError, HttpJobApi, JobApi, JobStatus, NotePageContent, NotePageCredentials,
    NotePageRequest,
};

use crate::fixtures::stub_service::StubService;

#[tokio::test]
async fn job_status_round_trip() {
    let service = StubService::spawn().await;
    *service.state.job.lock() = Some(json!({
        "status": "transcribing",
        "title": "Ownership and Borrowing",
        "channel": "RustConf",
        "url": "https://example.com/v/own",
    }));

    let api = HttpJobApi::new(&service.base_url);
    let response = api.job_status("j1").await.unwrap();
    assert_eq!(response.status, JobStatus::Transcribing);
    assert_eq!(response.title.as_deref(), Some("Ownership and Borrowing"));
    assert!(response.error_message.is_none());
}

#[tokio::test]
async fn failed_job_carries_server_message() {
    let service = StubService::spawn().await;
    *service.state.job.lock() = Some(json!({
        "status": "error",
        "error": "Video unavailable",
    }));

    let api = HttpJobApi::new(&service.base_url);
    let response = api.job_status("j1").await.unwrap();
    assert_eq!(response.status, JobStatus::Error);
    assert_eq!(response.error_message.as_deref(), Some("Video unavailable"));
}

#[tokio::test]
async fn missing_job_maps_to_service_error() {
    let service = StubService::spawn().await;

    let api = HttpJobApi::new(&service.base_url);
    let err = api.job_status("nope").await.unwrap_err();
    match err {
        ApiError::Service { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Job not found");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn transcript_decodes_wire_names() {
    let service = StubService::spawn().await;
    *service.state.transcript.lock() = Some(json!({
        "title": "Ownership and Borrowing",
        "channel": "RustConf",
        "url": "https://example.com/v/own",
        "segments": [
            { "start": 0.0, "end": 5.0, "text": "The cat sat on the mat." },
        ],
        "text": "The cat sat on the mat.",
    }));

    let api = HttpJobApi::new(&service.base_url);
    let transcript = api.transcript("j1").await.unwrap();
    assert_eq!(transcript.source_url, "https://example.com/v/own");
    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(
        transcript.full_text.as_deref(),
        Some("The cat sat on the mat.")
    );
    assert!(transcript.language.is_none());
}

#[tokio::test]
async fn logs_unwrap_the_envelope() {
    let service = StubService::spawn().await;
    *service.state.logs.lock() = vec!["Loading model...".to_string(), "Chunk 1".to_string()];

    let api = HttpJobApi::new(&service.base_url);
    let logs = api.logs("j1").await.unwrap();
    assert_eq!(logs, vec!["Loading model...", "Chunk 1"]);
}

#[tokio::test]
async fn regenerate_notes_posts_the_model() {
    let service = StubService::spawn().await;

    let api = HttpJobApi::new(&service.base_url);
    let notes = api.regenerate_notes("j1", Some("large-v3")).await.unwrap();
    assert_eq!(notes.summary, "Regenerated with large-v3");

    let notes = api.regenerate_notes("j1", None).await.unwrap();
    assert_eq!(notes.summary, "Regenerated with default");
}

#[tokio::test]
async fn note_page_export_round_trip() {
    let service = StubService::spawn().await;

    let api = HttpJobApi::new(&service.base_url);
    let request = NotePageRequest {
        content: NotePageContent {
            title: "Ownership".to_string(),
            channel: "RustConf".to_string(),
            source_url: "https://example.com/v/own".to_string(),
            summary: "Summary.".to_string(),
            key_points: vec!["Point.".to_string()],
            transcript_lines: vec!["[0:00] The cat sat on the mat.".to_string()],
        },
        credentials: NotePageCredentials::Explicit {
            token: "secret".to_string(),
            parent_page_id: "page-9".to_string(),
        },
    };
    let response = api.export_note_page(&request).await.unwrap();
    assert_eq!(
        response.page_url.as_deref(),
        Some("https://notes.example/Ownership")
    );
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let service = StubService::spawn().await;
    *service.state.job.lock() = Some(json!({ "status": "complete" }));

    let api = HttpJobApi::new(format!("{}/", service.base_url));
    let response = api.job_status("j1").await.unwrap();
    assert_eq!(response.status, JobStatus::Complete);
}
