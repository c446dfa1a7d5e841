use thiserror::Error;

/// Errors from the job-service client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (connect, timeout, body read). Treated as
    /// transient by the polling loops: logged and retried on the next tick.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Errors surfaced to the host UI from session-level operations.
///
/// Nothing here is fatal to the process; every failure is scoped to the
/// operation that produced it. Job failures and partial-data failures are
/// reported through `SessionEvent`s instead, since they originate inside
/// the polling tasks.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The transcript (or notes) has not been fetched yet.
    #[error("transcript data is not available yet")]
    NotReady,

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
