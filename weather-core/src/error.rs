use thiserror::Error;

/// Failure talking to the upstream weather API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("weather API returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure reading or writing the cache service.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cache service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cache command failed: {0}")]
    Command(String),

    #[error("unexpected cache reply: {0}")]
    Reply(String),
}

/// Failure producing the narrative report.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("report backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("report backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("report backend returned no content")]
    EmptyResponse,

    #[error("report backend JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
