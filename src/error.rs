use reqwest::StatusCode;
use thiserror::Error;

/// Longest response body quoted in a failure detail.
pub const MAX_BODY_CHARS: usize = 200;

/// Why a single check failed. Never propagates past the check that produced it.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Exception: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {}: {body}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    #[error("API returned {marker}: {body}")]
    NotSuccess { marker: String, body: String },

    #[error("Invalid response format: {0}")]
    MissingSettings(String),

    #[error("Missing fields: [{}]", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    #[error("Incorrect brand_slug in defaults: {got}")]
    WrongSlug { expected: String, got: String },

    #[error("Empty brand_name in defaults")]
    EmptyBrandName,

    #[error("Field {field} mismatch: saved {saved}, got {got}")]
    FieldMismatch {
        field: &'static str,
        saved: String,
        got: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused, timeout, DNS failure.
    Transport,
    /// The service answered with a non-200 status.
    Protocol,
    /// A 200 answer that does not hold up its side of the contract.
    Contract,
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::Transport(_) => ErrorKind::Transport,
            CheckError::Status { .. } => ErrorKind::Protocol,
            _ => ErrorKind::Contract,
        }
    }
}

pub fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
