use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A failed call to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The credential was missing or rejected. The session has already been torn down.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found: {}", .detail.as_deref().unwrap_or("no detail"))]
    NotFound { detail: Option<String> },
    /// The request payload was rejected by the server's validation
    #[error("Validation failed: {}", .detail.as_deref().unwrap_or("no detail"))]
    Validation { detail: Option<String> },
    /// The request conflicts with the current state, for example joining a full tournament
    #[error("Conflict: {}", .detail.as_deref().unwrap_or("no detail"))]
    Conflict { detail: Option<String> },
    #[error("Server responded with {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },
    /// No response was received
    #[error("Network error: {0}")]
    Network(String),
    /// A successful response could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

/// The `detail` field is either a message or a list of field errors
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
}

#[derive(Debug, Deserialize)]
struct FieldError {
    #[serde(default)]
    loc: Vec<Value>,
    msg: String,
}

impl ApiError {
    /// Classifies an unsuccessful response.
    /// 401 is not handled here since it requires tearing down the session first.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = parse_detail(body);

        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound { detail },
            422 => Self::Validation { detail },
            400 | 409 => Self::Conflict { detail },
            status => Self::Server { status, detail },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The message the server gave, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NotFound { detail }
            | Self::Validation { detail }
            | Self::Conflict { detail }
            | Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns a short message fit to show to a user.
    /// Uses the server detail when present, falling back to the given text otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthorized => "Your session has expired, please log in again".to_string(),
            Self::Network(_) => format!("{} (the server could not be reached)", fallback),
            e => e.detail().unwrap_or(fallback).to_string(),
        }
    }
}

/// Extracts a readable message from an error body
fn parse_detail(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;

    let message = match body.detail {
        Detail::Message(message) => message,
        Detail::Fields(fields) => fields
            .into_iter()
            .map(|f| match f.loc.last().and_then(|l| l.as_str()) {
                Some(field) if field != "body" => format!("{}: {}", field, f.msg),
                _ => f.msg,
            })
            .collect::<Vec<_>>()
            .join("; "),
    };

    Some(message).filter(|m| !m.is_empty())
}
