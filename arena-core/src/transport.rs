use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// The payload of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    /// Sent as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

/// A request to the remote service, relative to the API base
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// The path relative to the API base, without a leading slash
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
    /// The credential to send as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
}

/// A raw response from the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid API base url: {0}")]
    InvalidBase(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Represents a type that can carry requests to the remote service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request, returning the response regardless of its status.
    /// An error is only returned if no response was received.
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: vec![],
            body: Body::Empty,
            bearer: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Body::Form(fields);
        self
    }
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
