use arena_core::{Body, Method, Request, Response, Transport, TransportError};
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};
use url::Url;

/// A transport that talks to the remote service over HTTP.
pub struct ReqwestTransport {
    client: Client,
    base: Url,
}

impl ReqwestTransport {
    pub fn new(api_url: &str) -> Result<Self, TransportError> {
        // Paths are appended to the base, so it must end with a slash
        let normalized = format!("{}/", api_url.trim_end_matches('/'));

        let base = Url::parse(&normalized)
            .map_err(|e| TransportError::InvalidBase(format!("{}: {}", api_url, e)))?;

        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidBase(api_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Returns the full url of the given API path
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let url = self.endpoint(&request.path)?;
        debug!("{:?} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(fields) => builder.form(fields),
        };

        let response = builder
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(Response { status, body })
    }
}
