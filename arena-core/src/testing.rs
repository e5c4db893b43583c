//! A scripted transport for exercising the client without a server.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{Method, Request, Response, Transport, TransportError};

type RouteKey = (Method, String);
type Reply = Result<Response, String>;

/// Replays canned responses per route and records every request it receives.
///
/// Replies queued for a route are used in order, and the last one keeps being
/// returned once the queue is down to it. Unknown routes answer with 404.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    routes: Arc<Mutex<HashMap<RouteKey, VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response for the given route
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(
            method,
            path,
            Ok(Response {
                status,
                body: body.to_string(),
            }),
        );
    }

    /// Queues a failure to reach the server for the given route
    pub fn fail(&self, method: Method, path: &str, reason: &str) {
        self.push(method, path, Err(reason.to_string()));
    }

    /// Returns every request received so far
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Returns how many requests were sent to the given route
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let route = (request.method, request.path.clone());
        self.requests.lock().push(request);

        let reply = {
            let mut routes = self.routes.lock();

            match routes.get_mut(&route) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(TransportError::Request(reason)),
            None => Ok(Response {
                status: 404,
                body: json!({ "detail": "Not Found" }).to_string(),
            }),
        }
    }
}
