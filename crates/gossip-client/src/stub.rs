//! Canned HTTP backend for client tests, served by an `axum` router.
//! Every request gets the next queued response; the last one repeats once
//! the queue runs out.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;

use gossip_core::config::api::ApiConfig;

use crate::client::ApiClient;
use crate::retry::RetryPolicy;

/// A request as the stub received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    /// `METHOD /path?query`.
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.target)
    }

    /// Header value by name.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

#[derive(Debug)]
struct StubState {
    responses: Vec<(u16, String)>,
    requests: Mutex<Vec<Recorded>>,
}

async fn answer(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let served = {
        let mut requests = state.requests.lock().unwrap();
        requests.push(Recorded {
            method: method.to_string(),
            target: uri
                .path_and_query()
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| uri.path().to_string()),
            headers,
            body,
        });
        requests.len() - 1
    };

    let (status, body) = &state.responses[served.min(state.responses.len() - 1)];
    let status = StatusCode::from_u16(*status).unwrap();
    (
        status,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::RETRY_AFTER, "0"),
        ],
        body.clone(),
    )
        .into_response()
}

pub struct StubServer {
    url: String,
    state: Arc<StubState>,
}

impl StubServer {
    /// Serve `(status, body)` pairs in order.
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        assert!(!responses.is_empty(), "stub needs at least one response");
        let state = Arc::new(StubState {
            responses,
            requests: Mutex::new(Vec::new()),
        });
        let router = Router::new()
            .fallback(answer)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { url, state }
    }

    /// Client pointed at the stub, with retries disabled.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: self.url.clone(),
            ..ApiConfig::default()
        })
        .unwrap()
        .with_retry(RetryPolicy::none())
    }

    pub fn request(&self, index: usize) -> Recorded {
        self.state.requests.lock().unwrap()[index].clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}
