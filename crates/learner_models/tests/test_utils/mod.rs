//! Mock OpenAI-compatible server for model integration tests.

#![allow(dead_code)]

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Request bodies received by the mock server, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub completions: Arc<Mutex<Vec<Value>>>,
    pub embeddings: Arc<Mutex<Vec<Value>>>,
}

impl Captured {
    pub fn completions(&self) -> Vec<Value> {
        self.completions.lock().unwrap().clone()
    }

    pub fn embeddings(&self) -> Vec<Value> {
        self.embeddings.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    captured: Captured,
    completion_text: String,
}

/// Topic vectors: texts mentioning "rust" point one way, "python" another,
/// everything else a third. The magnitudes differ so normalisation matters.
pub fn topic_vector(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    if text.contains("rust") {
        vec![3.0, 0.0, 0.4]
    } else if text.contains("python") {
        vec![0.0, 5.0, 0.5]
    } else {
        vec![0.0, 0.0, 2.0]
    }
}

async fn completions(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.captured.completions.lock().unwrap().push(body);
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{ "text": state.completion_text, "finish_reason": "stop" }]
        })),
    )
}

async fn embeddings(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let inputs: Vec<String> = body["input"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();
    state.captured.embeddings.lock().unwrap().push(body);

    // Reverse order to check that clients sort by index.
    let data: Vec<Value> = inputs
        .iter()
        .enumerate()
        .rev()
        .map(|(index, text)| json!({ "embedding": topic_vector(text), "index": index }))
        .collect();
    (StatusCode::OK, Json(json!({ "data": data })))
}

async fn failing() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "model not loaded" })),
    )
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

/// Start a healthy mock server. Returns its base URL and the capture log.
pub async fn spawn_mock(completion_text: &str) -> (String, Captured) {
    let captured = Captured::default();
    let state = MockState {
        captured: captured.clone(),
        completion_text: completion_text.to_string(),
    };
    let router = Router::new()
        .route("/v1/completions", post(completions))
        .route("/v1/embeddings", post(embeddings))
        .with_state(state);
    (serve(router).await, captured)
}

/// Start a server whose endpoints all answer 500.
pub async fn spawn_failing() -> String {
    let router = Router::new()
        .route("/v1/completions", post(failing))
        .route("/v1/embeddings", post(failing));
    serve(router).await
}
