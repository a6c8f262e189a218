//! Scripted image server for tests.
//!
//! An `axum` app serving `GET /` and `POST /unload` on a background
//! runtime thread, so the blocking client under test can call it directly.
//! Every request is recorded as `"METHOD /path"`.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::net::TcpListener;

pub enum Reply {
    Body { status: u16, body: String },
    /// Accept the request and never answer in time.
    Stall,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Body { status, body: body.to_string() }
    }

    pub fn stall() -> Self {
        Reply::Stall
    }
}

#[derive(Clone)]
struct Script {
    statuses: Arc<Vec<Reply>>,
    unload: Arc<Reply>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Script {
    /// Record a request and return how many earlier ones had the same key.
    fn record(&self, key: &str) -> usize {
        let mut requests = self.requests.lock().unwrap();
        let n = requests.iter().filter(|r| r.as_str() == key).count();
        requests.push(key.to_string());
        n
    }
}

async fn respond(reply: &Reply) -> Response {
    match reply {
        Reply::Body { status, body } => {
            let status = StatusCode::from_u16(*status).unwrap();
            let content_type = if body.starts_with('{') { "application/json" } else { "text/plain" };
            (status, [(header::CONTENT_TYPE, content_type)], body.clone()).into_response()
        }
        Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

async fn status(State(script): State<Script>) -> Response {
    let n = script.record("GET /");
    let reply = &script.statuses[n.min(script.statuses.len() - 1)];
    respond(reply).await
}

async fn unload(State(script): State<Script>) -> Response {
    script.record("POST /unload");
    respond(&script.unload).await
}

pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// `GET /` answers from `statuses` in order (the last entry repeats),
    /// `POST /unload` always answers with `unload`.
    pub fn image_server(statuses: Vec<Reply>, unload_reply: Reply) -> Self {
        assert!(!statuses.is_empty(), "at least one status reply is needed");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let script = Script {
            statuses: Arc::new(statuses),
            unload: Arc::new(unload_reply),
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/", get(status))
            .route("/unload", post(unload))
            .with_state(script);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();

        MockServer { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == request).count()
    }
}

/// A URL on which nothing is listening.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn loaded(dir: &str, images: usize) -> Reply {
    let list: Vec<String> = (0..images).map(|i| format!("img{}.jpg", i)).collect();
    let body = serde_json::json!({ "current_directory": dir, "image_list": list });
    Reply::json(200, &body.to_string())
}

pub fn idle() -> Reply {
    Reply::json(200, r#"{"current_directory": null, "image_list": []}"#)
}
