// API client module: a small blocking HTTP client that talks to the image
// server. Every call is a single request with no retry; the flow in `ui`
// decides what to do with the answers.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Base URL used when neither `--server` nor `IMAGE_SERVER_URL` is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:7779";

/// Message printed when the server accepts the unload but sends none.
pub const DEFAULT_UNLOAD_MESSAGE: &str = "Directory unloaded successfully";

/// Blocking client bound to a single image server.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// State reported by `GET /`. Only the fields the unload flow looks at
/// are modelled; anything else the server sends is ignored.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ServerInfo {
    #[serde(default)]
    pub current_directory: Option<String>,
    /// Image identifiers; their shape is up to the server, only the
    /// count is used. Missing and null both read as empty.
    #[serde(default)]
    pub image_list: Option<Vec<serde_json::Value>>,
}

impl ServerInfo {
    /// The loaded directory, treating an empty string the same as null.
    pub fn loaded_directory(&self) -> Option<&str> {
        self.current_directory.as_deref().filter(|d| !d.is_empty())
    }

    pub fn image_count(&self) -> usize {
        self.image_list.as_ref().map_or(0, Vec::len)
    }
}

/// Body of a successful `POST /unload`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct UnloadResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl UnloadResponse {
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_UNLOAD_MESSAGE)
    }
}

/// Why an unload attempt did not succeed.
#[derive(Debug, Error)]
pub enum UnloadError {
    #[error("Unable to fetch server information.")]
    StatusUnavailable,
    #[error("Server returned status code {}", .status.as_u16())]
    Rejected { status: StatusCode, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiClient {
    /// Build a client for `base_url`. A trailing slash is dropped so
    /// endpoint paths can be appended directly. With `timeout` set, every
    /// request gives up after that long.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(ApiClient { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn unload_url(&self) -> String {
        format!("{}/unload", &self.base_url)
    }

    /// Liveness check: true only when `GET /` answers 200. Connection
    /// failures of any kind count as "not running".
    pub fn is_running(&self) -> bool {
        match self.client.get(&self.base_url).send() {
            Ok(res) => {
                log::debug!("liveness check {} -> {}", self.base_url, res.status());
                res.status() == StatusCode::OK
            }
            Err(e) => {
                log::debug!("liveness check {} failed: {}", self.base_url, e);
                false
            }
        }
    }

    /// Fetch the server state. `Ok(None)` for any non-200 answer.
    /// Connection and decoding errors are returned to the caller, which is
    /// expected to have checked `is_running` first.
    pub fn server_info(&self) -> Result<Option<ServerInfo>> {
        let res = self.client.get(&self.base_url)
            .send()
            .context("Failed to send status request")?;
        if res.status() != StatusCode::OK {
            log::debug!("status fetch returned {}", res.status());
            return Ok(None);
        }
        let info: ServerInfo = res.json().context("Parsing server info json")?;
        Ok(Some(info))
    }

    /// Ask the server to unload its current directory. The request has no
    /// body.
    pub fn unload(&self) -> Result<UnloadResponse, UnloadError> {
        let res = self.client.post(self.unload_url()).send()?;
        let status = res.status();
        log::debug!("unload request returned {}", status);
        if status != StatusCode::OK {
            let body = res.text().unwrap_or_else(|_| "".into());
            return Err(UnloadError::Rejected { status, body });
        }
        Ok(res.json()?)
    }
}
