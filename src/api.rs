//! Typed client for the todo REST backend.
//!
//! Wraps the four endpoints the backend exposes over the `todo` resource.
//! Paths keep their trailing slash; the backend routes with it. Callers never
//! see a URL or a raw response body, only `TodoItem`s and `ApiError`s.

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::item::{ItemFields, TodoItem};

/// Failure modes of a backend call. `MalformedBody` is kept separate from
/// `Transport` so a read that reached the backend but returned the wrong
/// shape can be logged as such.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {0}")]
    Status(StatusCode),
    #[error("malformed list payload: {0}")]
    MalformedBody(String),
}

/// HTTP client bound to one backend instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from a resolved config. Fails only if the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(ApiClient {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// `GET /api/todos/`: fetch the full collection.
    ///
    /// A response that is not a JSON array (or whose records do not fit
    /// `TodoItem`) is reported as `MalformedBody`, distinct from transport
    /// failure, so the caller can log what actually went wrong.
    pub async fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        let resp = self.http.get(self.collection_url()).send().await?;
        let body: Value = require_success(resp)?.json().await?;

        if !body.is_array() {
            return Err(ApiError::MalformedBody(format!(
                "expected an array, got {}",
                json_type_name(&body)
            )));
        }

        serde_json::from_value(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
    }

    /// `POST /api/todos/`: create. Response body ignored beyond status.
    pub async fn create(&self, fields: &ItemFields) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.collection_url())
            .json(fields)
            .send()
            .await?;
        require_success(resp)?;
        Ok(())
    }

    /// `PUT /api/todos/{id}/`: update the item with that id.
    pub async fn update(&self, id: u64, fields: &ItemFields) -> Result<(), ApiError> {
        let resp = self.http.put(self.item_url(id)).json(fields).send().await?;
        require_success(resp)?;
        Ok(())
    }

    /// `DELETE /api/todos/{id}/`: remove the item with that id.
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        require_success(resp)?;
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}/api/todos/", self.base_url)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/api/todos/{}/", self.base_url, id)
    }
}

fn require_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ApiError::Status(status))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
