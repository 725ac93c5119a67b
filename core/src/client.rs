//! Request builder and response parser for the todolist REST API.
//!
//! # Design
//! `TodolistsApi` holds the base URL and optional API key and nothing else.
//! Every endpoint is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming an `HttpResponse`. Parsers
//! unwrap the `{resultCode, messages, data}` envelope and return
//! `Result<_, Failure>` so callers deal with one error type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthMe, Envelope, GetTasksResponse, Item, Task, TitlePayload, Todolist, UpdateTaskModel,
};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "API-KEY";

#[derive(Debug, Clone)]
pub struct TodolistsApi {
    base_url: String,
    api_key: Option<String>,
}

impl TodolistsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            ..Self::new(&config.base_url)
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    // --- todolists ---

    pub fn build_get_todolists(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todo-lists")
    }

    pub fn parse_get_todolists(&self, response: HttpResponse) -> Result<Vec<Todolist>, Failure> {
        Ok(decode_body(response)?)
    }

    pub fn build_create_todolist(&self, title: &str) -> Result<HttpRequest, ApiError> {
        self.request_with_body(HttpMethod::Post, "/todo-lists", &title_payload(title))
    }

    pub fn parse_create_todolist(&self, response: HttpResponse) -> Result<Todolist, Failure> {
        item(unwrap_envelope(response)?)
    }

    pub fn build_update_todolist(&self, id: &str, title: &str) -> Result<HttpRequest, ApiError> {
        self.request_with_body(
            HttpMethod::Put,
            &format!("/todo-lists/{id}"),
            &title_payload(title),
        )
    }

    pub fn parse_update_todolist(&self, response: HttpResponse) -> Result<(), Failure> {
        unwrap_envelope(response).map(drop)
    }

    pub fn build_delete_todolist(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/todo-lists/{id}"))
    }

    pub fn parse_delete_todolist(&self, response: HttpResponse) -> Result<(), Failure> {
        unwrap_envelope(response).map(drop)
    }

    // --- tasks ---

    pub fn build_get_tasks(&self, todolist_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/todo-lists/{todolist_id}/tasks"))
    }

    pub fn parse_get_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, Failure> {
        let page: GetTasksResponse = decode_body(response)?;
        match page.error {
            Some(error) => Err(Failure::application(vec![error])),
            None => Ok(page.items),
        }
    }

    pub fn build_create_task(&self, todolist_id: &str, title: &str) -> Result<HttpRequest, ApiError> {
        self.request_with_body(
            HttpMethod::Post,
            &format!("/todo-lists/{todolist_id}/tasks"),
            &title_payload(title),
        )
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, Failure> {
        item(unwrap_envelope(response)?)
    }

    pub fn build_update_task(
        &self,
        todolist_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> Result<HttpRequest, ApiError> {
        self.request_with_body(
            HttpMethod::Put,
            &format!("/todo-lists/{todolist_id}/tasks/{task_id}"),
            model,
        )
    }

    /// The server echoes the stored task, but only the result code matters:
    /// the local record is patched with the caller's fields instead.
    pub fn parse_update_task(&self, response: HttpResponse) -> Result<(), Failure> {
        unwrap_envelope(response).map(drop)
    }

    pub fn build_delete_task(&self, todolist_id: &str, task_id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            &format!("/todo-lists/{todolist_id}/tasks/{task_id}"),
        )
    }

    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), Failure> {
        unwrap_envelope(response).map(drop)
    }

    // --- auth ---

    pub fn build_me(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/auth/me")
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<AuthMe, Failure> {
        let data = unwrap_envelope(response)?;
        serde_json::from_value(data)
            .map_err(|e| ApiError::DeserializationError(e.to_string()).into())
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(key) = &self.api_key {
            headers.push((API_KEY_HEADER.to_string(), key.clone()));
        }
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body: None,
        }
    }

    fn request_with_body<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

fn title_payload(title: &str) -> TitlePayload {
    TitlePayload {
        title: title.to_string(),
    }
}

/// Map non-2xx status codes to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    debug!(status = response.status, body = %response.body, "unexpected status");
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode_body<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Returns `data` when `resultCode == 0`, the application failure otherwise.
fn unwrap_envelope(response: HttpResponse) -> Result<serde_json::Value, Failure> {
    let envelope: Envelope = decode_body(response)?;
    if envelope.result_code != 0 {
        return Err(Failure::Application {
            messages: envelope.messages,
            fields_errors: envelope.fields_errors,
        });
    }
    Ok(envelope.data)
}

fn item<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, Failure> {
    let Item { item } = serde_json::from_value::<Item<T>>(data)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(item)
}
