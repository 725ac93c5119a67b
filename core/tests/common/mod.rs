//! Scripted transport and JSON fixtures shared by the store suites.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use todolist_core::{ApiError, HttpRequest, HttpResponse, Store, TodolistsApi, Transport};

pub const BASE_URL: &str = "http://localhost:3000";

/// Answers requests in order from a queue and records what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<(Duration, Result<HttpResponse, ApiError>)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, response: Result<HttpResponse, ApiError>) {
        self.push_delayed(Duration::ZERO, response);
    }

    pub fn push_delayed(&self, delay: Duration, response: Result<HttpResponse, ApiError>) {
        self.responses.lock().unwrap().push_back((delay, response));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        self.requests.lock().unwrap().push(request);
        let (delay, response) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, Err(ApiError::Transport("nothing scripted".into()))));
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        }
    }
}

/// Never answers.
pub struct SilentTransport;

impl Transport for SilentTransport {
    fn execute(
        &self,
        _request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        std::future::pending()
    }
}

pub fn store() -> Store<ScriptedTransport> {
    Store::new(TodolistsApi::new(BASE_URL), ScriptedTransport::default())
}

pub fn ok(body: Value) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::ok(body.to_string()))
}

pub fn network_error() -> Result<HttpResponse, ApiError> {
    Err(ApiError::Transport("Network Error".into()))
}

pub fn envelope(data: Value) -> Result<HttpResponse, ApiError> {
    ok(json!({"resultCode": 0, "messages": [], "fieldsErrors": [], "data": data}))
}

pub fn rejected(messages: &[&str]) -> Result<HttpResponse, ApiError> {
    ok(json!({"resultCode": 1, "messages": messages, "fieldsErrors": [], "data": {}}))
}

pub fn todolist(id: &str, title: &str) -> Value {
    json!({"id": id, "title": title, "addedDate": "2024-03-01T09:30:00", "order": 0})
}

pub fn task(id: &str, todolist_id: &str, status: u8) -> Value {
    json!({
        "id": id,
        "todoListId": todolist_id,
        "title": format!("task {id}"),
        "description": "keep me",
        "status": status,
        "priority": 3,
        "startDate": "2024-03-01T00:00:00",
        "deadline": "2024-03-08T00:00:00",
        "order": 0,
        "addedDate": "2024-03-01T09:30:00"
    })
}

pub fn tasks_page(tasks: Vec<Value>) -> Result<HttpResponse, ApiError> {
    let count = tasks.len();
    ok(json!({"items": tasks, "totalCount": count, "error": null}))
}

/// Loads `todolists` into the store through a scripted fetch.
pub async fn seed(store: &Store<ScriptedTransport>, todolists: Vec<Value>) {
    store.transport().push(ok(Value::Array(todolists)));
    store.fetch_todolists().await.unwrap();
}
