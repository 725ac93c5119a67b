//! In-memory stand-in for the remote todolist service.
//!
//! Mutating endpoints answer `200` with a `{resultCode, messages,
//! fieldsErrors, data}` envelope; validation problems and unknown ids are
//! reported through `resultCode = 1`. Listing tasks of an unknown todolist
//! is a plain `404`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todolist {
    pub id: String,
    pub title: String,
    pub added_date: NaiveDateTime,
    pub order: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub todo_list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: u8,
    pub priority: u8,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
    pub order: i64,
    pub added_date: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct TitleInput {
    pub title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: u8,
    pub priority: u8,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub result_code: i32,
    pub messages: Vec<String>,
    pub fields_errors: Vec<FieldError>,
    pub data: Value,
}

impl Envelope {
    fn ok(data: Value) -> Json<Self> {
        Json(Self {
            result_code: 0,
            messages: Vec::new(),
            fields_errors: Vec::new(),
            data,
        })
    }

    fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            result_code: 1,
            messages: vec![message.into()],
            fields_errors: Vec::new(),
            data: json!({}),
        })
    }

    fn field_error(field: &str, message: String) -> Json<Self> {
        Json(Self {
            result_code: 1,
            messages: vec![message.clone()],
            fields_errors: vec![FieldError {
                field: field.to_string(),
                error: message,
            }],
            data: json!({}),
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksPage {
    pub items: Vec<Task>,
    pub total_count: usize,
    pub error: Option<String>,
}

/// The logged-in user reported by `/auth/me`; `None` answers "not
/// authorized".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub login: String,
}

#[derive(Debug, Default)]
pub struct Db {
    /// Newest first, like the real service.
    pub todolists: Vec<Todolist>,
    pub tasks: HashMap<String, Vec<Task>>,
    pub user: Option<User>,
}

pub type SharedDb = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db = Db {
        user: Some(User {
            id: 1,
            email: "free@samurai.js".to_string(),
            login: "free".to_string(),
        }),
        ..Db::default()
    };
    app_with(Arc::new(RwLock::new(db)))
}

/// Router over a caller-owned database, for seeding and inspection in tests.
pub fn app_with(db: SharedDb) -> Router {
    Router::new()
        .route("/auth/me", get(me))
        .route("/todo-lists", get(list_todolists).post(create_todolist))
        .route(
            "/todo-lists/{id}",
            put(update_todolist).delete(delete_todolist),
        )
        .route("/todo-lists/{id}/tasks", get(list_tasks).post(create_task))
        .route(
            "/todo-lists/{id}/tasks/{task_id}",
            put(update_task).delete(delete_task),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate_title(title: &str) -> Result<(), Json<Envelope>> {
    if title.trim().is_empty() {
        return Err(Envelope::field_error("title", "Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(Envelope::field_error(
            "title",
            format!("The Title field must be a string with a maximum length of {MAX_TITLE_LEN}."),
        ));
    }
    Ok(())
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

async fn me(State(db): State<SharedDb>) -> Json<Envelope> {
    match &db.read().await.user {
        Some(user) => Envelope::ok(json!(user)),
        None => Envelope::error("You are not authorized"),
    }
}

async fn list_todolists(State(db): State<SharedDb>) -> Json<Vec<Todolist>> {
    Json(db.read().await.todolists.clone())
}

async fn create_todolist(
    State(db): State<SharedDb>,
    Json(input): Json<TitleInput>,
) -> Json<Envelope> {
    if let Err(rejection) = validate_title(&input.title) {
        return rejection;
    }
    let mut db = db.write().await;
    let order = db.todolists.first().map_or(0, |tl| tl.order - 1);
    let todolist = Todolist {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        added_date: now(),
        order,
    };
    db.tasks.insert(todolist.id.clone(), Vec::new());
    db.todolists.insert(0, todolist.clone());
    info!(id = %todolist.id, "todolist created");
    Envelope::ok(json!({ "item": todolist }))
}

async fn update_todolist(
    State(db): State<SharedDb>,
    Path(id): Path<String>,
    Json(input): Json<TitleInput>,
) -> Json<Envelope> {
    if let Err(rejection) = validate_title(&input.title) {
        return rejection;
    }
    let mut db = db.write().await;
    match db.todolists.iter_mut().find(|tl| tl.id == id) {
        Some(todolist) => {
            todolist.title = input.title;
            info!(%id, "todolist renamed");
            Envelope::ok(json!({}))
        }
        None => Envelope::error("Todolist not found"),
    }
}

async fn delete_todolist(State(db): State<SharedDb>, Path(id): Path<String>) -> Json<Envelope> {
    let mut db = db.write().await;
    let Some(index) = db.todolists.iter().position(|tl| tl.id == id) else {
        return Envelope::error("Todolist not found");
    };
    db.todolists.remove(index);
    db.tasks.remove(&id);
    info!(%id, "todolist deleted");
    Envelope::ok(json!({}))
}

async fn list_tasks(
    State(db): State<SharedDb>,
    Path(id): Path<String>,
) -> Result<Json<TasksPage>, StatusCode> {
    let db = db.read().await;
    let tasks = db.tasks.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(TasksPage {
        items: tasks.clone(),
        total_count: tasks.len(),
        error: None,
    }))
}

async fn create_task(
    State(db): State<SharedDb>,
    Path(id): Path<String>,
    Json(input): Json<TitleInput>,
) -> Json<Envelope> {
    if let Err(rejection) = validate_title(&input.title) {
        return rejection;
    }
    let mut db = db.write().await;
    let Some(tasks) = db.tasks.get_mut(&id) else {
        return Envelope::error("Todolist not found");
    };
    let order = tasks.first().map_or(0, |t| t.order - 1);
    let task = Task {
        id: Uuid::new_v4().to_string(),
        todo_list_id: id,
        title: input.title,
        description: None,
        status: 0,
        priority: 1,
        start_date: None,
        deadline: None,
        order,
        added_date: now(),
    };
    tasks.insert(0, task.clone());
    info!(todolist_id = %task.todo_list_id, id = %task.id, "task created");
    Envelope::ok(json!({ "item": task }))
}

async fn update_task(
    State(db): State<SharedDb>,
    Path((id, task_id)): Path<(String, String)>,
    Json(input): Json<UpdateTaskInput>,
) -> Json<Envelope> {
    if let Err(rejection) = validate_title(&input.title) {
        return rejection;
    }
    let mut db = db.write().await;
    let task = db
        .tasks
        .get_mut(&id)
        .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id));
    let Some(task) = task else {
        return Envelope::error("Task not found");
    };
    task.title = input.title;
    task.description = input.description;
    task.status = input.status;
    task.priority = input.priority;
    task.start_date = input.start_date;
    task.deadline = input.deadline;
    info!(todolist_id = %id, id = %task_id, "task updated");
    Envelope::ok(json!({ "item": task }))
}

async fn delete_task(
    State(db): State<SharedDb>,
    Path((id, task_id)): Path<(String, String)>,
) -> Json<Envelope> {
    let mut db = db.write().await;
    let Some(tasks) = db.tasks.get_mut(&id) else {
        return Envelope::error("Todolist not found");
    };
    let Some(index) = tasks.iter().position(|t| t.id == task_id) else {
        return Envelope::error("Task not found");
    };
    tasks.remove(index);
    info!(todolist_id = %id, id = %task_id, "task deleted");
    Envelope::ok(json!({}))
}
