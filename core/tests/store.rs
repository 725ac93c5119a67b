//! Synchronization scenarios driven through `Store` with scripted responses.

mod common;

use std::time::Duration;

use common::*;
use serde_json::json;
use todolist_core::{
    Action, Failure, FilterValue, Fulfilled, HttpMethod, RequestStatus, TaskPriority, TaskStatus,
    UpdateDomainTaskModel,
};

// --- todolists ---

#[tokio::test]
async fn fetch_replaces_previous_todolists() {
    let store = store();
    seed(&store, vec![todolist("old", "Old")]).await;
    store.change_todolist_filter("old", FilterValue::Completed);

    seed(&store, vec![todolist("A", "Work"), todolist("B", "Home")]).await;

    let state = store.snapshot();
    let ids: Vec<_> = state.todolists.items().iter().map(|tl| tl.id.as_str()).collect();
    assert_eq!(ids, ["A", "B"]);
    assert!(state
        .todolists
        .items()
        .iter()
        .all(|tl| tl.filter == FilterValue::All && tl.entity_status == RequestStatus::Idle));
    assert_eq!(state.app.status(), RequestStatus::Succeeded);
}

#[tokio::test]
async fn fetch_resets_loaded_task_buckets() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();

    seed(&store, vec![todolist("A", "Work")]).await;

    assert_eq!(store.snapshot().tasks.bucket("A").map(|b| b.len()), Some(0));
}

#[tokio::test]
async fn add_todolist_prepends_with_server_id() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store
        .transport()
        .push(envelope(json!({"item": todolist("srv-1", "Groceries")})));

    let added = store.add_todolist("Groceries").await.unwrap();

    assert_eq!(added.id, "srv-1");
    let state = store.snapshot();
    assert_eq!(state.todolists.len(), 2);
    assert_eq!(state.todolists.items()[0].id, "srv-1");
    assert_eq!(state.todolists.items()[0].filter, FilterValue::All);
    assert!(state.tasks.has_bucket("srv-1"));
}

#[tokio::test]
async fn add_todolist_application_failure_surfaces_server_message() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(rejected(&["Title is required"]));

    let err = store.add_todolist("").await.unwrap_err();

    assert_eq!(err.user_message(), "Title is required");
    let state = store.snapshot();
    assert_eq!(state.todolists.len(), 1);
    assert_eq!(state.app.status(), RequestStatus::Failed);
    assert_eq!(state.app.error(), Some("Title is required"));
}

#[tokio::test]
async fn add_todolist_network_failure_leaves_store() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(network_error());

    let err = store.add_todolist("Later").await.unwrap_err();

    assert!(matches!(err, Failure::Network(_)));
    let state = store.snapshot();
    assert_eq!(state.todolists.len(), 1);
    assert_eq!(state.app.error(), Some("Network Error"));
}

#[tokio::test]
async fn remove_todolist_drops_entity_and_bucket() {
    let store = store();
    seed(&store, vec![todolist("A", "Work"), todolist("B", "Home")]).await;
    store.transport().push(envelope(json!({})));

    store.remove_todolist("A").await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.todolists.len(), 1);
    assert!(state.todolists.get("A").is_none());
    assert!(!state.tasks.has_bucket("A"));
    let sent = store.transport().requests();
    assert_eq!(sent.last().unwrap().method, HttpMethod::Delete);
    assert_eq!(sent.last().unwrap().path, format!("{BASE_URL}/todo-lists/A"));
}

#[tokio::test]
async fn removing_unknown_todolist_is_a_no_op() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(envelope(json!({})));

    assert!(store.remove_todolist("ghost").await.is_ok());
    assert_eq!(store.snapshot().todolists.len(), 1);
}

#[tokio::test]
async fn failed_remove_keeps_row_locked() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(rejected(&["Todolist not found"]));

    assert!(store.remove_todolist("A").await.is_err());

    let state = store.snapshot();
    let row = state.todolists.get("A").unwrap();
    assert_eq!(row.entity_status, RequestStatus::Loading);
    assert_eq!(state.app.status(), RequestStatus::Failed);
}

#[tokio::test]
async fn change_title_is_idempotent() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(envelope(json!({})));
    store.transport().push(envelope(json!({})));

    store.change_todolist_title("A", "Office").await.unwrap();
    let once = store.snapshot();
    store.change_todolist_title("A", "Office").await.unwrap();

    assert_eq!(store.snapshot().todolists, once.todolists);
    assert_eq!(once.todolists.get("A").unwrap().title, "Office");
}

#[tokio::test]
async fn local_actions_never_hit_the_network() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    let sent_before = store.transport().requests().len();

    store.change_todolist_filter("A", FilterValue::Active);
    store.set_todolist_entity_status("A", RequestStatus::Loading);
    store.change_todolist_filter("ghost", FilterValue::Active);

    let state = store.snapshot();
    let row = state.todolists.get("A").unwrap();
    assert_eq!(row.filter, FilterValue::Active);
    assert_eq!(row.entity_status, RequestStatus::Loading);
    assert_eq!(store.transport().requests().len(), sent_before);
}

// --- tasks ---

#[tokio::test]
async fn filters_select_tasks_by_status() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store
        .transport()
        .push(tasks_page(vec![task("t1", "A", 0), task("t2", "A", 2)]));
    store.fetch_tasks("A").await.unwrap();

    store.change_todolist_filter("A", FilterValue::Active);
    let active: Vec<_> = store.visible_tasks("A").into_iter().map(|t| t.id).collect();
    assert_eq!(active, ["t1"]);

    store.change_todolist_filter("A", FilterValue::Completed);
    let completed: Vec<_> = store.visible_tasks("A").into_iter().map(|t| t.id).collect();
    assert_eq!(completed, ["t2"]);

    store.change_todolist_filter("A", FilterValue::All);
    assert_eq!(store.visible_tasks("A").len(), 2);
}

#[tokio::test]
async fn add_task_rejection_returns_message_to_caller() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();
    store.transport().push(ok(json!({
        "resultCode": 1,
        "messages": ["Title required"],
        "fieldsErrors": [{"field": "title", "error": "Title required"}],
        "data": {}
    })));

    let err = store.add_task("A", "x").await.unwrap_err();

    assert_eq!(err.user_message(), "Title required");
    assert_eq!(err.fields_errors()[0].field, "title");
    let state = store.snapshot();
    assert_eq!(state.tasks.bucket("A").unwrap().len(), 1);
    assert_eq!(state.app.error(), Some("Title required"));
}

#[tokio::test]
async fn add_task_prepends_to_bucket() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();
    store.transport().push(envelope(json!({"item": task("t0", "A", 0)})));

    store.add_task("A", "task t0").await.unwrap();

    let ids: Vec<_> = store
        .snapshot()
        .tasks
        .bucket("A")
        .unwrap()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(ids, ["t0", "t1"]);
}

#[tokio::test]
async fn remove_task_failure_keeps_bucket() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store
        .transport()
        .push(tasks_page(vec![task("t1", "A", 0), task("t2", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();
    store.transport().push(network_error());
    store.transport().push(envelope(json!({})));

    assert!(store.remove_task("A", "t1").await.is_err());
    assert_eq!(store.snapshot().tasks.bucket("A").unwrap().len(), 2);

    store.remove_task("A", "t1").await.unwrap();
    let bucket = store.snapshot().tasks.bucket("A").unwrap().to_vec();
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].id, "t2");
}

#[tokio::test]
async fn update_task_sends_full_record_and_keeps_other_fields() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();
    let before = store.snapshot().tasks.find("A", "t1").unwrap().clone();
    store.transport().push(envelope(json!({"item": task("t1", "A", 2)})));

    store
        .update_task("A", "t1", &UpdateDomainTaskModel::status(TaskStatus::Completed))
        .await
        .unwrap();

    let sent = store.transport().requests().pop().unwrap();
    assert_eq!(sent.method, HttpMethod::Put);
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "title": "task t1",
            "description": "keep me",
            "status": 2,
            "priority": 3,
            "startDate": "2024-03-01T00:00:00",
            "deadline": "2024-03-08T00:00:00"
        })
    );

    let after = store.snapshot().tasks.find("A", "t1").unwrap().clone();
    assert_eq!(after.status, TaskStatus::Completed);
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.priority, TaskPriority::Urgent);
    assert_eq!(after.start_date, before.start_date);
    assert_eq!(after.deadline, before.deadline);
}

#[tokio::test]
async fn update_applies_patch_not_server_echo() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();
    let mut echo = task("t1", "A", 1);
    echo["title"] = json!("renamed elsewhere");
    store.transport().push(envelope(json!({ "item": echo })));

    store
        .update_task("A", "t1", &UpdateDomainTaskModel::status(TaskStatus::InProgress))
        .await
        .unwrap();

    assert_eq!(store.snapshot().tasks.find("A", "t1").unwrap().title, "task t1");
}

#[tokio::test]
async fn update_of_unknown_task_makes_no_request() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    let sent_before = store.transport().requests().len();

    let err = store
        .update_task("A", "ghost", &UpdateDomainTaskModel::title("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, Failure::TaskNotFound { .. }));
    assert!(!err.is_remote());
    assert_eq!(store.transport().requests().len(), sent_before);
    let app = store.snapshot().app;
    assert_eq!(app.status(), RequestStatus::Succeeded);
    assert!(app.error().is_none());
}

#[tokio::test]
async fn update_failure_leaves_task_untouched() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));
    store.fetch_tasks("A").await.unwrap();
    store.transport().push(rejected(&[]));

    let err = store
        .update_task("A", "t1", &UpdateDomainTaskModel::status(TaskStatus::Completed))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), todolist_core::GENERIC_ERROR_MESSAGE);
    assert_eq!(
        store.snapshot().tasks.find("A", "t1").unwrap().status,
        TaskStatus::New
    );
}

#[tokio::test]
async fn ensure_tasks_skips_loaded_lists() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("t1", "A", 0)]));

    assert!(store.ensure_tasks("A").await.is_some());
    assert!(store.ensure_tasks("A").await.is_none());
}

// --- concurrency ---

#[tokio::test]
async fn overlapping_adds_both_land() {
    let store = store();
    seed(&store, vec![todolist("A", "Work"), todolist("B", "Home")]).await;
    // First request answers last.
    store.transport().push_delayed(
        Duration::from_millis(50),
        envelope(json!({"item": task("a1", "A", 0)})),
    );
    store
        .transport()
        .push_delayed(Duration::from_millis(5), envelope(json!({"item": task("b1", "B", 0)})));

    let (a, b) = tokio::join!(store.add_task("A", "task a1"), store.add_task("B", "task b1"));

    assert!(a.is_ok() && b.is_ok());
    let state = store.snapshot();
    assert_eq!(state.tasks.bucket("A").unwrap()[0].id, "a1");
    assert_eq!(state.tasks.bucket("B").unwrap()[0].id, "b1");
    assert_eq!(state.app.status(), RequestStatus::Succeeded);
}

#[tokio::test]
async fn late_task_fetch_does_not_revive_removed_list() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    // The fetch is sent first but answers after the removal settled.
    store
        .transport()
        .push_delayed(Duration::from_millis(50), tasks_page(vec![task("t1", "A", 0)]));
    store.transport().push(envelope(json!({})));

    let (fetched, removed) = tokio::join!(store.fetch_tasks("A"), store.remove_todolist("A"));

    assert!(fetched.is_ok() && removed.is_ok());
    let state = store.snapshot();
    assert!(state.todolists.get("A").is_none());
    assert!(!state.tasks.has_bucket("A"));
}

#[tokio::test]
async fn fetching_tasks_of_unknown_list_creates_no_bucket() {
    let store = store();
    seed(&store, vec![todolist("A", "Work")]).await;
    store.transport().push(tasks_page(vec![task("z1", "Z", 0)]));

    assert_eq!(store.fetch_tasks("Z").await.unwrap().len(), 1);
    assert!(!store.snapshot().tasks.has_bucket("Z"));
}

#[tokio::test]
async fn unanswered_request_leaves_status_loading() {
    let store = todolist_core::Store::new(
        todolist_core::TodolistsApi::new(BASE_URL),
        SilentTransport,
    );

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), store.fetch_todolists()).await;

    assert!(timed_out.is_err());
    assert_eq!(store.snapshot().app.status(), RequestStatus::Loading);
}

// --- action interface ---

#[tokio::test]
async fn dispatch_runs_actions_by_identifier() {
    let store = store();
    store.transport().push(ok(json!([todolist("A", "Work")])));
    store.transport().push(envelope(json!({"item": task("t1", "A", 0)})));

    let fetched = store.dispatch(Action::FetchTodolists).await.unwrap();
    assert!(matches!(fetched, Fulfilled::Todolists(ref lists) if lists.len() == 1));

    let local = store
        .dispatch(Action::ChangeTodolistFilter {
            id: "A".into(),
            filter: FilterValue::Completed,
        })
        .await
        .unwrap();
    assert_eq!(local, Fulfilled::Local);

    let added = store
        .dispatch(Action::AddTask {
            todolist_id: "A".into(),
            title: "task t1".into(),
        })
        .await
        .unwrap();
    assert!(matches!(added, Fulfilled::TaskAdded(ref t) if t.id == "t1"));
    assert!(store.visible_tasks("A").is_empty());
}

#[tokio::test]
async fn initialize_app_tracks_login() {
    let store = store();
    store
        .transport()
        .push(envelope(json!({"id": 1, "email": "a@b.c", "login": "ann"})));

    let me = store.initialize_app().await.unwrap();

    assert_eq!(me.unwrap().login, "ann");
    let app = store.snapshot().app;
    assert!(app.is_initialized());
    assert!(app.is_logged_in());
}

#[tokio::test]
async fn initialize_app_network_failure_still_initializes() {
    let store = store();
    store.transport().push(network_error());

    assert!(store.initialize_app().await.is_err());

    let app = store.snapshot().app;
    assert!(app.is_initialized());
    assert!(!app.is_logged_in());
    assert_eq!(app.status(), RequestStatus::Idle);
}
