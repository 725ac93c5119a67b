//! Property checks for the fetch-replace and filtering invariants.

use chrono::NaiveDateTime;
use proptest::prelude::*;
use todolist_core::client::TodolistsApi;
use todolist_core::state::{visible_tasks, FilterValue, RequestStatus, RootState};
use todolist_core::{HttpResponse, Task, TaskPriority, TaskStatus, Todolist};

fn status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::New),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Draft),
    ]
}

fn tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(status(), 0..20).prop_map(|statuses| {
        statuses
            .into_iter()
            .enumerate()
            .map(|(i, status)| Task {
                id: format!("t{i}"),
                todo_list_id: "A".to_string(),
                title: format!("task {i}"),
                description: None,
                status,
                priority: TaskPriority::Middle,
                start_date: None,
                deadline: None,
                order: i as i64,
                added_date: NaiveDateTime::default(),
            })
            .collect()
    })
}

fn todolists() -> impl Strategy<Value = Vec<Todolist>> {
    prop::collection::vec("[a-z]{1,8}", 0..8).prop_map(|titles| {
        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| Todolist {
                id: format!("tl{i}"),
                title,
                added_date: NaiveDateTime::default(),
                order: i as i64,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn filtered_view_respects_filter(bucket in tasks()) {
        let active = visible_tasks(FilterValue::Active, &bucket);
        prop_assert!(active.iter().all(|t| t.status == TaskStatus::New));

        let completed = visible_tasks(FilterValue::Completed, &bucket);
        prop_assert!(completed.iter().all(|t| t.status == TaskStatus::Completed));

        let all = visible_tasks(FilterValue::All, &bucket);
        prop_assert_eq!(all.len(), bucket.len());
    }

    #[test]
    fn fetch_replaces_store_exactly(first in todolists(), second in todolists()) {
        let api = TodolistsApi::new("http://localhost:3000");
        let mut state = RootState::default();

        for lists in [&first, &second] {
            state.begin_fetch_todolists(&api);
            let body = serde_json::to_string(lists).unwrap();
            state.settle_fetch_todolists(&api, Ok(HttpResponse::ok(body))).unwrap();
        }

        prop_assert_eq!(state.todolists.len(), second.len());
        for (held, sent) in state.todolists.items().iter().zip(&second) {
            prop_assert_eq!(&held.id, &sent.id);
            prop_assert_eq!(&held.title, &sent.title);
            prop_assert_eq!(held.filter, FilterValue::All);
            prop_assert_eq!(held.entity_status, RequestStatus::Idle);
            prop_assert!(state.tasks.bucket(&sent.id).is_some_and(<[Task]>::is_empty));
        }
    }
}
