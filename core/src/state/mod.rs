//! The state container the operations read and mutate.
//!
//! `RootState` is an ordinary value: nothing global, nothing shared by
//! default. The async driver in `store` wraps one in a mutex; tests build
//! them directly.

pub mod app;
pub mod filter;
pub mod tasks;
pub mod todolists;

use crate::types::Task;

pub use app::{AppState, RequestStatus};
pub use filter::{visible_tasks, FilterValue};
pub use tasks::{merge_update, read_current_model, TasksState};
pub use todolists::{TodolistDomain, TodolistsState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub app: AppState,
    pub todolists: TodolistsState,
    pub tasks: TasksState,
}

impl RootState {
    /// Tasks of `todolist_id` under that list's current filter. Empty when
    /// either the list or its bucket is unknown.
    pub fn visible_tasks(&self, todolist_id: &str) -> Vec<&Task> {
        match (self.todolists.get(todolist_id), self.tasks.bucket(todolist_id)) {
            (Some(todolist), Some(bucket)) => visible_tasks(todolist.filter, bucket),
            _ => Vec::new(),
        }
    }

    /// Local-only: never fails, never touches the network.
    pub fn change_todolist_filter(&mut self, id: &str, filter: FilterValue) {
        self.todolists.change_filter(id, filter);
    }

    /// Local-only: never fails, never touches the network.
    pub fn set_todolist_entity_status(&mut self, id: &str, status: RequestStatus) {
        self.todolists.set_entity_status(id, status);
    }
}
