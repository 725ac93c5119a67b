//! Task buckets keyed by parent todolist id.
//!
//! # Design
//! A bucket exists for a todolist once it is created locally or once the
//! full todolist list has been fetched; removing the todolist drops the
//! bucket. Only those events create or drop buckets; task fetches and adds
//! that land after their list is gone are refused. Bucket order is the
//! server's order from the last fetch, with locally added tasks in front.
//!
//! Updating a task is a read-modify-write: the server wants the full record,
//! so `read_current_model` extracts it from the bucket and `merge_update`
//! overlays the caller's patch. Both are plain functions so a stale or
//! missing record can be fed in directly.

use std::collections::HashMap;

use crate::types::{Task, UpdateDomainTaskModel, UpdateTaskModel};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksState {
    buckets: HashMap<String, Vec<Task>>,
}

impl TasksState {
    pub fn bucket(&self, todolist_id: &str) -> Option<&[Task]> {
        self.buckets.get(todolist_id).map(Vec::as_slice)
    }

    pub fn has_bucket(&self, todolist_id: &str) -> bool {
        self.buckets.contains_key(todolist_id)
    }

    pub fn find(&self, todolist_id: &str, task_id: &str) -> Option<&Task> {
        self.bucket(todolist_id)?.iter().find(|t| t.id == task_id)
    }

    /// True when the list has no tasks loaded yet, which is when the UI asks
    /// the server for them.
    pub fn needs_tasks(&self, todolist_id: &str) -> bool {
        self.bucket(todolist_id).map_or(true, <[Task]>::is_empty)
    }

    /// Replaces the bucket wholesale. Returns false without creating one when
    /// the bucket does not exist (the list is unknown or was removed).
    pub fn set_tasks(&mut self, todolist_id: &str, tasks: Vec<Task>) -> bool {
        match self.buckets.get_mut(todolist_id) {
            Some(bucket) => {
                *bucket = tasks;
                true
            }
            None => false,
        }
    }

    /// Puts `task` at the front of its list's bucket. Returns false when the
    /// bucket does not exist (the list was removed meanwhile).
    pub fn prepend(&mut self, todolist_id: &str, task: Task) -> bool {
        match self.buckets.get_mut(todolist_id) {
            Some(bucket) => {
                bucket.insert(0, task);
                true
            }
            None => false,
        }
    }

    /// Removes the first task with `task_id`.
    pub fn remove(&mut self, todolist_id: &str, task_id: &str) -> bool {
        let Some(bucket) = self.buckets.get_mut(todolist_id) else {
            return false;
        };
        match bucket.iter().position(|t| t.id == task_id) {
            Some(index) => {
                bucket.remove(index);
                true
            }
            None => false,
        }
    }

    /// Applies only the patch fields to the stored task.
    pub fn apply_update(
        &mut self,
        todolist_id: &str,
        task_id: &str,
        patch: &UpdateDomainTaskModel,
    ) -> bool {
        let task = self
            .buckets
            .get_mut(todolist_id)
            .and_then(|bucket| bucket.iter_mut().find(|t| t.id == task_id));
        match task {
            Some(task) => {
                patch.apply_to(task);
                true
            }
            None => false,
        }
    }

    pub fn on_todolist_added(&mut self, todolist_id: &str) {
        self.buckets.insert(todolist_id.to_string(), Vec::new());
    }

    pub fn on_todolist_removed(&mut self, todolist_id: &str) {
        self.buckets.remove(todolist_id);
    }

    /// Every fetched list gets an empty bucket, discarding tasks loaded
    /// before. Buckets of lists absent from the fetch are left alone.
    pub fn on_todolists_fetched<'a>(&mut self, todolist_ids: impl IntoIterator<Item = &'a str>) {
        for id in todolist_ids {
            self.buckets.insert(id.to_string(), Vec::new());
        }
    }
}

/// The full record currently held for a task, if any.
pub fn read_current_model(
    tasks: &TasksState,
    todolist_id: &str,
    task_id: &str,
) -> Option<UpdateTaskModel> {
    tasks.find(todolist_id, task_id).map(|task| UpdateTaskModel {
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        priority: task.priority,
        start_date: task.start_date.clone(),
        deadline: task.deadline.clone(),
    })
}

/// `current` with every field present in `patch` replaced.
pub fn merge_update(current: UpdateTaskModel, patch: &UpdateDomainTaskModel) -> UpdateTaskModel {
    UpdateTaskModel {
        title: patch.title.clone().unwrap_or(current.title),
        description: patch.description.clone().or(current.description),
        status: patch.status.unwrap_or(current.status),
        priority: patch.priority.unwrap_or(current.priority),
        start_date: patch.start_date.clone().or(current.start_date),
        deadline: patch.deadline.clone().or(current.deadline),
    }
}
