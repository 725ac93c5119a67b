//! Ordered collection of todolists with their client-only fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::app::RequestStatus;
use super::filter::FilterValue;
use crate::types::Todolist;

/// A todolist as held by the store. `filter` and `entity_status` never
/// leave the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodolistDomain {
    pub id: String,
    pub title: String,
    pub added_date: NaiveDateTime,
    pub order: i64,
    pub filter: FilterValue,
    pub entity_status: RequestStatus,
}

impl From<Todolist> for TodolistDomain {
    fn from(todolist: Todolist) -> Self {
        Self {
            id: todolist.id,
            title: todolist.title,
            added_date: todolist.added_date,
            order: todolist.order,
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
        }
    }
}

/// Lookups are linear scans by id. Mutations that target an unknown id do
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodolistsState {
    items: Vec<TodolistDomain>,
}

impl TodolistsState {
    pub fn items(&self) -> &[TodolistDomain] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&TodolistDomain> {
        self.items.iter().find(|tl| tl.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces everything with the server's list, in server order.
    pub fn set_all(&mut self, todolists: Vec<Todolist>) {
        self.items = todolists.into_iter().map(TodolistDomain::from).collect();
    }

    pub fn prepend(&mut self, todolist: Todolist) {
        self.items.insert(0, todolist.into());
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.items.iter().position(|tl| tl.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn change_title(&mut self, id: &str, title: &str) {
        if let Some(todolist) = self.find_mut(id) {
            todolist.title = title.to_string();
        }
    }

    pub fn change_filter(&mut self, id: &str, filter: FilterValue) {
        if let Some(todolist) = self.find_mut(id) {
            todolist.filter = filter;
        }
    }

    pub fn set_entity_status(&mut self, id: &str, status: RequestStatus) {
        if let Some(todolist) = self.find_mut(id) {
            todolist.entity_status = status;
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut TodolistDomain> {
        self.items.iter_mut().find(|tl| tl.id == id)
    }
}
