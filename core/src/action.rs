//! The action interface offered to the UI layer.
//!
//! Every operation has a stable identifier and a typed parameter set.
//! Dispatching an `Action` through `Store::dispatch` yields
//! `Ok(Fulfilled)` or `Err(Failure)`; the pending phase is visible through
//! the status tracker while the request is in flight.

use std::fmt;

use crate::state::{FilterValue, RequestStatus};
use crate::types::{AuthMe, Task, Todolist, UpdateDomainTaskModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    InitializeApp,
    FetchTodolists,
    AddTodolist,
    RemoveTodolist,
    ChangeTodolistTitle,
    ChangeTodolistFilter,
    ChangeTodolistEntityStatus,
    FetchTasks,
    AddTask,
    RemoveTask,
    UpdateTask,
}

impl ActionType {
    pub const ALL: [ActionType; 11] = [
        ActionType::InitializeApp,
        ActionType::FetchTodolists,
        ActionType::AddTodolist,
        ActionType::RemoveTodolist,
        ActionType::ChangeTodolistTitle,
        ActionType::ChangeTodolistFilter,
        ActionType::ChangeTodolistEntityStatus,
        ActionType::FetchTasks,
        ActionType::AddTask,
        ActionType::RemoveTask,
        ActionType::UpdateTask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::InitializeApp => "application/initializeApp",
            ActionType::FetchTodolists => "todolists/fetchTodolists",
            ActionType::AddTodolist => "todolists/addTodolist",
            ActionType::RemoveTodolist => "todolists/removeTodolist",
            ActionType::ChangeTodolistTitle => "todolists/changeTodolistTitle",
            ActionType::ChangeTodolistFilter => "todolists/changeTodolistFilter",
            ActionType::ChangeTodolistEntityStatus => "todolists/changeTodolistEntityStatus",
            ActionType::FetchTasks => "tasks/fetchTasks",
            ActionType::AddTask => "tasks/addTask",
            ActionType::RemoveTask => "tasks/removeTask",
            ActionType::UpdateTask => "tasks/updateTask",
        }
    }

    /// Looks an identifier up, e.g. `"tasks/addTask"`.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == identifier)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InitializeApp,
    FetchTodolists,
    AddTodolist {
        title: String,
    },
    RemoveTodolist {
        id: String,
    },
    ChangeTodolistTitle {
        id: String,
        title: String,
    },
    ChangeTodolistFilter {
        id: String,
        filter: FilterValue,
    },
    ChangeTodolistEntityStatus {
        id: String,
        status: RequestStatus,
    },
    FetchTasks {
        todolist_id: String,
    },
    AddTask {
        todolist_id: String,
        title: String,
    },
    RemoveTask {
        todolist_id: String,
        task_id: String,
    },
    UpdateTask {
        todolist_id: String,
        task_id: String,
        model: UpdateDomainTaskModel,
    },
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::InitializeApp => ActionType::InitializeApp,
            Action::FetchTodolists => ActionType::FetchTodolists,
            Action::AddTodolist { .. } => ActionType::AddTodolist,
            Action::RemoveTodolist { .. } => ActionType::RemoveTodolist,
            Action::ChangeTodolistTitle { .. } => ActionType::ChangeTodolistTitle,
            Action::ChangeTodolistFilter { .. } => ActionType::ChangeTodolistFilter,
            Action::ChangeTodolistEntityStatus { .. } => ActionType::ChangeTodolistEntityStatus,
            Action::FetchTasks { .. } => ActionType::FetchTasks,
            Action::AddTask { .. } => ActionType::AddTask,
            Action::RemoveTask { .. } => ActionType::RemoveTask,
            Action::UpdateTask { .. } => ActionType::UpdateTask,
        }
    }
}

/// Payload of a fulfilled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfilled {
    Initialized { me: Option<AuthMe> },
    Todolists(Vec<Todolist>),
    TodolistAdded(Todolist),
    TodolistRemoved { id: String },
    TodolistTitleChanged { id: String, title: String },
    Tasks { todolist_id: String, tasks: Vec<Task> },
    TaskAdded(Task),
    TaskRemoved { todolist_id: String, task_id: String },
    TaskUpdated {
        todolist_id: String,
        task_id: String,
        model: UpdateDomainTaskModel,
    },
    /// A local-only action ran.
    Local,
}
