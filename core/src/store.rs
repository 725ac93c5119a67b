//! Async driver running operations against a `Transport`.
//!
//! # Design
//! `Store` owns the `RootState` behind a `std::sync::Mutex` that is only
//! locked inside the synchronous begin/settle halves, never across an
//! `.await`. Methods take `&self`, so any number of operations can be in
//! flight at once; there is no per-entity guard or queueing between them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::action::{Action, Fulfilled};
use crate::client::TodolistsApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, Failure};
use crate::state::{FilterValue, RequestStatus, RootState};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{AuthMe, Task, Todolist, UpdateDomainTaskModel};

pub struct Store<T> {
    state: Mutex<RootState>,
    api: TodolistsApi,
    transport: T,
}

impl Store<ReqwestTransport> {
    /// A store talking to the service described by `config` over HTTP.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            TodolistsApi::from_config(config),
            ReqwestTransport::new(config)?,
        ))
    }
}

impl<T: Transport> Store<T> {
    pub fn new(api: TodolistsApi, transport: T) -> Self {
        Self::with_state(RootState::default(), api, transport)
    }

    pub fn with_state(state: RootState, api: TodolistsApi, transport: T) -> Self {
        Self {
            state: Mutex::new(state),
            api,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> RootState {
        self.lock().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        f(&self.lock())
    }

    /// Tasks of a list under its current filter.
    pub fn visible_tasks(&self, todolist_id: &str) -> Vec<Task> {
        self.read(|state| state.visible_tasks(todolist_id).into_iter().cloned().collect())
    }

    pub async fn initialize_app(&self) -> Result<Option<AuthMe>, Failure> {
        let request = self.update(|s| s.begin_initialize_app(&self.api));
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_initialize_app(&self.api, response))
    }

    pub async fn fetch_todolists(&self) -> Result<Vec<Todolist>, Failure> {
        let request = self.update(|s| s.begin_fetch_todolists(&self.api));
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_fetch_todolists(&self.api, response))
    }

    pub async fn add_todolist(&self, title: &str) -> Result<Todolist, Failure> {
        let request = self.update(|s| s.begin_add_todolist(&self.api, title))?;
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_add_todolist(&self.api, response))
    }

    pub async fn remove_todolist(&self, id: &str) -> Result<(), Failure> {
        let request = self.update(|s| s.begin_remove_todolist(&self.api, id));
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_remove_todolist(&self.api, id, response))
    }

    pub async fn change_todolist_title(&self, id: &str, title: &str) -> Result<(), Failure> {
        let request = self.update(|s| s.begin_change_todolist_title(&self.api, id, title))?;
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_change_todolist_title(&self.api, id, title, response))
    }

    pub fn change_todolist_filter(&self, id: &str, filter: FilterValue) {
        self.update(|s| s.change_todolist_filter(id, filter));
    }

    pub fn set_todolist_entity_status(&self, id: &str, status: RequestStatus) {
        self.update(|s| s.set_todolist_entity_status(id, status));
    }

    pub async fn fetch_tasks(&self, todolist_id: &str) -> Result<Vec<Task>, Failure> {
        let request = self.update(|s| s.begin_fetch_tasks(&self.api, todolist_id));
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_fetch_tasks(&self.api, todolist_id, response))
    }

    /// Fetches tasks only when the list has none loaded; `None` when skipped.
    pub async fn ensure_tasks(&self, todolist_id: &str) -> Option<Result<Vec<Task>, Failure>> {
        if !self.read(|s| s.tasks.needs_tasks(todolist_id)) {
            return None;
        }
        Some(self.fetch_tasks(todolist_id).await)
    }

    pub async fn add_task(&self, todolist_id: &str, title: &str) -> Result<Task, Failure> {
        let request = self.update(|s| s.begin_add_task(&self.api, todolist_id, title))?;
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_add_task(&self.api, todolist_id, response))
    }

    pub async fn remove_task(&self, todolist_id: &str, task_id: &str) -> Result<(), Failure> {
        let request = self.update(|s| s.begin_remove_task(&self.api, todolist_id, task_id));
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_remove_task(&self.api, todolist_id, task_id, response))
    }

    pub async fn update_task(
        &self,
        todolist_id: &str,
        task_id: &str,
        patch: &UpdateDomainTaskModel,
    ) -> Result<(), Failure> {
        let request =
            self.update(|s| s.begin_update_task(&self.api, todolist_id, task_id, patch))?;
        let response = self.transport.execute(request).await;
        self.update(|s| s.settle_update_task(&self.api, todolist_id, task_id, patch, response))
    }

    /// Runs an action given as identifier plus parameters.
    pub async fn dispatch(&self, action: Action) -> Result<Fulfilled, Failure> {
        match action {
            Action::InitializeApp => self
                .initialize_app()
                .await
                .map(|me| Fulfilled::Initialized { me }),
            Action::FetchTodolists => self.fetch_todolists().await.map(Fulfilled::Todolists),
            Action::AddTodolist { title } => {
                self.add_todolist(&title).await.map(Fulfilled::TodolistAdded)
            }
            Action::RemoveTodolist { id } => self
                .remove_todolist(&id)
                .await
                .map(|()| Fulfilled::TodolistRemoved { id }),
            Action::ChangeTodolistTitle { id, title } => self
                .change_todolist_title(&id, &title)
                .await
                .map(|()| Fulfilled::TodolistTitleChanged { id, title }),
            Action::ChangeTodolistFilter { id, filter } => {
                self.change_todolist_filter(&id, filter);
                Ok(Fulfilled::Local)
            }
            Action::ChangeTodolistEntityStatus { id, status } => {
                self.set_todolist_entity_status(&id, status);
                Ok(Fulfilled::Local)
            }
            Action::FetchTasks { todolist_id } => self
                .fetch_tasks(&todolist_id)
                .await
                .map(|tasks| Fulfilled::Tasks { todolist_id, tasks }),
            Action::AddTask { todolist_id, title } => self
                .add_task(&todolist_id, &title)
                .await
                .map(Fulfilled::TaskAdded),
            Action::RemoveTask {
                todolist_id,
                task_id,
            } => self
                .remove_task(&todolist_id, &task_id)
                .await
                .map(|()| Fulfilled::TaskRemoved {
                    todolist_id,
                    task_id,
                }),
            Action::UpdateTask {
                todolist_id,
                task_id,
                model,
            } => self
                .update_task(&todolist_id, &task_id, &model)
                .await
                .map(|()| Fulfilled::TaskUpdated {
                    todolist_id,
                    task_id,
                    model,
                }),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut RootState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Mutations never panic midway, so a poisoned lock still guards a
    /// consistent state.
    fn lock(&self) -> MutexGuard<'_, RootState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
