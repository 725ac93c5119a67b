//! Synchronization operations as pending/settle halves over `RootState`.
//!
//! # Design
//! Each network operation is two synchronous steps around one request:
//!
//! - `begin_*` is the pending phase. It flips the status tracker (and, for
//!   removal, the todolist's `entity_status`) to `loading` and returns the
//!   request to send.
//! - `settle_*` takes whatever the transport produced. On success it mutates
//!   exactly one store (plus the task-bucket lifecycle hooks) and sets
//!   `succeeded`; on failure it records the message, sets `failed` and leaves
//!   the stores as they were.
//!
//! Both halves run to completion without awaiting, so they are atomic with
//! respect to each other no matter how many requests are in flight.

use tracing::{debug, info, warn};

use crate::action::ActionType;
use crate::client::TodolistsApi;
use crate::error::{ApiError, Failure};
use crate::http::{HttpRequest, HttpResponse};
use crate::state::{merge_update, read_current_model, RequestStatus, RootState};
use crate::types::{AuthMe, Task, Todolist, UpdateDomainTaskModel};

/// What the transport handed back for a request.
pub type Response = Result<HttpResponse, ApiError>;

impl RootState {
    // --- application ---

    /// Initialization does not drive the request status.
    pub fn begin_initialize_app(&mut self, api: &TodolistsApi) -> HttpRequest {
        debug!(action = %ActionType::InitializeApp, "pending");
        api.build_me()
    }

    /// `Ok(None)` means the server answered but nobody is logged in. The app
    /// counts as initialized whatever the outcome.
    pub fn settle_initialize_app(
        &mut self,
        api: &TodolistsApi,
        response: Response,
    ) -> Result<Option<AuthMe>, Failure> {
        let outcome = match response.map_err(Failure::from).and_then(|r| api.parse_me(r)) {
            Ok(me) => Ok(Some(me)),
            Err(Failure::Application { .. }) => Ok(None),
            Err(failure) => Err(failure),
        };
        self.app.set_logged_in(matches!(outcome, Ok(Some(_))));
        self.app.set_initialized(true);
        match &outcome {
            Ok(me) => info!(action = %ActionType::InitializeApp, logged_in = me.is_some(), "fulfilled"),
            Err(failure) => warn!(action = %ActionType::InitializeApp, error = %failure, "rejected"),
        }
        outcome
    }

    // --- todolists ---

    pub fn begin_fetch_todolists(&mut self, api: &TodolistsApi) -> HttpRequest {
        self.pending(ActionType::FetchTodolists);
        api.build_get_todolists()
    }

    pub fn settle_fetch_todolists(
        &mut self,
        api: &TodolistsApi,
        response: Response,
    ) -> Result<Vec<Todolist>, Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_get_todolists(r));
        self.settle(ActionType::FetchTodolists, outcome, |state, todolists| {
            state
                .tasks
                .on_todolists_fetched(todolists.iter().map(|tl| tl.id.as_str()));
            state.todolists.set_all(todolists.clone());
        })
    }

    pub fn begin_add_todolist(
        &mut self,
        api: &TodolistsApi,
        title: &str,
    ) -> Result<HttpRequest, Failure> {
        self.pending(ActionType::AddTodolist);
        let request = api.build_create_todolist(title);
        self.built(ActionType::AddTodolist, request)
    }

    pub fn settle_add_todolist(
        &mut self,
        api: &TodolistsApi,
        response: Response,
    ) -> Result<Todolist, Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_create_todolist(r));
        self.settle(ActionType::AddTodolist, outcome, |state, todolist| {
            state.tasks.on_todolist_added(&todolist.id);
            state.todolists.prepend(todolist.clone());
        })
    }

    /// Locks the row as well as the global status. The row is not unlocked
    /// on failure.
    pub fn begin_remove_todolist(&mut self, api: &TodolistsApi, id: &str) -> HttpRequest {
        self.pending(ActionType::RemoveTodolist);
        self.todolists.set_entity_status(id, RequestStatus::Loading);
        api.build_delete_todolist(id)
    }

    pub fn settle_remove_todolist(
        &mut self,
        api: &TodolistsApi,
        id: &str,
        response: Response,
    ) -> Result<(), Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_delete_todolist(r));
        self.settle(ActionType::RemoveTodolist, outcome, |state, _| {
            state.todolists.remove(id);
            state.tasks.on_todolist_removed(id);
        })
    }

    pub fn begin_change_todolist_title(
        &mut self,
        api: &TodolistsApi,
        id: &str,
        title: &str,
    ) -> Result<HttpRequest, Failure> {
        self.pending(ActionType::ChangeTodolistTitle);
        let request = api.build_update_todolist(id, title);
        self.built(ActionType::ChangeTodolistTitle, request)
    }

    pub fn settle_change_todolist_title(
        &mut self,
        api: &TodolistsApi,
        id: &str,
        title: &str,
        response: Response,
    ) -> Result<(), Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_update_todolist(r));
        self.settle(ActionType::ChangeTodolistTitle, outcome, |state, _| {
            state.todolists.change_title(id, title);
        })
    }

    // --- tasks ---

    pub fn begin_fetch_tasks(&mut self, api: &TodolistsApi, todolist_id: &str) -> HttpRequest {
        self.pending(ActionType::FetchTasks);
        api.build_get_tasks(todolist_id)
    }

    /// Tasks for a list that has no bucket (removed while the fetch was in
    /// flight, or never known) are dropped; the operation still succeeds.
    pub fn settle_fetch_tasks(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        response: Response,
    ) -> Result<Vec<Task>, Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_get_tasks(r));
        self.settle(ActionType::FetchTasks, outcome, |state, tasks| {
            if !state.tasks.set_tasks(todolist_id, tasks.clone()) {
                warn!(todolist_id, "tasks fetched for a list without a bucket, dropped");
            }
        })
    }

    pub fn begin_add_task(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        title: &str,
    ) -> Result<HttpRequest, Failure> {
        self.pending(ActionType::AddTask);
        let request = api.build_create_task(todolist_id, title);
        self.built(ActionType::AddTask, request)
    }

    /// On an application failure the returned `Failure` keeps the server's
    /// messages and field errors for the add-task form.
    pub fn settle_add_task(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        response: Response,
    ) -> Result<Task, Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_create_task(r));
        self.settle(ActionType::AddTask, outcome, |state, task| {
            if !state.tasks.prepend(todolist_id, task.clone()) {
                warn!(todolist_id, task_id = %task.id, "task added to a list without a bucket, dropped");
            }
        })
    }

    pub fn begin_remove_task(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        task_id: &str,
    ) -> HttpRequest {
        self.pending(ActionType::RemoveTask);
        api.build_delete_task(todolist_id, task_id)
    }

    pub fn settle_remove_task(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        task_id: &str,
        response: Response,
    ) -> Result<(), Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_delete_task(r));
        self.settle(ActionType::RemoveTask, outcome, |state, _| {
            state.tasks.remove(todolist_id, task_id);
        })
    }

    /// Reads the full local record, overlays `patch` and builds the PUT.
    ///
    /// A task missing locally aborts with `Failure::TaskNotFound` before
    /// anything else happens: no request, no status change.
    pub fn begin_update_task(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        task_id: &str,
        patch: &UpdateDomainTaskModel,
    ) -> Result<HttpRequest, Failure> {
        let Some(current) = read_current_model(&self.tasks, todolist_id, task_id) else {
            let failure = Failure::TaskNotFound {
                todolist_id: todolist_id.to_string(),
                task_id: task_id.to_string(),
            };
            return Err(self.reject(ActionType::UpdateTask, failure));
        };
        let model = merge_update(current, patch);
        self.pending(ActionType::UpdateTask);
        let request = api.build_update_task(todolist_id, task_id, &model);
        self.built(ActionType::UpdateTask, request)
    }

    /// Only `patch` is applied locally, not the merged record that was sent.
    pub fn settle_update_task(
        &mut self,
        api: &TodolistsApi,
        todolist_id: &str,
        task_id: &str,
        patch: &UpdateDomainTaskModel,
        response: Response,
    ) -> Result<(), Failure> {
        let outcome = response
            .map_err(Failure::from)
            .and_then(|r| api.parse_update_task(r));
        self.settle(ActionType::UpdateTask, outcome, |state, _| {
            state.tasks.apply_update(todolist_id, task_id, patch);
        })
    }

    fn pending(&mut self, action: ActionType) {
        debug!(%action, "pending");
        self.app.set_status(RequestStatus::Loading);
    }

    /// Rejects right away when the request body could not be built.
    fn built(
        &mut self,
        action: ActionType,
        request: Result<HttpRequest, ApiError>,
    ) -> Result<HttpRequest, Failure> {
        request.map_err(|err| self.reject(action, err.into()))
    }

    fn settle<T>(
        &mut self,
        action: ActionType,
        outcome: Result<T, Failure>,
        apply: impl FnOnce(&mut Self, &T),
    ) -> Result<T, Failure> {
        match outcome {
            Ok(value) => {
                apply(self, &value);
                self.app.set_status(RequestStatus::Succeeded);
                info!(%action, "fulfilled");
                Ok(value)
            }
            Err(failure) => Err(self.reject(action, failure)),
        }
    }

    /// Local failures are logged but kept out of the status tracker.
    fn reject(&mut self, action: ActionType, failure: Failure) -> Failure {
        warn!(%action, error = %failure, "rejected");
        if failure.is_remote() {
            self.app.report(&failure);
        }
        failure
    }
}
