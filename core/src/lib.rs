//! Client-side synchronization core for the todolist service.
//!
//! # Overview
//! Keeps an in-memory view of todolists and their tasks consistent with the
//! remote service while requests succeed, fail at the application level
//! (`resultCode != 0`) or fail in transit.
//!
//! # Design
//! - `TodolistsApi` builds `HttpRequest`s and parses `HttpResponse`s without
//!   touching the network; a `Transport` does the round-trip.
//! - `RootState` is an explicit container (status tracker, todolist store,
//!   task store). Every operation is a `begin_*` (pending) and `settle_*`
//!   (fulfilled or rejected) pair of synchronous methods on it.
//! - `Store` drives those pairs asynchronously and exposes the `Action`
//!   interface used by the UI.
//! - Both failure tiers end up in one `Failure` type.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod operations;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use action::{Action, ActionType, Fulfilled};
pub use client::TodolistsApi;
pub use config::ClientConfig;
pub use error::{ApiError, Failure, GENERIC_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{FilterValue, RequestStatus, RootState, TodolistDomain};
pub use store::Store;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    AuthMe, FieldError, Task, TaskPriority, TaskStatus, Todolist, UpdateDomainTaskModel,
    UpdateTaskModel,
};
