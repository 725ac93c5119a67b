//! Client-side task filtering.

use serde::{Deserialize, Serialize};

use crate::types::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterValue {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Active => task.status == TaskStatus::New,
            FilterValue::Completed => task.status == TaskStatus::Completed,
        }
    }
}

/// The subset of `bucket` shown under `filter`, in bucket order.
///
/// `InProgress` and `Draft` tasks only show up under `All`.
pub fn visible_tasks(filter: FilterValue, bucket: &[Task]) -> Vec<&Task> {
    bucket.iter().filter(|task| filter.matches(task)).collect()
}
