//! Goal aggregate model: goals and their attached tasks and feedback.
//!
//! # Responsibility
//! - Define the `Goal`, `Task` and `Feedback` records and the goal status
//!   lifecycle values.
//! - Validate free-text fields and the due-date format on write paths.
//!
//! # Invariants
//! - A goal always references one employee and one manager.
//! - `status` starts at `Draft` and moves freely among the four values;
//!   no transition ordering is enforced.
//! - `due_date` is an ISO `YYYY-MM-DD` string, so lexicographic order
//!   equals calendar order.

use crate::model::user::UserId;
use crate::model::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Stable identifier for a goal.
pub type GoalId = i64;
/// Stable identifier for a logged task.
pub type TaskId = i64;
/// Stable identifier for a feedback entry.
pub type FeedbackId = i64;

static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));

/// Lifecycle state of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Assigned but not yet started.
    Draft,
    /// Work is under way.
    InProgress,
    /// Finished to the manager's satisfaction.
    Completed,
    /// No longer pursued.
    Cancelled,
}

/// Objective assigned by a manager to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub goal_id: GoalId,
    pub employee_id: UserId,
    pub manager_id: UserId,
    pub description: String,
    /// ISO `YYYY-MM-DD` calendar date.
    pub due_date: String,
    pub status: GoalStatus,
}

/// Unit of work an employee logs against a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub goal_id: GoalId,
    pub description: String,
    pub approved: bool,
}

/// Free-text commentary a manager attaches to a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: FeedbackId,
    pub goal_id: GoalId,
    pub text: String,
}

pub fn validate_goal_description(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyGoalDescription);
    }
    Ok(())
}

pub fn validate_task_description(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyTaskDescription);
    }
    Ok(())
}

pub fn validate_feedback_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyFeedbackText);
    }
    Ok(())
}

/// Rejects due dates that are not `YYYY-MM-DD` strings.
pub fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    if !DUE_DATE_RE.is_match(value) {
        return Err(ValidationError::InvalidDueDate(value.to_string()));
    }
    Ok(())
}
