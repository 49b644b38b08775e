//! Reporting and insights use-cases.
//!
//! # Responsibility
//! - Provide stable entry points over the reporting repository.
//!
//! # Invariants
//! - All operations are read-only and independent of each other.

use crate::model::user::Session;
use crate::repo::report_repo::{
    DueDateHighlight, PerformanceRecord, ReportRepository, StatusCount, TaskLeader,
};
use crate::service::ServiceResult;

/// Use-case service wrapper for aggregate reporting.
pub struct ReportService<R: ReportRepository> {
    repo: R,
}

impl<R: ReportRepository> ReportService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Number of goals per status.
    pub fn count_goals_by_status(&self) -> ServiceResult<Vec<StatusCount>> {
        Ok(self.repo.count_goals_by_status()?)
    }

    /// Mean of per-employee goal counts; `None` when no goals exist.
    pub fn average_goals_per_employee(&self) -> ServiceResult<Option<f64>> {
        Ok(self.repo.average_goals_per_employee()?)
    }

    /// Goal with the latest due date, if any goals exist.
    pub fn goal_with_latest_due_date(&self) -> ServiceResult<Option<DueDateHighlight>> {
        Ok(self.repo.goal_with_latest_due_date()?)
    }

    /// Goal with the earliest due date, if any goals exist.
    pub fn goal_with_earliest_due_date(&self) -> ServiceResult<Option<DueDateHighlight>> {
        Ok(self.repo.goal_with_earliest_due_date()?)
    }

    /// Goal with the most logged tasks; goals without tasks never appear.
    pub fn goal_with_most_tasks(&self) -> ServiceResult<Option<TaskLeader>> {
        Ok(self.repo.goal_with_most_tasks()?)
    }

    /// Performance history for the session user's side of the relation.
    ///
    /// Managers see their team's goals with employee names; employees see
    /// their own goals without. Goals without feedback still appear.
    pub fn performance_history(&self, session: &Session) -> ServiceResult<Vec<PerformanceRecord>> {
        Ok(self
            .repo
            .performance_history(session.user_id, session.role)?)
    }
}
