//! Goal, task and feedback use-cases.
//!
//! # Responsibility
//! - Provide the goal-management entry points for core callers.
//! - Evaluate the ownership policy before every mutation.
//!
//! # Invariants
//! - Every mutating operation authorizes the session first and returns
//!   `Forbidden` on a policy violation, before touching storage.
//! - Read operations filter by the requested id without a policy gate.

use crate::model::goal::{Feedback, FeedbackId, Goal, GoalId, GoalStatus, Task, TaskId};
use crate::model::user::{Session, UserId};
use crate::policy::{authorize_create, authorize_on_goal, GoalAction, PolicyViolation};
use crate::repo::goal_repo::{GoalFeedback, GoalRepository};
use crate::repo::RepoError;
use crate::service::{ServiceError, ServiceResult};
use log::warn;

/// Use-case service wrapper for the goal aggregate.
pub struct GoalService<R: GoalRepository> {
    repo: R,
}

impl<R: GoalRepository> GoalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Assigns a new goal to an employee.
    ///
    /// # Contract
    /// - The caller must hold the manager role; the session user becomes
    ///   the goal's manager.
    /// - The new goal starts at status `Draft`.
    pub fn create_goal(
        &self,
        session: &Session,
        employee_id: UserId,
        description: &str,
        due_date: &str,
    ) -> ServiceResult<GoalId> {
        authorize_create(session).map_err(denied)?;
        Ok(self
            .repo
            .create_goal(employee_id, session.user_id, description, due_date)?)
    }

    /// Loads one goal by id.
    pub fn goal(&self, goal_id: GoalId) -> ServiceResult<Option<Goal>> {
        Ok(self.repo.get_goal(goal_id)?)
    }

    /// Lists goals assigned to an employee. Order is unspecified.
    pub fn list_goals_for_employee(&self, employee_id: UserId) -> ServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals_for_employee(employee_id)?)
    }

    /// Lists goals owned by a manager. Order is unspecified.
    pub fn list_goals_for_manager(&self, manager_id: UserId) -> ServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals_for_manager(manager_id)?)
    }

    /// Moves a goal to a new status.
    ///
    /// Transitions are free among the four values; only the owning manager
    /// may perform them.
    pub fn update_goal_status(
        &self,
        session: &Session,
        goal_id: GoalId,
        status: GoalStatus,
    ) -> ServiceResult<()> {
        let goal = self.require_goal(goal_id)?;
        authorize_on_goal(session, GoalAction::UpdateStatus, &goal).map_err(denied)?;
        Ok(self.repo.update_goal_status(goal_id, status)?)
    }

    /// Deletes a goal with its tasks and feedback as one atomic unit.
    pub fn delete_goal(&mut self, session: &Session, goal_id: GoalId) -> ServiceResult<()> {
        let goal = self.require_goal(goal_id)?;
        authorize_on_goal(session, GoalAction::Delete, &goal).map_err(denied)?;
        Ok(self.repo.delete_goal(goal_id)?)
    }

    /// Logs a task against a goal, unapproved by default.
    pub fn log_task(
        &self,
        session: &Session,
        goal_id: GoalId,
        description: &str,
    ) -> ServiceResult<TaskId> {
        let goal = self.require_goal(goal_id)?;
        authorize_on_goal(session, GoalAction::LogTask, &goal).map_err(denied)?;
        Ok(self.repo.log_task(goal_id, description)?)
    }

    /// Lists tasks logged against a goal.
    pub fn list_tasks_for_goal(&self, goal_id: GoalId) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks_for_goal(goal_id)?)
    }

    /// Marks a logged task as approved by the owning manager.
    pub fn approve_task(&self, session: &Session, task_id: TaskId) -> ServiceResult<()> {
        let task = match self.repo.get_task(task_id)? {
            Some(task) => task,
            None => {
                return Err(RepoError::NotFound {
                    entity: "task",
                    id: task_id,
                }
                .into());
            }
        };

        let goal = self.require_goal(task.goal_id)?;
        authorize_on_goal(session, GoalAction::ApproveTask, &goal).map_err(denied)?;
        Ok(self.repo.approve_task(task_id)?)
    }

    /// Attaches feedback to a goal. Feedback is immutable once written.
    pub fn submit_feedback(
        &self,
        session: &Session,
        goal_id: GoalId,
        text: &str,
    ) -> ServiceResult<FeedbackId> {
        let goal = self.require_goal(goal_id)?;
        authorize_on_goal(session, GoalAction::SubmitFeedback, &goal).map_err(denied)?;
        Ok(self.repo.submit_feedback(goal_id, text)?)
    }

    /// Lists feedback attached to one goal.
    pub fn list_feedback_for_goal(&self, goal_id: GoalId) -> ServiceResult<Vec<Feedback>> {
        Ok(self.repo.list_feedback_for_goal(goal_id)?)
    }

    /// Lists feedback on goals where the session user is the employee or
    /// the manager, depending on role.
    pub fn list_feedback_visible_to(&self, session: &Session) -> ServiceResult<Vec<GoalFeedback>> {
        Ok(self
            .repo
            .list_feedback_visible_to(session.user_id, session.role)?)
    }

    fn require_goal(&self, goal_id: GoalId) -> ServiceResult<Goal> {
        match self.repo.get_goal(goal_id)? {
            Some(goal) => Ok(goal),
            None => Err(RepoError::NotFound {
                entity: "goal",
                id: goal_id,
            }
            .into()),
        }
    }
}

fn denied(violation: PolicyViolation) -> ServiceError {
    warn!("event=policy_denied module=service violation={violation}");
    ServiceError::Forbidden(violation)
}
