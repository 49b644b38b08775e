//! Authorization policy for mutating goal operations.
//!
//! # Responsibility
//! - Decide whether a caller session may perform an action on a goal.
//! - Produce typed violations for denied actions.
//!
//! # Invariants
//! - Mutations are denied unless the session satisfies the action's
//!   ownership rule; there is no allow-by-default path.
//! - Read operations are not gated here; visibility filtering happens in
//!   the repository queries themselves.

use crate::model::goal::{Goal, GoalId};
use crate::model::user::{Session, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutating operation on a goal or one of its attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalAction {
    Create,
    UpdateStatus,
    Delete,
    LogTask,
    ApproveTask,
    SubmitFeedback,
}

impl GoalAction {
    /// Stable string id used in logging events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create_goal",
            Self::UpdateStatus => "update_goal_status",
            Self::Delete => "delete_goal",
            Self::LogTask => "log_task",
            Self::ApproveTask => "approve_task",
            Self::SubmitFeedback => "submit_feedback",
        }
    }
}

/// Typed authorization failures surfaced to callers as `Forbidden`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The action requires the manager role.
    ManagerRoleRequired { action: GoalAction, caller: UserId },
    /// The caller is not the manager who owns the goal.
    NotGoalManager {
        action: GoalAction,
        goal_id: GoalId,
        caller: UserId,
    },
    /// The caller is not the employee the goal is assigned to.
    NotGoalEmployee {
        action: GoalAction,
        goal_id: GoalId,
        caller: UserId,
    },
}

impl Display for PolicyViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagerRoleRequired { action, caller } => write!(
                f,
                "action {} requires the manager role (caller {caller})",
                action.as_str()
            ),
            Self::NotGoalManager {
                action,
                goal_id,
                caller,
            } => write!(
                f,
                "action {} on goal {goal_id} is restricted to the owning manager (caller {caller})",
                action.as_str()
            ),
            Self::NotGoalEmployee {
                action,
                goal_id,
                caller,
            } => write!(
                f,
                "action {} on goal {goal_id} is restricted to the assigned employee (caller {caller})",
                action.as_str()
            ),
        }
    }
}

impl Error for PolicyViolation {}

/// Authorizes goal creation, which has no existing goal row to check.
pub fn authorize_create(session: &Session) -> Result<(), PolicyViolation> {
    if !session.role.is_manager() {
        return Err(PolicyViolation::ManagerRoleRequired {
            action: GoalAction::Create,
            caller: session.user_id,
        });
    }
    Ok(())
}

/// Authorizes an action against an existing goal.
pub fn authorize_on_goal(
    session: &Session,
    action: GoalAction,
    goal: &Goal,
) -> Result<(), PolicyViolation> {
    match action {
        GoalAction::Create => authorize_create(session),
        GoalAction::LogTask => require_goal_employee(session, action, goal),
        GoalAction::UpdateStatus
        | GoalAction::Delete
        | GoalAction::ApproveTask
        | GoalAction::SubmitFeedback => require_goal_manager(session, action, goal),
    }
}

fn require_goal_manager(
    session: &Session,
    action: GoalAction,
    goal: &Goal,
) -> Result<(), PolicyViolation> {
    if !session.role.is_manager() {
        return Err(PolicyViolation::ManagerRoleRequired {
            action,
            caller: session.user_id,
        });
    }
    if session.user_id != goal.manager_id {
        return Err(PolicyViolation::NotGoalManager {
            action,
            goal_id: goal.goal_id,
            caller: session.user_id,
        });
    }
    Ok(())
}

fn require_goal_employee(
    session: &Session,
    action: GoalAction,
    goal: &Goal,
) -> Result<(), PolicyViolation> {
    if session.user_id != goal.employee_id {
        return Err(PolicyViolation::NotGoalEmployee {
            action,
            goal_id: goal.goal_id,
            caller: session.user_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{authorize_create, authorize_on_goal, GoalAction, PolicyViolation};
    use crate::model::goal::{Goal, GoalStatus};
    use crate::model::user::{Role, Session};

    fn session(user_id: i64, role: Role) -> Session {
        Session {
            user_id,
            username: format!("user-{user_id}"),
            role,
        }
    }

    fn goal(employee_id: i64, manager_id: i64) -> Goal {
        Goal {
            goal_id: 7,
            employee_id,
            manager_id,
            description: "ship quarterly report".to_string(),
            due_date: "2026-09-30".to_string(),
            status: GoalStatus::Draft,
        }
    }

    #[test]
    fn create_requires_manager_role() {
        assert!(authorize_create(&session(1, Role::Manager)).is_ok());
        let err = authorize_create(&session(1, Role::Employee)).unwrap_err();
        assert!(matches!(err, PolicyViolation::ManagerRoleRequired { .. }));
    }

    #[test]
    fn manager_actions_are_denied_for_employees() {
        let target = goal(1, 2);
        for action in [
            GoalAction::UpdateStatus,
            GoalAction::Delete,
            GoalAction::ApproveTask,
            GoalAction::SubmitFeedback,
        ] {
            let err = authorize_on_goal(&session(1, Role::Employee), action, &target).unwrap_err();
            assert!(matches!(err, PolicyViolation::ManagerRoleRequired { .. }));
        }
    }

    #[test]
    fn manager_actions_are_denied_for_non_owning_manager() {
        let target = goal(1, 2);
        for action in [
            GoalAction::UpdateStatus,
            GoalAction::Delete,
            GoalAction::ApproveTask,
            GoalAction::SubmitFeedback,
        ] {
            let err = authorize_on_goal(&session(9, Role::Manager), action, &target).unwrap_err();
            assert!(matches!(err, PolicyViolation::NotGoalManager { .. }));
        }
    }

    #[test]
    fn owning_manager_is_allowed() {
        let target = goal(1, 2);
        assert!(authorize_on_goal(&session(2, Role::Manager), GoalAction::UpdateStatus, &target).is_ok());
        assert!(authorize_on_goal(&session(2, Role::Manager), GoalAction::Delete, &target).is_ok());
    }

    #[test]
    fn task_logging_is_restricted_to_assigned_employee() {
        let target = goal(1, 2);
        assert!(authorize_on_goal(&session(1, Role::Employee), GoalAction::LogTask, &target).is_ok());

        let err = authorize_on_goal(&session(3, Role::Employee), GoalAction::LogTask, &target)
            .unwrap_err();
        assert!(matches!(err, PolicyViolation::NotGoalEmployee { .. }));

        // The owning manager is not the assigned employee either.
        let err =
            authorize_on_goal(&session(2, Role::Manager), GoalAction::LogTask, &target).unwrap_err();
        assert!(matches!(err, PolicyViolation::NotGoalEmployee { .. }));
    }
}
