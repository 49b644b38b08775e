//! Goal aggregate repository: goals plus their tasks and feedback.
//!
//! # Responsibility
//! - Provide persistence APIs for the goal aggregate root.
//! - Own the cascading goal deletion with atomic semantics.
//!
//! # Invariants
//! - Write paths validate free-text fields and the due-date format before
//!   SQL mutations.
//! - `delete_goal` removes tasks, feedback and the goal row in a single
//!   transaction; a partial cascade never commits.
//! - New goals start at status `Draft`; new tasks start unapproved.

use crate::model::goal::{
    validate_due_date, validate_feedback_text, validate_goal_description,
    validate_task_description, Feedback, FeedbackId, Goal, GoalId, GoalStatus, Task, TaskId,
};
use crate::model::user::{Role, UserId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const GOAL_SELECT_SQL: &str = "SELECT
    goal_id,
    employee_id,
    manager_id,
    goal_description,
    due_date,
    status
FROM goals";

const TASK_SELECT_SQL: &str = "SELECT task_id, goal_id, task_description, is_approved FROM tasks";

/// Feedback row joined back to the goal it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalFeedback {
    pub goal_id: GoalId,
    pub text: String,
}

/// Repository interface for the goal aggregate.
pub trait GoalRepository {
    fn create_goal(
        &self,
        employee_id: UserId,
        manager_id: UserId,
        description: &str,
        due_date: &str,
    ) -> RepoResult<GoalId>;
    fn get_goal(&self, goal_id: GoalId) -> RepoResult<Option<Goal>>;
    /// Lists goals assigned to an employee. Order is unspecified.
    fn list_goals_for_employee(&self, employee_id: UserId) -> RepoResult<Vec<Goal>>;
    /// Lists goals owned by a manager. Order is unspecified.
    fn list_goals_for_manager(&self, manager_id: UserId) -> RepoResult<Vec<Goal>>;
    fn update_goal_status(&self, goal_id: GoalId, status: GoalStatus) -> RepoResult<()>;
    /// Deletes a goal with its tasks and feedback as one atomic unit.
    fn delete_goal(&mut self, goal_id: GoalId) -> RepoResult<()>;
    fn log_task(&self, goal_id: GoalId, description: &str) -> RepoResult<TaskId>;
    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<Task>>;
    fn approve_task(&self, task_id: TaskId) -> RepoResult<()>;
    fn submit_feedback(&self, goal_id: GoalId, text: &str) -> RepoResult<FeedbackId>;
    fn list_feedback_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<Feedback>>;
    /// Feedback on goals where the user is the employee or the manager,
    /// depending on role.
    fn list_feedback_visible_to(&self, user_id: UserId, role: Role) -> RepoResult<Vec<GoalFeedback>>;
}

/// SQLite-backed goal aggregate repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// The connection is borrowed mutably because cascading deletion runs
    /// inside a transaction.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(
        &self,
        employee_id: UserId,
        manager_id: UserId,
        description: &str,
        due_date: &str,
    ) -> RepoResult<GoalId> {
        validate_goal_description(description)?;
        validate_due_date(due_date)?;

        self.conn.execute(
            "INSERT INTO goals (employee_id, manager_id, goal_description, due_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![employee_id, manager_id, description, due_date],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_goal(&self, goal_id: GoalId) -> RepoResult<Option<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} WHERE goal_id = ?1;"))?;

        let mut rows = stmt.query([goal_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_goal_row(row)?));
        }

        Ok(None)
    }

    fn list_goals_for_employee(&self, employee_id: UserId) -> RepoResult<Vec<Goal>> {
        list_goals_where(self.conn, "employee_id", employee_id)
    }

    fn list_goals_for_manager(&self, manager_id: UserId) -> RepoResult<Vec<Goal>> {
        list_goals_where(self.conn, "manager_id", manager_id)
    }

    fn update_goal_status(&self, goal_id: GoalId, status: GoalStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE goals SET status = ?1 WHERE goal_id = ?2;",
            params![goal_status_to_db(status), goal_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "goal",
                id: goal_id,
            });
        }

        Ok(())
    }

    fn delete_goal(&mut self, goal_id: GoalId) -> RepoResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM tasks WHERE goal_id = ?1;", [goal_id])?;
        tx.execute("DELETE FROM feedback WHERE goal_id = ?1;", [goal_id])?;
        let changed = tx.execute("DELETE FROM goals WHERE goal_id = ?1;", [goal_id])?;

        if changed == 0 {
            // Dropping the transaction rolls the attachment deletes back.
            return Err(RepoError::NotFound {
                entity: "goal",
                id: goal_id,
            });
        }

        tx.commit()?;
        Ok(())
    }

    fn log_task(&self, goal_id: GoalId, description: &str) -> RepoResult<TaskId> {
        validate_task_description(description)?;

        self.conn.execute(
            "INSERT INTO tasks (goal_id, task_description) VALUES (?1, ?2);",
            params![goal_id, description],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE task_id = ?1;"))?;

        let mut rows = stmt.query([task_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE goal_id = ?1;"))?;

        let mut rows = stmt.query([goal_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn approve_task(&self, task_id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET is_approved = 1 WHERE task_id = ?1;",
            [task_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id: task_id,
            });
        }

        Ok(())
    }

    fn submit_feedback(&self, goal_id: GoalId, text: &str) -> RepoResult<FeedbackId> {
        validate_feedback_text(text)?;

        self.conn.execute(
            "INSERT INTO feedback (goal_id, feedback_text) VALUES (?1, ?2);",
            params![goal_id, text],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_feedback_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<Feedback>> {
        let mut stmt = self.conn.prepare(
            "SELECT feedback_id, goal_id, feedback_text
             FROM feedback
             WHERE goal_id = ?1;",
        )?;

        let mut rows = stmt.query([goal_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(Feedback {
                feedback_id: row.get("feedback_id")?,
                goal_id: row.get("goal_id")?,
                text: row.get("feedback_text")?,
            });
        }

        Ok(entries)
    }

    fn list_feedback_visible_to(
        &self,
        user_id: UserId,
        role: Role,
    ) -> RepoResult<Vec<GoalFeedback>> {
        let owner_column = if role.is_manager() {
            "manager_id"
        } else {
            "employee_id"
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT g.goal_id, f.feedback_text
             FROM feedback f
             INNER JOIN goals g ON f.goal_id = g.goal_id
             WHERE g.{owner_column} = ?1;"
        ))?;

        let mut rows = stmt.query([user_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(GoalFeedback {
                goal_id: row.get("goal_id")?,
                text: row.get("feedback_text")?,
            });
        }

        Ok(entries)
    }
}

fn list_goals_where(conn: &Connection, column: &str, user_id: UserId) -> RepoResult<Vec<Goal>> {
    let mut stmt = conn.prepare(&format!("{GOAL_SELECT_SQL} WHERE {column} = ?1;"))?;

    let mut rows = stmt.query([user_id])?;
    let mut goals = Vec::new();
    while let Some(row) = rows.next()? {
        goals.push(parse_goal_row(row)?);
    }

    Ok(goals)
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let status_text: String = row.get("status")?;
    let status = parse_goal_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid goal status `{status_text}` in goals.status"))
    })?;

    Ok(Goal {
        goal_id: row.get("goal_id")?,
        employee_id: row.get("employee_id")?,
        manager_id: row.get("manager_id")?,
        description: row.get("goal_description")?,
        due_date: row.get("due_date")?,
        status,
    })
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let approved = match row.get::<_, i64>("is_approved")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_approved value `{other}` in tasks.is_approved"
            )));
        }
    };

    Ok(Task {
        task_id: row.get("task_id")?,
        goal_id: row.get("goal_id")?,
        description: row.get("task_description")?,
        approved,
    })
}

/// Stable storage strings for goal status, kept compatible with the
/// original schema (`In Progress` carries a space).
pub fn goal_status_to_db(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Draft => "Draft",
        GoalStatus::InProgress => "In Progress",
        GoalStatus::Completed => "Completed",
        GoalStatus::Cancelled => "Cancelled",
    }
}

pub fn parse_goal_status(value: &str) -> Option<GoalStatus> {
    match value {
        "Draft" => Some(GoalStatus::Draft),
        "In Progress" => Some(GoalStatus::InProgress),
        "Completed" => Some(GoalStatus::Completed),
        "Cancelled" => Some(GoalStatus::Cancelled),
        _ => None,
    }
}
