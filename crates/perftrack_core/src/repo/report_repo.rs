//! Reporting repository: aggregate insight queries and performance history.
//!
//! # Responsibility
//! - Run the read-only aggregate queries behind the insights use-cases.
//! - Build the role-dependent performance history projection.
//!
//! # Invariants
//! - Every query is independent and stateless; no results are cached.
//! - `goal_with_most_tasks` uses inner-join semantics: zero-task goals
//!   never appear.
//! - `performance_history` uses a left outer join: goals without feedback
//!   appear with an absent feedback field.

use crate::model::goal::GoalStatus;
use crate::model::user::{Role, UserId};
use crate::repo::goal_repo::parse_goal_status;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, Row};

/// Number of goals currently in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: GoalStatus,
    pub count: u64,
}

/// Goal singled out by its due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateHighlight {
    pub description: String,
    pub due_date: String,
}

/// Goal with the highest number of logged tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLeader {
    pub description: String,
    pub task_count: u64,
}

/// One row of the performance history projection.
///
/// `employee_name` is populated for the manager view only; `feedback` is
/// absent for goals that received none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceRecord {
    pub employee_name: Option<String>,
    pub description: String,
    pub due_date: String,
    pub status: GoalStatus,
    pub feedback: Option<String>,
}

/// Repository interface for reporting and insights.
pub trait ReportRepository {
    fn count_goals_by_status(&self) -> RepoResult<Vec<StatusCount>>;
    /// Mean of per-employee goal counts; `None` when no goals exist.
    fn average_goals_per_employee(&self) -> RepoResult<Option<f64>>;
    fn goal_with_latest_due_date(&self) -> RepoResult<Option<DueDateHighlight>>;
    fn goal_with_earliest_due_date(&self) -> RepoResult<Option<DueDateHighlight>>;
    fn goal_with_most_tasks(&self) -> RepoResult<Option<TaskLeader>>;
    fn performance_history(&self, user_id: UserId, role: Role)
        -> RepoResult<Vec<PerformanceRecord>>;
}

/// SQLite-backed reporting repository.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn count_goals_by_status(&self) -> RepoResult<Vec<StatusCount>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM goals GROUP BY status;")?;

        let mut rows = stmt.query([])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            let status_text: String = row.get(0)?;
            let status = parse_goal_status(&status_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid goal status `{status_text}` in goals.status"
                ))
            })?;
            counts.push(StatusCount {
                status,
                count: row.get(1)?,
            });
        }

        Ok(counts)
    }

    fn average_goals_per_employee(&self) -> RepoResult<Option<f64>> {
        let average: Option<f64> = self.conn.query_row(
            "SELECT AVG(goal_count)
             FROM (SELECT COUNT(*) AS goal_count FROM goals GROUP BY employee_id);",
            [],
            |row| row.get(0),
        )?;
        Ok(average)
    }

    fn goal_with_latest_due_date(&self) -> RepoResult<Option<DueDateHighlight>> {
        due_date_highlight(self.conn, "DESC")
    }

    fn goal_with_earliest_due_date(&self) -> RepoResult<Option<DueDateHighlight>> {
        due_date_highlight(self.conn, "ASC")
    }

    fn goal_with_most_tasks(&self) -> RepoResult<Option<TaskLeader>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.goal_description, COUNT(t.task_id) AS task_count
             FROM goals g
             INNER JOIN tasks t ON g.goal_id = t.goal_id
             GROUP BY g.goal_id
             ORDER BY task_count DESC
             LIMIT 1;",
        )?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(TaskLeader {
                description: row.get(0)?,
                task_count: row.get(1)?,
            }));
        }

        Ok(None)
    }

    fn performance_history(
        &self,
        user_id: UserId,
        role: Role,
    ) -> RepoResult<Vec<PerformanceRecord>> {
        if role.is_manager() {
            let mut stmt = self.conn.prepare(
                "SELECT u.username, g.goal_description, g.due_date, g.status, f.feedback_text
                 FROM goals g
                 INNER JOIN users u ON g.employee_id = u.user_id
                 LEFT JOIN feedback f ON g.goal_id = f.goal_id
                 WHERE g.manager_id = ?1;",
            )?;
            let mut rows = stmt.query([user_id])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(parse_history_row(row, true)?);
            }
            return Ok(records);
        }

        let mut stmt = self.conn.prepare(
            "SELECT g.goal_description, g.due_date, g.status, f.feedback_text
             FROM goals g
             LEFT JOIN feedback f ON g.goal_id = f.goal_id
             WHERE g.employee_id = ?1;",
        )?;
        let mut rows = stmt.query([user_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_history_row(row, false)?);
        }
        Ok(records)
    }
}

fn due_date_highlight(conn: &Connection, order: &str) -> RepoResult<Option<DueDateHighlight>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT goal_description, due_date FROM goals ORDER BY due_date {order} LIMIT 1;"
    ))?;

    let mut rows = stmt.query([])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(DueDateHighlight {
            description: row.get(0)?,
            due_date: row.get(1)?,
        }));
    }

    Ok(None)
}

fn parse_history_row(row: &Row<'_>, with_employee_name: bool) -> RepoResult<PerformanceRecord> {
    // Manager rows lead with the employee username; employee rows omit it.
    let offset = usize::from(with_employee_name);

    let status_text: String = row.get(2 + offset)?;
    let status = parse_goal_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid goal status `{status_text}` in goals.status"))
    })?;

    Ok(PerformanceRecord {
        employee_name: if with_employee_name {
            Some(row.get(0)?)
        } else {
            None
        },
        description: row.get(offset)?,
        due_date: row.get(1 + offset)?,
        status,
        feedback: row.get(3 + offset)?,
    })
}
