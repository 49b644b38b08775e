use perftrack_core::db::open_db_in_memory;
use perftrack_core::{
    AuthService, GoalService, GoalStatus, ReportService, Role, ServiceResult, Session,
    SqliteGoalRepository, SqliteReportRepository, SqliteUserRepository,
};
use rusqlite::Connection;
use std::collections::HashMap;

fn register(conn: &Connection, username: &str, role: Role) -> Session {
    let auth = AuthService::new(SqliteUserRepository::new(conn));
    let user_id = auth.register(username, "pw", role).unwrap();
    Session {
        user_id,
        username: username.to_string(),
        role,
    }
}

fn create_goal(
    conn: &mut Connection,
    manager: &Session,
    employee: &Session,
    description: &str,
    due_date: &str,
) -> ServiceResult<i64> {
    let service = GoalService::new(SqliteGoalRepository::new(conn));
    service.create_goal(manager, employee.user_id, description, due_date)
}

#[test]
fn goals_are_counted_per_status() {
    let mut conn = open_db_in_memory().unwrap();
    let employee = register(&conn, "emma", Role::Employee);
    let manager = register(&conn, "mark", Role::Manager);

    {
        let service = GoalService::new(SqliteGoalRepository::new(&mut conn));
        let first = service
            .create_goal(&manager, employee.user_id, "first", "2026-01-10")
            .unwrap();
        service
            .create_goal(&manager, employee.user_id, "second", "2026-02-10")
            .unwrap();
        service
            .create_goal(&manager, employee.user_id, "third", "2026-03-10")
            .unwrap();
        service
            .update_goal_status(&manager, first, GoalStatus::Completed)
            .unwrap();
    }

    let reports = ReportService::new(SqliteReportRepository::new(&conn));
    let counts: HashMap<_, _> = reports
        .count_goals_by_status()
        .unwrap()
        .into_iter()
        .map(|entry| (entry.status, entry.count))
        .collect();

    assert_eq!(counts.get(&GoalStatus::Draft), Some(&2));
    assert_eq!(counts.get(&GoalStatus::Completed), Some(&1));
    assert_eq!(counts.get(&GoalStatus::Cancelled), None);
}

#[test]
fn average_goals_per_employee_is_the_mean_of_per_employee_counts() {
    let mut conn = open_db_in_memory().unwrap();
    let manager = register(&conn, "mark", Role::Manager);
    let anna = register(&conn, "anna", Role::Employee);
    let ben = register(&conn, "ben", Role::Employee);
    let cara = register(&conn, "cara", Role::Employee);

    for (employee, goal_count) in [(&anna, 2), (&ben, 4), (&cara, 6)] {
        for index in 0..goal_count {
            create_goal(
                &mut conn,
                &manager,
                employee,
                &format!("{} goal {index}", employee.username),
                "2026-06-30",
            )
            .unwrap();
        }
    }

    let reports = ReportService::new(SqliteReportRepository::new(&conn));
    let average = reports.average_goals_per_employee().unwrap().unwrap();
    assert!((average - 4.0).abs() < f64::EPSILON);
}

#[test]
fn insights_over_empty_data_are_absent() {
    let conn = open_db_in_memory().unwrap();
    let reports = ReportService::new(SqliteReportRepository::new(&conn));

    assert!(reports.count_goals_by_status().unwrap().is_empty());
    assert!(reports.average_goals_per_employee().unwrap().is_none());
    assert!(reports.goal_with_latest_due_date().unwrap().is_none());
    assert!(reports.goal_with_earliest_due_date().unwrap().is_none());
    assert!(reports.goal_with_most_tasks().unwrap().is_none());
}

#[test]
fn due_date_extremes_pick_the_right_goals() {
    let mut conn = open_db_in_memory().unwrap();
    let employee = register(&conn, "emma", Role::Employee);
    let manager = register(&conn, "mark", Role::Manager);

    create_goal(&mut conn, &manager, &employee, "mid-year audit", "2026-06-15").unwrap();
    create_goal(&mut conn, &manager, &employee, "kickoff deck", "2026-01-05").unwrap();
    create_goal(&mut conn, &manager, &employee, "year-end review", "2026-12-20").unwrap();

    let reports = ReportService::new(SqliteReportRepository::new(&conn));

    let latest = reports.goal_with_latest_due_date().unwrap().unwrap();
    assert_eq!(latest.description, "year-end review");
    assert_eq!(latest.due_date, "2026-12-20");

    let earliest = reports.goal_with_earliest_due_date().unwrap().unwrap();
    assert_eq!(earliest.description, "kickoff deck");
    assert_eq!(earliest.due_date, "2026-01-05");
}

#[test]
fn goal_with_most_tasks_ignores_taskless_goals() {
    let mut conn = open_db_in_memory().unwrap();
    let employee = register(&conn, "emma", Role::Employee);
    let manager = register(&conn, "mark", Role::Manager);

    {
        let service = GoalService::new(SqliteGoalRepository::new(&mut conn));
        let goal_a = service
            .create_goal(&manager, employee.user_id, "goal a", "2026-05-01")
            .unwrap();
        let goal_b = service
            .create_goal(&manager, employee.user_id, "goal b", "2026-05-02")
            .unwrap();
        service
            .create_goal(&manager, employee.user_id, "goal c", "2026-05-03")
            .unwrap();

        for step in ["one", "two", "three"] {
            service.log_task(&employee, goal_a, step).unwrap();
        }
        service.log_task(&employee, goal_b, "only step").unwrap();
    }

    let reports = ReportService::new(SqliteReportRepository::new(&conn));
    let leader = reports.goal_with_most_tasks().unwrap().unwrap();
    assert_eq!(leader.description, "goal a");
    assert_eq!(leader.task_count, 3);
}

#[test]
fn performance_history_joins_feedback_and_respects_role() {
    let mut conn = open_db_in_memory().unwrap();
    let employee = register(&conn, "emma", Role::Employee);
    let manager = register(&conn, "mark", Role::Manager);
    let other_manager = register(&conn, "mona", Role::Manager);

    {
        let service = GoalService::new(SqliteGoalRepository::new(&mut conn));
        let reviewed = service
            .create_goal(&manager, employee.user_id, "reviewed goal", "2026-04-01")
            .unwrap();
        service
            .create_goal(&manager, employee.user_id, "silent goal", "2026-04-02")
            .unwrap();
        service
            .submit_feedback(&manager, reviewed, "solid delivery")
            .unwrap();
    }

    let reports = ReportService::new(SqliteReportRepository::new(&conn));

    let employee_view = reports.performance_history(&employee).unwrap();
    assert_eq!(employee_view.len(), 2);
    assert!(employee_view.iter().all(|record| record.employee_name.is_none()));
    let reviewed = employee_view
        .iter()
        .find(|record| record.description == "reviewed goal")
        .unwrap();
    assert_eq!(reviewed.feedback.as_deref(), Some("solid delivery"));
    let silent = employee_view
        .iter()
        .find(|record| record.description == "silent goal")
        .unwrap();
    assert!(silent.feedback.is_none());

    let manager_view = reports.performance_history(&manager).unwrap();
    assert_eq!(manager_view.len(), 2);
    assert!(manager_view
        .iter()
        .all(|record| record.employee_name.as_deref() == Some("emma")));

    assert!(reports.performance_history(&other_manager).unwrap().is_empty());
}
