use perftrack_core::model::goal::{
    validate_due_date, validate_feedback_text, validate_goal_description,
    validate_task_description,
};
use perftrack_core::model::user::validate_username;
use perftrack_core::repo::goal_repo::{goal_status_to_db, parse_goal_status};
use perftrack_core::{Goal, GoalStatus, Role, Session, User, ValidationError};

#[test]
fn free_text_fields_reject_blank_values() {
    assert_eq!(validate_username(""), Err(ValidationError::EmptyUsername));
    assert_eq!(validate_username("   "), Err(ValidationError::EmptyUsername));
    assert!(validate_username("alice").is_ok());

    assert_eq!(
        validate_goal_description("\t\n"),
        Err(ValidationError::EmptyGoalDescription)
    );
    assert_eq!(
        validate_task_description(""),
        Err(ValidationError::EmptyTaskDescription)
    );
    assert_eq!(
        validate_feedback_text(" "),
        Err(ValidationError::EmptyFeedbackText)
    );
}

#[test]
fn due_dates_must_be_iso_calendar_dates() {
    assert!(validate_due_date("2026-09-30").is_ok());
    assert!(validate_due_date("1999-01-01").is_ok());

    for bad in ["2026/09/30", "30-09-2026", "2026-9-3", "next friday", ""] {
        assert_eq!(
            validate_due_date(bad),
            Err(ValidationError::InvalidDueDate(bad.to_string())),
            "expected `{bad}` to be rejected"
        );
    }
}

#[test]
fn goal_status_storage_strings_roundtrip() {
    for status in [
        GoalStatus::Draft,
        GoalStatus::InProgress,
        GoalStatus::Completed,
        GoalStatus::Cancelled,
    ] {
        assert_eq!(parse_goal_status(goal_status_to_db(status)), Some(status));
    }

    // Compatibility with the pre-existing schema: the in-progress value
    // carries a space.
    assert_eq!(goal_status_to_db(GoalStatus::InProgress), "In Progress");
    assert_eq!(parse_goal_status("in_progress"), None);
    assert_eq!(parse_goal_status("Unknown"), None);
}

#[test]
fn goal_serialization_uses_expected_wire_fields() {
    let goal = Goal {
        goal_id: 12,
        employee_id: 3,
        manager_id: 4,
        description: "ship the migration".to_string(),
        due_date: "2026-11-30".to_string(),
        status: GoalStatus::InProgress,
    };

    let json = serde_json::to_value(&goal).unwrap();
    assert_eq!(json["goal_id"], 12);
    assert_eq!(json["employee_id"], 3);
    assert_eq!(json["manager_id"], 4);
    assert_eq!(json["description"], "ship the migration");
    assert_eq!(json["due_date"], "2026-11-30");
    assert_eq!(json["status"], "in_progress");

    let decoded: Goal = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, goal);
}

#[test]
fn session_mirrors_the_user_record() {
    let user = User {
        user_id: 42,
        username: "mark".to_string(),
        role: Role::Manager,
    };

    let session = Session::for_user(&user);
    assert_eq!(session.user_id, 42);
    assert_eq!(session.username, "mark");
    assert!(session.role.is_manager());
}
