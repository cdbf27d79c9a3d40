use insight_core::{
    CaptureValidationError, EventKind, ParseNaturalResult, ParsedEvent, ParsedTask, TaskScope,
    TaskStatus,
};
use serde_json::json;

#[test]
fn task_serializes_with_camel_case_keys() {
    let task = ParsedTask {
        status: Some(TaskStatus::InProgress),
        estimate_minutes: Some(15),
        scheduled_at: Some(1_000),
        scope: Some(TaskScope::Global),
        ..ParsedTask::todo("call John")
    };

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["title"], "call John");
    assert_eq!(value["status"], "in_progress");
    assert_eq!(value["estimateMinutes"], 15);
    assert_eq!(value["scheduledAt"], 1_000);
    assert_eq!(value["scope"], "global");
    assert!(value.get("tags").is_none());
    assert!(value.get("importance").is_none());
}

#[test]
fn event_omits_empty_optional_fields() {
    let event = ParsedEvent::new("mood: 7/10", 0, 300_000, EventKind::Log, "feeling good");

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["kind"], "log");
    assert_eq!(value["explicitTime"], false);
    assert_eq!(value["sourceText"], "feeling good");
    assert!(value.get("openEnded").is_none());
    assert!(value.get("notes").is_none());
    assert!(value.get("people").is_none());
}

#[test]
fn event_deserialization_enforces_window() {
    let valid = json!({ "title": "Call", "startAt": 1_000, "endAt": 2_000 });
    let event: ParsedEvent = serde_json::from_value(valid).unwrap();
    assert_eq!(event.kind, EventKind::Event);
    assert_eq!(event.duration_minutes(), 0);

    let reversed = json!({ "title": "Call", "startAt": 2_000, "endAt": 1_000 });
    let error = serde_json::from_value::<ParsedEvent>(reversed).unwrap_err();
    assert!(error.to_string().contains("endAt (1000) must be >= startAt (2000)"));
}

#[test]
fn validation_reports_first_violation() {
    let result = ParseNaturalResult {
        tasks: vec![ParsedTask::todo("")],
        events: Vec::new(),
    };
    assert_eq!(result.validate(), Err(CaptureValidationError::EmptyTitle));
    assert!(ParseNaturalResult::default().validate().is_ok());
}
