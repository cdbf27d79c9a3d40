use insight_core::{
    parse_capture_natural, parse_capture_natural_with_config, CaptureConfig, CaptureService,
    ConfigError,
};

// 2024-01-01T10:00:00Z.
const NOW: i64 = 1_704_103_200_000;
const HOUR: i64 = 60 * 60 * 1000;

#[test]
fn default_config_is_utc() {
    let text = "Meeting at 2pm";
    assert_eq!(
        parse_capture_natural(text, NOW),
        parse_capture_natural_with_config(text, NOW, &CaptureConfig::default())
    );
}

#[test]
fn negative_offset_moves_local_day() {
    // UTC-05:00: local time is 05:00 on the same day.
    let config = CaptureConfig::with_utc_offset_minutes(-300);
    let result = parse_capture_natural_with_config("Meeting at 2pm", NOW, &config);

    assert_eq!(result.events.len(), 1);
    // 14:00 local == 19:00 UTC.
    assert_eq!(result.events[0].start_at, 1_704_067_200_000 + 19 * HOUR);
}

#[test]
fn offset_near_midnight_changes_tomorrow() {
    // UTC+14:00: local time is already 00:00 on Jan 2.
    let config = CaptureConfig::with_utc_offset_minutes(14 * 60);
    let result = parse_capture_natural_with_config("I need to call John tomorrow", NOW, &config);

    assert_eq!(result.tasks.len(), 1);
    let local_jan_2 = 1_704_067_200_000 + 24 * HOUR - 14 * HOUR;
    assert_eq!(
        result.tasks[0].scheduled_at,
        Some(local_jan_2 + 24 * HOUR + 9 * HOUR)
    );
}

#[test]
fn service_builds_from_json() {
    let service = CaptureService::from_json(r#"{"utcOffsetMinutes": 120}"#).unwrap();
    assert_eq!(service.config().utc_offset_minutes, 120);

    let error = CaptureService::from_json(r#"{"utcOffsetMinutes": -1000}"#).unwrap_err();
    assert!(matches!(error, ConfigError::UtcOffsetOutOfRange(-1000)));
    assert!(std::error::Error::source(&error).is_none());

    let error = CaptureService::from_json("42").unwrap_err();
    assert!(matches!(error, ConfigError::Parse(_)));
    assert!(std::error::Error::source(&error).is_some());
}
