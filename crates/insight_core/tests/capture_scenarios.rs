use insight_core::{
    parse_capture_natural, parse_capture_natural_with_config, parse_capture_with_blocks,
    CaptureConfig, EventKind, TaskScope, TaskStatus, TrackerToken, MAX_NOW_MS, MIN_NOW_MS,
};

// 2024-01-01T10:00:00Z, a Monday.
const NOW: i64 = 1_704_103_200_000;
const TODAY: i64 = 1_704_067_200_000;
const MINUTE: i64 = 60 * 1000;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

#[test]
fn explicit_clock_time_becomes_event() {
    let result = parse_capture_natural("Meeting at 2pm", NOW);

    assert!(result.tasks.is_empty());
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Meeting");
    assert_eq!(event.start_at, TODAY + 14 * HOUR);
    assert_eq!(event.end_at, TODAY + 14 * HOUR + 30 * MINUTE);
    assert_eq!(event.kind, EventKind::Event);
    assert!(event.explicit_time);
    assert_eq!(event.source_text, "Meeting at 2pm");
}

#[test]
fn obligation_for_tomorrow_becomes_global_task() {
    let result = parse_capture_natural("I need to call John tomorrow", NOW);

    assert!(result.events.is_empty());
    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.title, "call John tomorrow");
    assert_eq!(task.status, Some(TaskStatus::Todo));
    assert_eq!(task.scope, Some(TaskScope::Global));
    assert_eq!(task.scheduled_at, Some(TODAY + DAY + 9 * HOUR));
    assert_eq!(task.due_at, Some(TODAY + 2 * DAY - 1));
}

#[test]
fn mood_statement_becomes_log_event() {
    let result = parse_capture_natural("Feeling pretty good today", NOW);

    assert!(result.tasks.is_empty());
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "mood: 7/10");
    assert_eq!(event.kind, EventKind::Log);
    assert_eq!(event.tags, vec!["#mood"]);
    assert_eq!(event.start_at, NOW);
    assert_eq!(event.end_at, NOW + 5 * MINUTE);
    assert!(!event.explicit_time);
}

#[test]
fn tracker_tokens_are_block_scoped_and_not_tags() {
    let result = parse_capture_with_blocks("#energy(8) #mood:6", NOW);

    assert_eq!(result.blocks.len(), 1);
    let block = &result.blocks[0];
    assert_eq!(
        block.trackers,
        vec![
            TrackerToken {
                key: "energy".to_string(),
                value: 8.0
            },
            TrackerToken {
                key: "mood".to_string(),
                value: 6.0
            },
        ]
    );
    assert!(block.tags.is_empty());
    assert!(block.events.is_empty());
}

#[test]
fn purchase_list_becomes_grocery_event_and_done_task() {
    let result = parse_capture_natural("Bought apples, bananas, and pears", NOW);

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Grocery run");
    assert_eq!(event.notes.as_deref(), Some("- apples\n- bananas\n- pears"));
    assert_eq!(event.tags, vec!["#shopping"]);
    assert_eq!(event.start_at, NOW);

    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.title, "Buy groceries");
    assert_eq!(task.status, Some(TaskStatus::Done));
    assert_eq!(
        task.notes.as_deref(),
        Some("- [x] apples\n- [x] bananas\n- [x] pears")
    );
}

#[test]
fn until_clause_continues_from_previous_short_interval() {
    let result = parse_capture_natural("Call Mom at 3, then stop by the store until 4:30", NOW);

    assert!(result.tasks.is_empty());
    assert_eq!(result.events.len(), 2);

    let call = &result.events[0];
    assert_eq!(call.title, "Call");
    assert_eq!(call.start_at, TODAY + 15 * HOUR);
    assert_eq!(call.end_at, TODAY + 15 * HOUR + 15 * MINUTE);

    let errand = &result.events[1];
    assert_eq!(errand.title, "stop by the store");
    assert_eq!(errand.start_at, TODAY + 15 * HOUR);
    assert_eq!(errand.end_at, TODAY + 16 * HOUR + 30 * MINUTE);
    assert!(errand.explicit_time);
}

#[test]
fn task_request_reschedules_previous_task() {
    let result = parse_capture_natural("Call the dentist. make that a task at 5", NOW);

    assert!(result.events.is_empty());
    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.title, "Call the dentist");
    assert_eq!(task.scheduled_at, Some(TODAY + 17 * HOUR));
    assert_eq!(task.due_at, Some(TODAY + 17 * HOUR + 30 * MINUTE));
}

#[test]
fn past_event_on_previous_day_defaults_to_noon() {
    let result = parse_capture_natural("went for a run yesterday", NOW);

    assert!(result.tasks.is_empty());
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.start_at, TODAY - DAY + 12 * HOUR);
    assert!(!event.open_ended);
}

#[test]
fn bodyweight_sets_emit_workout_and_rpe_logs() {
    let result = parse_capture_natural("20 pushups rpe 8", NOW);

    let titles: Vec<&str> = result.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["workout: 20 pushups", "rpe: 8"]);
    assert!(result.events.iter().all(|e| e.kind == EventKind::Log));
}

#[test]
fn duration_segments_build_a_timeline() {
    let result = parse_capture_natural("Worked 4 hours inpatient and 4 hours clinic", NOW);

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Work");
    assert_eq!(event.start_at, NOW);
    assert_eq!(event.end_at, NOW + 8 * HOUR);
    assert_eq!(
        event.notes.as_deref(),
        Some("**10:00** - inpatient\n**14:00** - clinic")
    );
}

#[test]
fn filler_only_input_yields_nothing() {
    for text in ["", "   ", "um", "ok so um", "uh, ok"] {
        let result = parse_capture_natural(text, NOW);
        assert!(result.is_empty(), "expected nothing for {text:?}: {result:?}");
    }
}

#[test]
fn parsing_is_deterministic() {
    let text = "Meeting at 2pm. I need to call John tomorrow\n---\nBought eggs and milk #errands";
    assert_eq!(
        parse_capture_natural(text, NOW),
        parse_capture_natural(text, NOW)
    );
    assert_eq!(
        parse_capture_with_blocks(text, NOW),
        parse_capture_with_blocks(text, NOW)
    );
}

#[test]
fn every_event_keeps_a_valid_window() {
    let inputs = [
        "work 8-5",
        "shift from 11 to 2",
        "dinner at 7 then movie until 6",
        "gym in 90 minutes",
        "study in 1.5 hours for 2 hours",
        "nap at 11:30pm",
        "worked 9-5 at the clinic",
    ];
    for text in inputs {
        let result = parse_capture_natural(text, NOW);
        assert!(result.validate().is_ok(), "invalid output for {text:?}: {result:?}");
        for event in &result.events {
            assert!(event.end_at >= event.start_at, "{text:?}: {event:?}");
        }
    }
}

#[test]
fn oversized_input_is_capped() {
    let text = "walk the dog at 5. buy milk. ".repeat(400);
    assert!(text.len() > 10_000);

    let result = parse_capture_natural(&text, NOW);
    assert!(result.tasks.len() <= 16);
    assert!(result.events.len() <= 32);
    assert!(!result.is_empty());

    let blocks = parse_capture_with_blocks(&format!("{text}\n---\n{text}\n---\n{text}"), NOW);
    assert_eq!(blocks.blocks.len(), 3);
    assert!(blocks.tasks.len() <= 32);
    assert!(blocks.events.len() <= 64);
}

#[test]
fn dividers_force_separate_blocks() {
    let split = parse_capture_with_blocks("Meeting at 2pm\n---\nLunch at 1pm", NOW);
    let whole = parse_capture_with_blocks("Meeting at 2pm\n\nLunch at 1pm", NOW);

    assert_eq!(split.blocks.len(), 2);
    assert_eq!(whole.blocks.len(), 1);
    assert_eq!(split.blocks[1].raw_text, "Lunch at 1pm");
    assert_ne!(split.blocks[0].id, split.blocks[1].id);
}

#[test]
fn eating_phrase_becomes_meal_with_item_notes() {
    let result = parse_capture_natural("ate eggs and toast", NOW);

    assert!(result.tasks.is_empty());
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Meal");
    assert_eq!(event.kind, EventKind::Event);
    assert_eq!(event.tags, vec!["#food"]);
    assert_eq!(event.notes.as_deref(), Some("- eggs\n- toast"));
    assert_eq!(event.start_at, NOW);
    assert_eq!(event.end_at, NOW + 30 * MINUTE);
}

#[test]
fn drinking_phrase_becomes_hydration_log() {
    let result = parse_capture_natural("drank a glass of water", NOW);

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "drink: a glass of water");
    assert_eq!(event.kind, EventKind::Log);
    assert_eq!(event.tags, vec!["#hydration"]);
    assert_eq!(event.start_at, NOW);
    assert_eq!(event.end_at, NOW + 5 * MINUTE);
}

#[test]
fn activity_during_another_becomes_episode() {
    let result = parse_capture_natural("listened to a podcast during my commute", NOW);

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.kind, EventKind::Episode);
    assert_eq!(event.parent_hint.as_deref(), Some("commute"));
    assert_eq!(event.title, "listened to a podcast during my commute");
}

#[test]
fn immediate_physical_action_is_open_ended() {
    let result = parse_capture_natural("going for a run now", NOW);

    assert!(result.tasks.is_empty());
    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert!(event.open_ended);
    assert_eq!(event.start_at, NOW);
    assert_eq!(event.end_at, NOW + HOUR);
}

#[test]
fn stale_clock_time_rolls_to_tomorrow() {
    let result = parse_capture_natural("Meeting at 8am", NOW);

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Meeting");
    assert_eq!(event.start_at, TODAY + DAY + 8 * HOUR);
    assert_eq!(event.end_at, TODAY + DAY + 8 * HOUR + 30 * MINUTE);
}

#[test]
fn timed_obligation_emits_task_and_event() {
    let result = parse_capture_natural("I need to call the bank at 3", NOW);

    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.title, "call the bank");
    assert_eq!(task.status, Some(TaskStatus::Todo));
    assert_eq!(task.scope, Some(TaskScope::Inline));
    assert_eq!(task.scheduled_at, Some(TODAY + 15 * HOUR));
    assert_eq!(task.due_at, Some(TODAY + 15 * HOUR + 15 * MINUTE));

    assert_eq!(result.events.len(), 1);
    let event = &result.events[0];
    assert_eq!(event.title, "Call");
    assert_eq!(event.start_at, TODAY + 15 * HOUR);
    assert!(event.explicit_time);
}

#[test]
fn timed_shopping_phrase_adds_grocery_checklist() {
    let result = parse_capture_natural("buy milk and eggs at 5", NOW);

    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.title, "Buy groceries");
    assert_eq!(task.tags, vec!["#shopping"]);
    assert_eq!(task.notes.as_deref(), Some("- [ ] milk\n- [ ] eggs"));
    assert_eq!(task.estimate_minutes, Some(45));
    assert_eq!(task.scheduled_at, Some(TODAY + 17 * HOUR));

    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].title, "buy milk and eggs");
    assert_eq!(result.events[0].start_at, TODAY + 17 * HOUR);
}

#[test]
fn shopping_task_records_budget() {
    let result = parse_capture_natural("buy snacks for $20", NOW);

    assert!(result.events.is_empty());
    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.tags, vec!["#shopping"]);
    assert_eq!(task.notes.as_deref(), Some("- [ ] snacks\nBudget: $20"));
    assert_eq!(task.scheduled_at, None);
}

#[test]
fn chained_clauses_have_clean_titles() {
    let result = parse_capture_natural("meeting at 2, then coffee until 4, then call until 5", NOW);

    let titles: Vec<&str> = result.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["meeting", "coffee", "Call"]);
    let starts: Vec<i64> = result.events.iter().map(|e| e.start_at).collect();
    assert_eq!(
        starts,
        vec![TODAY + 14 * HOUR, TODAY + 14 * HOUR, TODAY + 16 * HOUR]
    );
    assert_eq!(result.events[2].end_at, TODAY + 17 * HOUR);
}

#[test]
fn calendar_dates_anchor_the_day_and_leave_titles() {
    for text in ["dentist on Jan 5 at 3pm", "dentist January 5th at 3pm", "dentist 1/5 at 3pm"] {
        let result = parse_capture_natural(text, NOW);
        assert_eq!(result.events.len(), 1, "{text:?}");
        let event = &result.events[0];
        assert_eq!(event.title, "dentist", "{text:?}");
        assert_eq!(event.start_at, TODAY + 4 * DAY + 15 * HOUR, "{text:?}");
    }
}

#[test]
fn next_week_schedules_a_global_task() {
    let result = parse_capture_natural("Dentist appointment next week", NOW);

    assert!(result.events.is_empty());
    assert_eq!(result.tasks.len(), 1);
    let task = &result.tasks[0];
    assert_eq!(task.scope, Some(TaskScope::Global));
    assert_eq!(task.scheduled_at, Some(TODAY + 7 * DAY + 9 * HOUR));
    assert_eq!(task.due_at, Some(TODAY + 8 * DAY - 1));
}

#[test]
fn unrepresentable_instants_yield_nothing() {
    for now_ms in [i64::MAX, i64::MIN, i64::MAX - 1, MAX_NOW_MS + 1] {
        assert!(parse_capture_natural("walk the dog at 5", now_ms).is_empty());

        let blocks = parse_capture_with_blocks("walk the dog\n---\n#energy(8)", now_ms);
        assert_eq!(blocks.blocks.len(), 2);
        assert!(blocks.tasks.is_empty());
        assert!(blocks.events.is_empty());
        assert_eq!(blocks.blocks[1].trackers.len(), 1);
    }
}

#[test]
fn range_edges_still_parse() {
    let east = CaptureConfig::with_utc_offset_minutes(14 * 60);
    let result = parse_capture_natural_with_config("Meeting at 2pm tomorrow", MAX_NOW_MS, &east);
    assert_eq!(result.events.len(), 1);
    assert!(result.validate().is_ok());

    let west = CaptureConfig::with_utc_offset_minutes(-12 * 60);
    let result = parse_capture_natural_with_config("went for a run yesterday", MIN_NOW_MS, &west);
    assert_eq!(result.events.len(), 1);
    assert!(result.validate().is_ok());
}
