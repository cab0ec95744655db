use super::*;

#[test]
fn resume_token_round_trips_through_json() {
    let token = ResumeToken::new("kimi", "abc123");
    let json = serde_json::to_string(&token).expect("serialize");
    let back: ResumeToken = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(token, back);
}

#[test]
fn action_builder_attaches_detail() {
    let action = Action::new("tc_1", ActionKind::Command, "ls")
        .with_detail("result_len", serde_json::json!(12));
    assert_eq!(action.detail.get("result_len"), Some(&serde_json::json!(12)));
}

#[test]
fn event_tag_round_trips() {
    let event = Event::Started {
        engine: "kimi".into(),
        resume: ResumeToken::new("kimi", "s1"),
        title: None,
        meta: None,
    };
    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json["type"], "started");
    let back: Event = serde_json::from_value(json).expect("deserialize");
    assert_eq!(event, back);
}

#[test]
fn engine_accessor_covers_every_variant() {
    let completed = Event::Completed {
        engine: "claude".into(),
        ok: true,
        answer: "done".into(),
        resume: None,
        error: None,
        usage: None,
    };
    assert_eq!(completed.engine(), "claude");
    assert!(completed.is_completed());
    assert!(!completed.is_started());
}

#[test]
fn file_change_kind_serializes_snake_case() {
    let change = FileChange {
        path: "notes.md".into(),
        kind: FileChangeKind::Update,
    };
    let json = serde_json::to_value(&change).expect("serialize");
    assert_eq!(json["kind"], "update");
}

#[test]
fn urgency_orders_low_to_critical() {
    assert!(Urgency::Low < Urgency::Normal);
    assert!(Urgency::Normal < Urgency::High);
    assert!(Urgency::High < Urgency::Critical);
}
