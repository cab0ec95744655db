use super::*;

fn sample_message() -> CoordinationMessage {
    CoordinationMessage {
        message_id: "m1".into(),
        from_liaison: "liaison_a".into(),
        to_liaison: None,
        timestamp_ms: 1_700_000_000_000,
        kind: MessageKind::InfoShare,
        payload: serde_json::json!({"topic": "deploy", "data": {"ok": true}}),
        expires_at_ms: Some(1_700_003_600_000),
    }
}

#[test]
fn message_round_trips_through_value() {
    let message = sample_message();
    let value = message.to_value();
    let back = CoordinationMessage::from_value(value).expect("from_value");
    assert_eq!(message, back);
}

#[test]
fn broadcast_has_no_recipient() {
    let message = sample_message();
    assert!(message.is_broadcast());

    let mut direct = sample_message();
    direct.to_liaison = Some("liaison_b".into());
    assert!(!direct.is_broadcast());
}

#[test]
fn expiry_check_compares_against_now() {
    let message = sample_message();
    assert!(!message.is_expired(1_700_000_000_001));
    assert!(message.is_expired(1_700_003_600_001));
}

#[test]
fn message_without_expiry_never_expires() {
    let mut message = sample_message();
    message.expires_at_ms = None;
    assert!(!message.is_expired(u64::MAX));
}

#[test]
fn active_liaisons_doc_defaults_to_version_one() {
    let doc = ActiveLiaisonsDoc::default();
    assert_eq!(doc.version, 1);
    assert!(doc.liaisons.is_empty());
}

#[test]
fn task_registry_doc_round_trips() {
    let mut doc = TaskRegistryDoc::default();
    doc.tasks.insert(
        "t1".into(),
        TaskRecord {
            claimed_by: "liaison_a".into(),
            claimed_at_ms: 1,
            description: "do the thing".into(),
            status: TaskStatus::InProgress,
            completed_at_ms: None,
            result: None,
        },
    );
    let json = serde_json::to_string(&doc).expect("serialize");
    let back: TaskRegistryDoc = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(doc, back);
}
