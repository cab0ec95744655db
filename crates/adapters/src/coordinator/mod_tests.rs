use super::*;
use overseer_core::MessageKind;
use tempfile::tempdir;

#[tokio::test]
async fn direct_message_round_trips_and_is_deleted_on_read() {
    let dir = tempdir().unwrap();
    let sender = Coordinator::new(dir.path(), "liaison_a");
    let receiver = Coordinator::new(dir.path(), "liaison_b");
    sender.ensure_folders().await.unwrap();
    receiver.ensure_folders().await.unwrap();

    sender
        .send(&CoordinationMessage {
            message_id: "m1".to_string(),
            from_liaison: "liaison_a".to_string(),
            to_liaison: Some("liaison_b".to_string()),
            timestamp_ms: 1_000,
            kind: MessageKind::InfoShare,
            payload: serde_json::json!({ "text": "hello" }),
            expires_at_ms: None,
        })
        .await
        .unwrap();

    let received = receiver.receive(2_000).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].message_id, "m1");

    // Reading again finds nothing: the file was unlinked after the first read.
    assert!(receiver.receive(2_000).await.unwrap().is_empty());
}

#[tokio::test]
async fn expired_direct_message_is_dropped() {
    let dir = tempdir().unwrap();
    let sender = Coordinator::new(dir.path(), "liaison_a");
    let receiver = Coordinator::new(dir.path(), "liaison_b");
    sender.ensure_folders().await.unwrap();

    sender
        .send(&CoordinationMessage {
            message_id: "m1".to_string(),
            from_liaison: "liaison_a".to_string(),
            to_liaison: Some("liaison_b".to_string()),
            timestamp_ms: 1_000,
            kind: MessageKind::Question,
            payload: serde_json::json!({}),
            expires_at_ms: Some(1_500),
        })
        .await
        .unwrap();

    assert!(receiver.receive(2_000).await.unwrap().is_empty());
}

#[tokio::test]
async fn broadcast_is_seen_once_per_handle_and_not_by_its_own_sender() {
    let dir = tempdir().unwrap();
    let a = Coordinator::new(dir.path(), "liaison_a");
    let b = Coordinator::new(dir.path(), "liaison_b");
    a.ensure_folders().await.unwrap();

    a.broadcast_discovery("topic", serde_json::json!({ "found": true }), 1_000)
        .await
        .unwrap();

    // The sender never sees its own broadcast.
    assert!(a.receive(2_000).await.unwrap().is_empty());

    let seen = b.receive(2_000).await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, MessageKind::InfoShare);

    // Broadcasts aren't deleted, but a handle only reports each id once.
    assert!(b.receive(2_000).await.unwrap().is_empty());
}

#[tokio::test]
async fn register_heartbeat_and_stale_filtering() {
    let dir = tempdir().unwrap();
    let coord = Coordinator::new(dir.path(), "liaison_a");
    coord.ensure_folders().await.unwrap();

    coord.register("do the thing", 1234, 1_000).await.unwrap();
    let active = coord.active_liaisons(1_500).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active["liaison_a"].task, "do the thing");

    // Past the staleness window with no heartbeat, the liaison drops out.
    let stale = coord.active_liaisons(1_000 + LIAISON_STALE_AFTER_MS + 1).await.unwrap();
    assert!(stale.is_empty());

    coord
        .heartbeat(LiaisonStatus::Idle, 1_000 + LIAISON_STALE_AFTER_MS)
        .await
        .unwrap();
    let refreshed = coord
        .active_liaisons(1_000 + LIAISON_STALE_AFTER_MS + 1)
        .await
        .unwrap();
    assert_eq!(refreshed["liaison_a"].status, LiaisonStatus::Idle);

    coord.deregister().await.unwrap();
    assert!(coord.active_liaisons(1_000 + LIAISON_STALE_AFTER_MS).await.unwrap().is_empty());
}

#[tokio::test]
async fn claim_task_is_exclusive_until_completed() {
    let dir = tempdir().unwrap();
    let a = Coordinator::new(dir.path(), "liaison_a");
    let b = Coordinator::new(dir.path(), "liaison_b");
    a.ensure_folders().await.unwrap();

    assert!(a.claim_task("task-1", "write the docs", 1_000).await.unwrap());
    assert!(!b.claim_task("task-1", "write the docs", 1_100).await.unwrap());

    a.complete_task("task-1", Some(serde_json::json!("done")), 1_200)
        .await
        .unwrap();

    // Once completed, the task can be claimed again (e.g. for a follow-up pass).
    assert!(b.claim_task("task-1", "polish the docs", 1_300).await.unwrap());
}

#[tokio::test]
async fn shared_context_is_visible_to_other_handles() {
    let dir = tempdir().unwrap();
    let a = Coordinator::new(dir.path(), "liaison_a");
    let b = Coordinator::new(dir.path(), "liaison_b");
    a.ensure_folders().await.unwrap();

    a.share_context("build_dir", serde_json::json!("/tmp/build"), 1_000)
        .await
        .unwrap();

    let context = b.shared_context().await.unwrap();
    assert_eq!(context["build_dir"].value, serde_json::json!("/tmp/build"));
    assert_eq!(context["build_dir"].from_liaison, "liaison_a");
}

#[tokio::test]
async fn ask_liaison_delivers_a_question_message() {
    let dir = tempdir().unwrap();
    let a = Coordinator::new(dir.path(), "liaison_a");
    let b = Coordinator::new(dir.path(), "liaison_b");
    a.ensure_folders().await.unwrap();

    let message_id = a
        .ask_liaison("liaison_b", "should I refactor this?", None, 1_000)
        .await
        .unwrap();

    let received = b.receive(2_000).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].message_id, message_id);
    assert_eq!(received[0].kind, MessageKind::Question);
}
