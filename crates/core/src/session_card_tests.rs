use super::*;
use crate::model::Urgency;

fn item(text: &str, at_ms: u64) -> ActivityItem {
    ActivityItem {
        engine: "kimi".into(),
        kind: "command".into(),
        text: text.into(),
        at_ms,
    }
}

#[test]
fn new_card_starts_working_and_single_agent() {
    let mut builder = SessionCardBuilder::new();
    builder.add_agent("kimi", true);
    let card = builder.build(5);
    assert_eq!(card.status, CardStatus::Working);
    assert!(!card.is_multi_agent());
    assert!(!card.has_pending_inputs());
    assert!(!card.is_complete());
}

#[test]
fn pending_input_moves_status_to_waiting_and_back() {
    let mut builder = SessionCardBuilder::new();
    builder.add_agent("kimi", true);
    builder.add_pending_input(PendingInput {
        request_id: "r1".into(),
        engine: "kimi".into(),
        question: "Continue?".into(),
        urgency: Urgency::Normal,
    });
    assert_eq!(builder.build(5).status, CardStatus::WaitingInput);

    builder.remove_pending_input("r1");
    assert_eq!(builder.build(5).status, CardStatus::Working);
}

#[test]
fn activity_feed_is_trimmed_to_max_items() {
    let mut builder = SessionCardBuilder::new().with_max_activity_items(3);
    for i in 0..5 {
        builder.add_activity(item(&format!("step {i}"), i as u64));
    }
    let card = builder.build(50);
    assert_eq!(card.activity.len(), 3);
    assert_eq!(card.activity[0].text, "step 2");
}

#[test]
fn build_slices_to_visible_window_but_reports_total() {
    let mut builder = SessionCardBuilder::new();
    for i in 0..10 {
        builder.add_activity(item(&format!("step {i}"), i as u64));
    }
    let card = builder.build(3);
    assert_eq!(card.activity.len(), 3);
    assert_eq!(card.activity_total, 10);
    assert!(card.activity_truncated);
    assert_eq!(card.activity[2].text, "step 9");
}

#[test]
fn set_complete_marks_all_badges_done() {
    let mut builder = SessionCardBuilder::new();
    builder.add_agent("kimi", true);
    builder.add_agent("worker-1", false);
    builder.set_complete(true, None);
    let card = builder.build(5);
    assert!(card.badges.iter().all(|b| b.status == AgentStatus::Done));
    assert_eq!(card.status, CardStatus::Done);
    assert!(card.is_complete());
}

#[test]
fn set_complete_error_marks_error_status() {
    let mut builder = SessionCardBuilder::new();
    builder.add_agent("kimi", true);
    builder.set_complete(false, Some("boom".into()));
    let card = builder.build(5);
    assert_eq!(card.status, CardStatus::Error);
    assert_eq!(card.error.as_deref(), Some("boom"));
}

#[test]
fn set_cancelled_overrides_status() {
    let mut builder = SessionCardBuilder::new();
    builder.add_agent("kimi", true);
    builder.set_cancelled();
    assert_eq!(builder.build(5).status, CardStatus::Cancelled);
}

#[test]
fn badges_sort_primary_first_then_recency() {
    let mut builder = SessionCardBuilder::new();
    builder.add_agent("worker-1", false);
    builder.add_agent("kimi", true);
    builder.increment_step("worker-1", 100);
    let card = builder.build(5);
    assert_eq!(card.badges[0].engine, "kimi");
}

#[test]
fn symbol_helpers_cover_every_variant() {
    assert_eq!(badge_symbol(AgentStatus::Active), "●");
    assert_eq!(status_symbol(CardStatus::Done), "✅");
    assert_eq!(activity_symbol("unknown_kind"), "•");
}
