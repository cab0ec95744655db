use super::*;
use crate::model::{ActionKind, InputRequestSource, ResumeToken, Urgency};

fn started(engine: &str, value: &str) -> Event {
    Event::Started {
        engine: engine.into(),
        resume: ResumeToken::new(engine, value),
        title: None,
        meta: None,
    }
}

fn action_started(id: &str, kind: ActionKind) -> Event {
    Event::Action {
        engine: "kimi".into(),
        action: Action::new(id, kind, "doing a thing"),
        phase: ActionPhase::Started,
        ok: None,
        message: None,
        level: None,
    }
}

fn action_completed(id: &str) -> Event {
    Event::Action {
        engine: "kimi".into(),
        action: Action::new(id, ActionKind::Command, "doing a thing"),
        phase: ActionPhase::Completed,
        ok: Some(true),
        message: None,
        level: None,
    }
}

fn input_request(request_id: &str) -> Event {
    Event::InputRequest {
        engine: "kimi".into(),
        request_id: request_id.into(),
        question: "Continue?".into(),
        source: InputRequestSource::Subagent,
        context: None,
        options: None,
        urgency: Urgency::Normal,
    }
}

#[test]
fn started_sets_resume() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&started("kimi", "sess-1"));
    let snapshot = tracker.snapshot(None, None);
    assert_eq!(snapshot.resume, Some(ResumeToken::new("kimi", "sess-1")));
}

#[test]
fn turn_kind_actions_are_dropped() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&action_started("t1", ActionKind::Turn));
    let snapshot = tracker.snapshot(None, None);
    assert!(snapshot.actions.is_empty());
    assert_eq!(snapshot.action_count, 0);
}

#[test]
fn empty_id_actions_are_dropped() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&action_started("", ActionKind::Command));
    let snapshot = tracker.snapshot(None, None);
    assert!(snapshot.actions.is_empty());
}

#[test]
fn repeated_started_for_open_id_becomes_updated() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&action_started("tc_1", ActionKind::Command));
    tracker.note_event(&action_started("tc_1", ActionKind::Command));
    let snapshot = tracker.snapshot(None, None);
    assert_eq!(snapshot.actions.len(), 1);
    assert_eq!(snapshot.actions[0].display_phase, ActionPhase::Updated);
    // action_count only increments for genuinely new ids.
    assert_eq!(snapshot.action_count, 1);
}

#[test]
fn action_count_tracks_distinct_ids_only() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&action_started("tc_1", ActionKind::Command));
    tracker.note_event(&action_completed("tc_1"));
    tracker.note_event(&action_started("tc_2", ActionKind::Command));
    let snapshot = tracker.snapshot(None, None);
    assert_eq!(snapshot.action_count, 2);
}

#[test]
fn actions_are_sorted_by_first_seen() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&action_started("tc_2", ActionKind::Command));
    tracker.note_event(&action_started("tc_1", ActionKind::Tool));
    let snapshot = tracker.snapshot(None, None);
    let ids: Vec<&str> = snapshot.actions.iter().map(|a| a.action.id.as_str()).collect();
    assert_eq!(ids, vec!["tc_2", "tc_1"]);
}

#[test]
fn input_requests_are_sorted_by_arrival_and_clearable() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&input_request("r2"));
    tracker.note_event(&input_request("r1"));
    let snapshot = tracker.snapshot(None, None);
    let ids: Vec<&str> = snapshot
        .input_requests
        .iter()
        .map(|r| r.request_id.as_str())
        .collect();
    assert_eq!(ids, vec!["r2", "r1"]);

    tracker.clear_input_request("r2");
    let snapshot = tracker.snapshot(None, None);
    assert_eq!(snapshot.input_requests.len(), 1);
    assert_eq!(snapshot.input_requests[0].request_id, "r1");
}

#[test]
fn refeeding_the_same_sequence_is_deterministic() {
    let events = vec![
        started("kimi", "sess-1"),
        action_started("tc_1", ActionKind::Command),
        action_completed("tc_1"),
        input_request("r1"),
    ];

    let mut first = ProgressTracker::new();
    for event in &events {
        first.note_event(event);
    }
    let mut second = ProgressTracker::new();
    for event in &events {
        second.note_event(event);
    }

    assert_eq!(first.snapshot(None, None), second.snapshot(None, None));
}

fn arb_event() -> impl proptest::strategy::Strategy<Value = Event> {
    use proptest::prelude::*;
    prop_oneof![
        "[a-c]".prop_map(|id| action_started(&format!("tc_{id}"), ActionKind::Command)),
        "[a-c]".prop_map(|id| action_completed(&format!("tc_{id}"))),
        "[a-c]".prop_map(|id| input_request(&format!("r_{id}"))),
        Just(started("kimi", "sess-1")),
    ]
}

proptest::proptest! {
    /// Re-feeding the same event sequence through two independently
    /// constructed trackers always produces an identical snapshot, for any
    /// sequence the generator can produce, not just the hand-picked one
    /// above.
    #[test]
    fn fold_is_deterministic_for_any_event_sequence(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut first = ProgressTracker::new();
        let mut second = ProgressTracker::new();
        for event in &events {
            first.note_event(event);
            second.note_event(event);
        }
        proptest::prop_assert_eq!(first.snapshot(None, None), second.snapshot(None, None));
    }
}

#[test]
fn resume_formatter_is_applied_when_provided() {
    let mut tracker = ProgressTracker::new();
    tracker.note_event(&started("kimi", "sess-1"));
    let formatter: &dyn Fn(&ResumeToken) -> String = &|r| format!("`kimi --session {}`", r.value);
    let snapshot = tracker.snapshot(Some(formatter), None);
    assert_eq!(snapshot.resume_line.as_deref(), Some("`kimi --session sess-1`"));
}
