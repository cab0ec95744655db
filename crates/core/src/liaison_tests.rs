use super::*;

#[test]
fn session_graph_round_trips_through_json() {
    let mut graph = SessionGraph::new("liaison_abc", "takopi_liaison_abc", "/home/u/.takopi/liaison", 1700000000);
    graph.panes.push(PaneInfo::new("0.0", "takopi_liaison_abc", "claude", PaneRole::Liaison));

    let json = serde_json::to_string_pretty(&graph).expect("serialize");
    let back: SessionGraph = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(graph, back);
}

#[test]
fn finds_pane_by_pending_request() {
    let mut graph = SessionGraph::new("s1", "takopi_s1", "/tmp/coord", 0);
    let mut pane = PaneInfo::new("0.1", "takopi_s1", "kimi", PaneRole::Worker);
    pane.pending_input_request = Some("req-1".into());
    graph.panes.push(pane);

    assert!(graph.pane_with_pending("req-1").is_some());
    assert!(graph.pane_with_pending("missing").is_none());

    let pane = graph.pane_with_pending_mut("req-1").expect("pane");
    pane.pending_input_request = None;
    assert!(graph.pane_with_pending("req-1").is_none());
}
