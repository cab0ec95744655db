use super::*;
use serde_json::json;

fn obj(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().expect("object").clone()
}

#[test]
fn shell_is_a_command_action() {
    let input = obj(json!({"command": "ls -la"}));
    let (kind, title) = tool_kind_and_title("Shell", &input, &["file_path", "path"]);
    assert_eq!(kind, ActionKind::Command);
    assert_eq!(title, "ls -la");
}

#[test]
fn write_is_a_file_change_action() {
    let input = obj(json!({"file_path": "notes.md", "content": "hi"}));
    let (kind, title) = tool_kind_and_title("Write", &input, &["file_path", "path"]);
    assert_eq!(kind, ActionKind::FileChange);
    assert_eq!(title, "Write notes.md");
    assert_eq!(
        tool_input_path(&input, &["file_path", "path"]),
        Some("notes.md".to_string())
    );
}

#[test]
fn unknown_tool_falls_back_to_tool_kind() {
    let input = obj(json!({}));
    let (kind, title) = tool_kind_and_title("CustomThing", &input, &[]);
    assert_eq!(kind, ActionKind::Tool);
    assert_eq!(title, "CustomThing");
}

#[test]
fn single_file_change_is_always_update() {
    let changes = single_file_change("a.txt");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, FileChangeKind::Update);
}
