use super::*;

#[test]
fn decodes_assistant_with_tool_calls() {
    let line = r#"{"role":"assistant","content":"Let me check.","tool_calls":[{"id":"tc_1","type":"function","function":{"name":"Shell","arguments":"{\"command\":\"ls\"}"}}]}"#;
    let record = decode_line(line).expect("decode");
    match record {
        Record::Assistant { content, tool_calls, .. } => {
            assert_eq!(content.as_deref(), Some("Let me check."));
            let calls = tool_calls.expect("tool_calls");
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].id, "tc_1");
            assert_eq!(calls[0].function.name, "Shell");
        }
        other => panic!("expected assistant record, got {other:?}"),
    }
}

#[test]
fn decodes_tool_record_with_string_content() {
    let line = r#"{"role":"tool","tool_call_id":"tc_1","content":"file1.txt\nfile2.txt"}"#;
    let record = decode_line(line).expect("decode");
    match record {
        Record::Tool { tool_call_id, content, .. } => {
            assert_eq!(tool_call_id, "tc_1");
            assert_eq!(content.as_text(), "file1.txt\nfile2.txt");
        }
        other => panic!("expected tool record, got {other:?}"),
    }
}

#[test]
fn decodes_tool_record_with_block_content() {
    let line = r#"{"role":"tool","tool_call_id":"tc_2","content":[{"type":"text","text":"ok"}]}"#;
    let record = decode_line(line).expect("decode");
    match record {
        Record::Tool { content, .. } => assert_eq!(content.as_text(), "ok"),
        other => panic!("expected tool record, got {other:?}"),
    }
}

#[test]
fn invalid_json_is_a_recoverable_decode_error() {
    let result = decode_line("not json at all");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.line, "not json at all");
}

#[test]
fn tool_call_arguments_are_not_parsed_eagerly() {
    let line = r#"{"role":"assistant","content":null,"tool_calls":[{"id":"tc_1","function":{"name":"Write","arguments":"{\"file_path\":\"notes.md\"}"}}]}"#;
    let record = decode_line(line).expect("decode");
    if let Record::Assistant { tool_calls, .. } = record {
        let call = &tool_calls.expect("tool_calls")[0];
        // Arguments stay as a raw JSON string until the backend translator parses them.
        assert!(call.function.arguments.starts_with('{'));
    } else {
        panic!("expected assistant record");
    }
}
