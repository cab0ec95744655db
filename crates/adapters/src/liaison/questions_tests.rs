use super::*;

#[test]
fn detects_natural_language_questions() {
    assert!(looks_like_question("Would you like me to delete the old logs?"));
    assert!(looks_like_question("Should I proceed?"));
}

#[test]
fn detects_trailing_question_mark() {
    assert!(looks_like_question("Run tests?"));
}

#[test]
fn detects_yes_no_prompts() {
    assert!(looks_like_question("Continue? y/n"));
}

#[test]
fn detects_press_enter_prompts() {
    assert!(looks_like_question("Press Enter to continue"));
}

#[test]
fn plain_status_line_is_not_a_question() {
    assert!(!looks_like_question("Reading file config.rs"));
}

#[test]
fn recognizes_completion_markers_case_insensitively() {
    assert!(is_completion_marker("Done."));
    assert!(is_completion_marker("TASK COMPLETED"));
    assert!(is_completion_marker("All tasks complete"));
    assert!(!is_completion_marker("Still working on it"));
}
