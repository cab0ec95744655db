use super::*;

#[tokio::test]
async fn streams_stdout_line_by_line() {
    let argv = vec![
        "sh".to_string(),
        "-c".to_string(),
        "echo one; echo two; echo three".to_string(),
    ];
    let mut process = spawn_backend_process("test", &argv).await.expect("spawn");

    let mut lines = Vec::new();
    while let Some(line) = process.next_line().await {
        lines.push(line);
    }
    assert_eq!(lines, vec!["one", "two", "three"]);

    let code = process.wait().await;
    assert_eq!(code, Some(0));
}

#[tokio::test]
async fn reports_nonzero_exit_code() {
    let argv = vec!["sh".to_string(), "-c".to_string(), "exit 7".to_string()];
    let mut process = spawn_backend_process("test", &argv).await.expect("spawn");

    while process.next_line().await.is_some() {}
    assert_eq!(process.wait().await, Some(7));
}

#[tokio::test]
async fn empty_argv_is_an_error() {
    let result = spawn_backend_process("test", &[]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn missing_binary_is_an_error() {
    let argv = vec!["definitely-not-a-real-binary-xyz".to_string()];
    let result = spawn_backend_process("test", &argv).await;
    assert!(result.is_err());
}
