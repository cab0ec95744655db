use super::*;

#[test]
fn builtins_cover_both_reference_backends() {
    let engines: Vec<&str> = builtins().iter().map(|b| b.engine).collect();
    assert!(engines.contains(&"kimi"));
    assert!(engines.contains(&"claude"));
}

#[test]
fn builtin_engine_ids_are_unique() {
    let mut engines: Vec<&str> = builtins().iter().map(|b| b.engine).collect();
    let before = engines.len();
    engines.sort();
    engines.dedup();
    assert_eq!(engines.len(), before);
}
