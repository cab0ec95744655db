use super::*;
use tempfile::tempdir;

#[test]
fn loads_a_backend_table_as_opaque_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overseer.toml");
    std::fs::write(&path, "[kimi]\nbinary = \"kimi\"\nextra_unknown_key = 1\n").unwrap();

    let config = load_path(&path).unwrap();
    assert_eq!(config.backend("kimi").unwrap()["binary"], "kimi");
    assert_eq!(config.backend("kimi").unwrap()["extra_unknown_key"], 1);
    assert!(config.backend("claude").is_none());
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempdir().unwrap();
    let result = load_path(&dir.path().join("does-not-exist.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "not = [valid").unwrap();
    assert!(matches!(load_path(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn nested_table_round_trips_through_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overseer.toml");
    std::fs::write(&path, "[liaison]\ncaptains_chair = true\n[liaison.nested]\nlevel = \"deep\"\n").unwrap();

    let config = load_path(&path).unwrap();
    let liaison = config.backend("liaison").unwrap();
    assert_eq!(liaison["captains_chair"], true);
    assert_eq!(liaison["nested"]["level"], "deep");
}
