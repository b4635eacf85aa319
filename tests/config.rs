use std::io::Write;
use std::time::Duration;

use joinery::prelude::*;
use joinery::{ConfigError, ViewRegistry};

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
dialect = "oracle"

[connection]
url = "db.example:1521/app"
timeout_ms = 1500
"#
    )
    .unwrap();

    let config = Config::from_path(file.path()).unwrap();
    assert_eq!(config.dialect, Dialect::Oracle);
    assert_eq!(config.connection.url, "db.example:1521/app");
    assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));

    let registry = ViewRegistry::from_config(&config);
    assert_eq!(registry.dialect(), Dialect::Oracle);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joinery.toml");
    let err = Config::from_path(&path).unwrap_err();
    assert!(matches!(&err, ConfigError::Io { path: p, .. } if *p == path));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = Config::from_toml_str("dialect = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
