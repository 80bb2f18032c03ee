use super::*;
use crate::schema::ColumnType;

const SAMPLE: &str = r#"
database: local::DuckDuckDatabase
runtime: local::DuckDuckRuntime
connection:
  path: ./warehouse.duckdb
tables:
  - name: employees
    columns:
      - { name: id, type: integer }
      - { name: name, type: string }
  - name: departments
    columns:
      - { name: id, type: INT }
      - { name: title, type: varchar }
"#;

#[test]
fn test_parse_full_config() {
    let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.database, "local::DuckDuckDatabase");
    assert_eq!(config.runtime, "local::DuckDuckRuntime");
    assert_eq!(
        config.connection.as_ref().unwrap().path,
        PathBuf::from("./warehouse.duckdb")
    );
    let departments = config.table("departments").unwrap();
    assert_eq!(departments.column_names(), vec!["id", "title"]);
    assert_eq!(
        departments.column("title").unwrap().column_type,
        ColumnType::String
    );
}

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("database: db\nruntime: R").unwrap();
    assert!(config.validate().is_ok());
    assert!(config.connection.is_none());
    assert!(config.tables.is_empty());
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("database: db\nruntime: R\nengine: x");
    assert!(result.is_err());
}

#[test]
fn test_empty_runtime_rejected() {
    let config: Config = serde_yaml::from_str("database: db\nruntime: ''").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("E002"), "{err}");
}

#[test]
fn test_duplicate_table_rejected() {
    let yaml = r#"
database: db
runtime: R
tables:
  - { name: t, columns: [] }
  - { name: t, columns: [] }
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("more than once"), "{err}");
}

#[test]
fn test_duplicate_column_rejected() {
    let yaml = r#"
database: db
runtime: R
tables:
  - name: t
    columns:
      - { name: a, type: int }
      - { name: a, type: string }
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }), "{err}");
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("relq.yml"), SAMPLE).unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database().table_names(), vec!["employees", "departments"]);
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("relq.yaml"), "database: db\nruntime: R\n").unwrap();
    assert!(Config::load_from_dir(dir.path()).is_ok());
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }), "{err}");
}

#[test]
fn test_query_opens_session_on_table() {
    let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
    let q = config.query("employees").unwrap();
    assert_eq!(q.schema().column_names(), vec!["id", "name"]);
    assert!(config.query("missing").is_err());
}
