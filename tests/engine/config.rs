//! Engine configuration files

use crate::common::*;
use propgraph::{CardinalityPolicy, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn default_file_is_written_once_and_loads() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    EngineConfig::write_default_if_missing(&path).unwrap();
    let config = EngineConfig::from_file(&path).unwrap();
    assert_eq!(config, EngineConfig::default());

    std::fs::write(&path, "cardinality = \"eager\"\n").unwrap();
    EngineConfig::write_default_if_missing(&path).unwrap();
    let config = EngineConfig::from_file(&path).unwrap();
    assert_eq!(config.cardinality, CardinalityPolicy::Eager);
}

#[test]
fn loaded_config_drives_the_graph() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
cardinality = "eager"
homespace = "http://example.org/"
default_version = "3"
max_nesting_depth = 8
"#,
    )
    .unwrap();

    let config = EngineConfig::from_file(&path).unwrap();
    let mut graph = DocumentGraph::with_config(config).unwrap();
    let minted = graph.mint_identifier("thing", None).unwrap();
    assert_eq!(minted.as_str(), "http://example.org/thing/3");

    graph.add_top_level(foo("a", "eager")).unwrap();
    let mut a = graph.entity_mut(&id("a")).unwrap();
    assert!(a.remove_value(NAME, &Value::from("eager")).is_err());
    let child = a.compose_child_identifier("b", None).unwrap();
    assert_eq!(child.as_str(), "http://example.org/a/b/3");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = EngineConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn invalid_values_are_config_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    for content in [
        "max_nesting_depth = 0\n",
        "cardinality = \"sometimes\"\n",
        "homespace = \"has space\"\n",
        "default_version = \"a/b\"\n",
    ] {
        std::fs::write(&path, content).unwrap();
        let err = EngineConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "accepted {:?}", content);
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}

#[test]
fn config_survives_toml_round_trip() {
    let config = EngineConfig {
        cardinality: CardinalityPolicy::Eager,
        homespace: Some("http://example.org/doc/".to_string()),
        default_version: Some("1.0".to_string()),
        max_nesting_depth: 16,
    };
    let text = config.to_toml().unwrap();
    assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn graphs_reject_invalid_config_built_in_code() {
    let zero_depth = EngineConfig {
        max_nesting_depth: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        DocumentGraph::with_config(zero_depth.clone()),
        Err(Error::Config(_))
    ));

    let store: StatementStore = vec![Statement::type_of(id("a"), &TypeTag::new(PART))]
        .into_iter()
        .collect();
    let err = DocumentGraph::deserialize_with_config(&store, &registry(), zero_depth).unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let bad_version = EngineConfig {
        default_version: Some("a/b".to_string()),
        ..EngineConfig::default()
    };
    assert!(DocumentGraph::with_config(bad_version).is_err());
}
