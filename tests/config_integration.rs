use inkmount::capability::ALL_PLUGINS;
use inkmount::config::{EditorConfig, load_editor_config};
use inkmount::toolbar::resolve;

#[test]
fn test_config_file_long_form_toolbar_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    let content = r#"
{
    "toolbar": { "items": ["heading", "|", "bold", "italic", "|", "insertTable"] },
    "heading": { "options": [{ "model": "heading2", "view": "h2" }] }
}
"#;
    std::fs::write(&path, content).unwrap();

    let config = load_editor_config(&path).unwrap();
    let toolbar = config.toolbar().unwrap();
    let plugins = resolve(toolbar.as_deref());
    let names: Vec<&str> = plugins.iter().map(|p| p.name()).collect();

    assert!(names.contains(&"Heading"));
    assert!(names.contains(&"TableUI"));
    assert!(!names.contains(&"SourceEditing"));
    assert!(names.contains(&"Essentials"), "ungated plugins stay loaded");
}

#[test]
fn test_cli_toolbar_overrides_file_toolbar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(&path, r#"{ "toolbar": ["bold"], "language": "fr" }"#).unwrap();

    let file_config = load_editor_config(&path).unwrap();
    let cli_config = EditorConfig::new().with_toolbar(["italic", "link"]);
    let effective = file_config.union(&cli_config);

    assert_eq!(
        effective.toolbar().unwrap(),
        Some(vec!["italic".to_string(), "link".to_string()]),
        "cli should override toolbar"
    );
    assert_eq!(
        effective.get("language"),
        Some(&serde_json::json!("fr")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_missing_config_file_loads_every_plugin() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_editor_config(&dir.path().join("absent.json")).unwrap();
    let toolbar = config.toolbar().unwrap();
    assert_eq!(toolbar, None);
    assert_eq!(resolve(toolbar.as_deref()), ALL_PLUGINS.to_vec());
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(&path, "{ toolbar: }").unwrap();
    let err = load_editor_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
}
