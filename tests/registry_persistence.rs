//! Integration tests for persisting template records

use std::fs;

use template_duality::{DirectiveTable, RegistryError, TemplateRegistry};

#[test]
fn test_write_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("Should create temp dir");

    let mut registry = TemplateRegistry::new();
    registry
        .save("daily", r#"# <% tp.date.now("YYYY-MM-DD") %>"#)
        .expect("Should save");
    registry
        .save("meeting", "Attendees: <% tp.system.prompt(\"Who?\") %>")
        .expect("Should save");
    registry.write_to_dir(dir.path()).expect("Should write");

    assert!(dir.path().join("daily.toml").exists());
    assert!(dir.path().join("meeting.toml").exists());

    let mut loaded = TemplateRegistry::new();
    let count = loaded.load_dir(dir.path()).expect("Should load");
    assert_eq!(count, 2);
    assert_eq!(loaded.ids(), vec!["daily", "meeting"]);
    assert_eq!(loaded.get("daily"), registry.get("daily"));
    assert_eq!(
        loaded.get("meeting").map(|r| r.static_content.as_str()),
        Some("Attendees: [[PROMPT: Who? (default: none)]]")
    );
}

#[test]
fn test_load_discards_stale_static_content() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    fs::write(
        dir.path().join("note.toml"),
        r#"
id = "note"
dynamic_content = "<% tp.file.title %>"
static_content = "edited by hand"
uses_dynamic_engine = false
"#,
    )
    .expect("Should write fixture");

    let mut registry = TemplateRegistry::new();
    registry.load_dir(dir.path()).expect("Should load");
    let record = registry.get("note").expect("Should exist");
    assert_eq!(record.static_content, "[[SYSTEM: info]]");
    assert!(record.uses_dynamic_engine);
}

#[test]
fn test_load_uses_registry_table() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    fs::write(
        dir.path().join("quote.toml"),
        r#"
id = "quote"
dynamic_content = "<% tp.web.daily_quote() %>"
static_content = ""
uses_dynamic_engine = true
"#,
    )
    .expect("Should write fixture");

    let table = DirectiveTable::from_str(
        r#"
roots = ["tp"]
[paths]
"web" = "system_info"
"#,
    )
    .expect("Should parse table");
    let mut registry = TemplateRegistry::with_table(table);
    registry.load_dir(dir.path()).expect("Should load");
    assert_eq!(
        registry.get("quote").map(|r| r.static_content.as_str()),
        Some("[[SYSTEM: info]]")
    );
}

#[test]
fn test_load_ignores_other_files() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    fs::write(dir.path().join("README.md"), "not a record").expect("Should write");

    let mut registry = TemplateRegistry::new();
    assert_eq!(registry.load_dir(dir.path()).expect("Should load"), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_load_invalid_record_error() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    fs::write(dir.path().join("bad.toml"), "id = 3").expect("Should write");

    let mut registry = TemplateRegistry::new();
    let result = registry.load_dir(dir.path());
    assert!(matches!(result, Err(RegistryError::Decode { .. })));
}

#[test]
fn test_unsafe_id_never_reaches_disk() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let mut registry = TemplateRegistry::new();
    registry.save("alpha", "x").expect("Should save");
    assert!(matches!(
        registry.save("zeta/bad", "y"),
        Err(RegistryError::InvalidId { .. })
    ));
    assert!(matches!(
        registry.save("../escape", "z"),
        Err(RegistryError::InvalidId { .. })
    ));

    registry.write_to_dir(dir.path()).expect("Should write");
    let mut written: Vec<String> = fs::read_dir(dir.path())
        .expect("Should list")
        .map(|entry| {
            entry
                .expect("Should read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    written.sort();
    assert_eq!(written, vec!["alpha.toml".to_string()]);
    assert!(!dir.path().join("zeta").exists());
}

#[test]
fn test_load_rejects_unsafe_stored_id() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    fs::write(
        dir.path().join("sneaky.toml"),
        r#"
id = "../sneaky"
dynamic_content = "x"
static_content = "x"
uses_dynamic_engine = false
"#,
    )
    .expect("Should write fixture");

    let mut registry = TemplateRegistry::new();
    let result = registry.load_dir(dir.path());
    assert!(matches!(result, Err(RegistryError::InvalidId { .. })));
    assert!(registry.is_empty());
}
