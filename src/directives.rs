//! Directive table: which call paths map to which directive kinds
//!
//! Tables are TOML documents. The built-in table covers the templating
//! engine's date, prompt, and file namespaces; a user table replaces it
//! wholesale.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::parser::ast::DirectiveKind;

/// Errors that can occur when loading or parsing directive tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read directive table file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse directive table TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Maps dotted call paths to directive kinds
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveTable {
    /// Optional name for the table
    pub name: Option<String>,
    /// Leading path segments stripped before lookup, e.g. `tp`
    pub roots: Vec<String>,
    /// Keywords that make a directive conditional when they lead its interior
    pub conditionals: Vec<String>,
    /// Path prefix -> kind
    pub paths: HashMap<String, DirectiveKind>,
}

/// TOML structure for deserializing directive tables
#[derive(Deserialize)]
struct TomlTable {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    roots: Vec<String>,
    #[serde(default)]
    conditionals: Vec<String>,
    #[serde(default)]
    paths: HashMap<String, DirectiveKind>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

const DEFAULT_TABLE: &str = r##"
roots = ["tp"]
conditionals = ["if", "else", "for", "while", "switch"]

[metadata]
name = "templater"

[paths]
"date" = "date"
"system.prompt" = "prompt"
"system.suggester" = "prompt"
"system.clipboard" = "system_info"
"file" = "system_info"
"frontmatter" = "system_info"
"config" = "system_info"
"##;

impl DirectiveTable {
    /// Load a table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a table from a TOML string
    pub fn from_str(content: &str) -> Result<Self, TableError> {
        let parsed: TomlTable = toml::from_str(content)?;

        Ok(DirectiveTable {
            name: parsed.metadata.and_then(|m| m.name),
            roots: parsed.roots,
            conditionals: parsed.conditionals,
            paths: parsed.paths,
        })
    }

    /// Classify a call path by longest matching prefix.
    ///
    /// One leading root segment is stripped first. Returns `None` for paths
    /// the table does not know.
    pub fn classify(&self, segments: &[&str]) -> Option<DirectiveKind> {
        let rest = match segments.split_first() {
            Some((first, rest)) if self.roots.iter().any(|r| r == first) => rest,
            _ => segments,
        };

        (1..=rest.len())
            .rev()
            .find_map(|n| self.paths.get(&rest[..n].join(".")).copied())
    }

    /// Whether `word` starts a conditional directive
    pub fn is_conditional(&self, word: &str) -> bool {
        self.conditionals.iter().any(|c| c == word)
    }
}

impl Default for DirectiveTable {
    fn default() -> Self {
        Self::from_str(DEFAULT_TABLE).expect("Default directive table should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = DirectiveTable::default();
        assert_eq!(table.name.as_deref(), Some("templater"));
        assert_eq!(table.roots, vec!["tp".to_string()]);
        assert!(table.is_conditional("if"));
        assert!(!table.is_conditional("tp"));
    }

    #[test]
    fn test_classify_known_paths() {
        let table = DirectiveTable::default();
        assert_eq!(
            table.classify(&["tp", "date", "now"]),
            Some(DirectiveKind::Date)
        );
        assert_eq!(
            table.classify(&["tp", "date", "tomorrow"]),
            Some(DirectiveKind::Date)
        );
        assert_eq!(
            table.classify(&["tp", "system", "prompt"]),
            Some(DirectiveKind::Prompt)
        );
        assert_eq!(
            table.classify(&["tp", "system", "clipboard"]),
            Some(DirectiveKind::SystemInfo)
        );
        assert_eq!(
            table.classify(&["tp", "file", "title"]),
            Some(DirectiveKind::SystemInfo)
        );
    }

    #[test]
    fn test_classify_unknown_paths() {
        let table = DirectiveTable::default();
        assert_eq!(table.classify(&["tp", "web", "daily_quote"]), None);
        assert_eq!(table.classify(&["tp", "system"]), None);
        assert_eq!(table.classify(&["tp"]), None);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = DirectiveTable::from_str(
            r#"
roots = []
[paths]
"system" = "system_info"
"system.prompt" = "prompt"
"#,
        )
        .expect("Should parse");
        assert_eq!(
            table.classify(&["system", "prompt"]),
            Some(DirectiveKind::Prompt)
        );
        assert_eq!(
            table.classify(&["system", "hostname"]),
            Some(DirectiveKind::SystemInfo)
        );
    }

    #[test]
    fn test_custom_root() {
        let table = DirectiveTable::from_str(
            r#"
roots = ["tpl"]
[paths]
"today" = "date"
"#,
        )
        .expect("Should parse");
        assert_eq!(table.name, None);
        assert_eq!(table.classify(&["tpl", "today"]), Some(DirectiveKind::Date));
        assert_eq!(table.classify(&["tp", "today"]), None);
    }

    #[test]
    fn test_invalid_kind_error() {
        let result = DirectiveTable::from_str(
            r#"
[paths]
"date" = "calendar"
"#,
        );
        assert!(matches!(result, Err(TableError::ParseError(_))));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = DirectiveTable::from_str("this is not valid toml {{{{");
        assert!(result.is_err());
    }
}
