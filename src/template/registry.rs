//! Template registry for storing and persisting template records

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::directives::DirectiveTable;

use super::record::{build_with_table, TemplateRecord};

/// File extension for persisted records
const RECORD_EXTENSION: &str = "toml";

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Template not found in registry
    #[error("template not found: {id}")]
    NotFound { id: String },

    /// Duplicate template identity
    #[error("duplicate template: {id}")]
    Duplicate { id: String },

    /// Identity that cannot be used as a file name
    #[error("invalid template id: {id:?}")]
    InvalidId { id: String },

    /// Error reading or writing a record file
    #[error("error accessing template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record file is not a valid template record
    #[error("invalid template file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Record could not be serialized
    #[error("cannot serialize template {id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: toml::ser::Error,
    },
}

/// Registry of template records keyed by identity.
///
/// Every write re-derives the static rendering from the dynamic source with
/// the registry's directive table. Saves are serialized by `&mut self`.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    records: HashMap<String, TemplateRecord>,
    table: DirectiveTable,
}

impl TemplateRegistry {
    /// Create a new empty registry with the default directive table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry with a custom directive table
    pub fn with_table(table: DirectiveTable) -> Self {
        Self {
            records: HashMap::new(),
            table,
        }
    }

    /// The directive table used to derive static content
    pub fn table(&self) -> &DirectiveTable {
        &self.table
    }

    /// Create a new template, failing if the identity is taken
    pub fn create(
        &mut self,
        id: &str,
        dynamic_content: impl Into<String>,
    ) -> Result<&TemplateRecord, RegistryError> {
        if self.records.contains_key(id) {
            return Err(RegistryError::Duplicate { id: id.to_string() });
        }
        self.save(id, dynamic_content)
    }

    /// Create or replace a template, re-deriving its static content.
    ///
    /// Ids must be usable as file names; see [`TemplateRegistry::write_to_dir`].
    pub fn save(
        &mut self,
        id: &str,
        dynamic_content: impl Into<String>,
    ) -> Result<&TemplateRecord, RegistryError> {
        validate_id(id)?;
        let record = build_with_table(id, dynamic_content, &self.table);
        debug!(id, uses_dynamic_engine = record.uses_dynamic_engine, "saved template");
        self.records.insert(id.to_string(), record);
        Ok(&self.records[id])
    }

    /// Get a template by identity
    pub fn get(&self, id: &str) -> Option<&TemplateRecord> {
        self.records.get(id)
    }

    /// Remove a template
    pub fn remove(&mut self, id: &str) -> Result<TemplateRecord, RegistryError> {
        self.records
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// All template identities, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write every record to `dir` as `<id>.toml`
    pub fn write_to_dir(&self, dir: &Path) -> Result<(), RegistryError> {
        std::fs::create_dir_all(dir).map_err(|source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for id in self.ids() {
            let record = &self.records[id];
            let path = record_path(dir, id)?;
            let encoded = toml::to_string(record).map_err(|source| RegistryError::Encode {
                id: id.to_string(),
                source,
            })?;
            std::fs::write(&path, encoded).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
        }

        info!(count = self.records.len(), dir = %dir.display(), "wrote templates");
        Ok(())
    }

    /// Load every `*.toml` record in `dir`, replacing records with the same id.
    ///
    /// Static content is re-derived from the stored dynamic content; the
    /// stored static text is not trusted.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, RegistryError> {
        let io_err = |source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext == RECORD_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let stored: TemplateRecord =
                toml::from_str(&content).map_err(|source| RegistryError::Decode {
                    path: path.clone(),
                    source,
                })?;

            let id = stored.id.clone();
            let record = self.save(&id, stored.dynamic_content)?;
            if record.static_content != stored.static_content {
                warn!(id = %id, "stored static content was stale and has been re-derived");
            }
        }

        info!(count = paths.len(), dir = %dir.display(), "loaded templates");
        Ok(paths.len())
    }
}

/// Reject ids that are not a single plain file name
fn validate_id(id: &str) -> Result<(), RegistryError> {
    let invalid = id.is_empty()
        || id.starts_with('.')
        || id.contains(['/', '\\'])
        || id.chars().any(char::is_control);
    if invalid {
        return Err(RegistryError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

/// Resolve the file path for a record, rejecting ids that escape `dir`
fn record_path(dir: &Path, id: &str) -> Result<PathBuf, RegistryError> {
    validate_id(id)?;
    Ok(dir.join(format!("{}.{}", id, RECORD_EXTENSION)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_create_and_get() {
        let mut registry = TemplateRegistry::new();
        registry
            .create("daily", r#"<% tp.date.now("YYYY") %>"#)
            .expect("Should create");
        assert!(registry.contains("daily"));
        assert_eq!(
            registry.get("daily").map(|r| r.static_content.as_str()),
            Some("[[DATE: YYYY]]")
        );
    }

    #[test]
    fn test_registry_duplicate_error() {
        let mut registry = TemplateRegistry::new();
        registry.create("daily", "a").expect("First create should succeed");
        let result = registry.create("daily", "b");
        assert!(matches!(result, Err(RegistryError::Duplicate { .. })));
    }

    #[test]
    fn test_save_overwrites_and_rederives() {
        let mut registry = TemplateRegistry::new();
        registry.save("note", "<% tp.file.title %>").expect("Should save");
        let record = registry.save("note", "no directives").expect("Should save");
        assert_eq!(record.static_content, "no directives");
        assert!(!record.uses_dynamic_engine);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = TemplateRegistry::new();
        registry.save("a", "x").expect("Should save");
        assert!(registry.remove("a").is_ok());
        assert!(registry.is_empty());
        assert!(matches!(
            registry.remove("a"),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_ids_sorted() {
        let mut registry = TemplateRegistry::new();
        registry.save("b", "").expect("Should save");
        registry.save("a", "").expect("Should save");
        registry.save("c", "").expect("Should save");
        assert_eq!(registry.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsafe_ids_are_rejected_on_save() {
        let mut registry = TemplateRegistry::new();
        for id in ["zeta/bad", "..", ".hidden", "", "a\\b", "tab\there"] {
            assert!(matches!(
                registry.save(id, "x"),
                Err(RegistryError::InvalidId { .. })
            ));
            assert!(matches!(
                registry.create(id, "x"),
                Err(RegistryError::InvalidId { .. })
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_record_path_rejects_escaping_ids() {
        let dir = Path::new("/tmp/templates");
        assert!(record_path(dir, "daily").is_ok());
        assert!(record_path(dir, "../etc").is_err());
        assert!(record_path(dir, "a/b").is_err());
        assert!(record_path(dir, "").is_err());
    }
}
