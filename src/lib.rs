//! Template Duality - dynamic templates with a static placeholder fallback
//!
//! A template written for a dynamic templating engine (`<% ... %>`
//! directives for dates, prompts and system queries) is stored together
//! with a static rendering in which every directive is replaced by a
//! `[[LABEL]]` placeholder. At insertion time the dynamic version runs when
//! an engine is available; otherwise the static version is inserted and the
//! caret can be walked through the placeholders.
//!
//! # Example
//!
//! ```rust
//! use template_duality::build;
//!
//! let record = build("daily", r#"Mood: <% tp.system.prompt("Enter mood", "neutral") %>"#);
//! assert_eq!(
//!     record.static_content,
//!     "Mood: [[PROMPT: Enter mood (default: neutral)]]"
//! );
//! ```

pub mod directives;
pub mod error;
pub mod insertion;
pub mod parser;
pub mod placeholder;
pub mod template;

pub use directives::{DirectiveTable, TableError};
pub use error::{Diagnostic, DiagnosticKind, SyntaxError};
pub use insertion::{
    resolve, resolve_with_options, CommandEngine, DynamicEngine, Editor, EngineError,
    EnginePath, InsertionResult, NavigationError, Notifier, PlaceholderNavigator,
    ResolveOptions,
};
pub use parser::{parse, parse_with_table, Directive, DirectiveKind};
pub use placeholder::{scan_placeholders, translate, Placeholder};
pub use template::{build, build_with_table, RegistryError, TemplateRecord, TemplateRegistry};

/// Report every directive that would become an `UNKNOWN` placeholder
///
/// # Example
///
/// ```rust
/// use template_duality::{check, DirectiveTable};
///
/// let table = DirectiveTable::default();
/// assert!(check(r#"<% tp.date.now("YYYY") %>"#, &table).is_empty());
/// assert_eq!(check("<% tp.web.daily_quote() %>", &table).len(), 1);
/// ```
pub fn check(source: &str, table: &DirectiveTable) -> Vec<Diagnostic> {
    parser::parse_with_diagnostics(source, table).1
}
