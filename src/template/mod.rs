//! Template records and their storage
//!
//! A template record pairs the dynamic source a user writes with a static
//! rendering derived from it. The derivation only runs one way: the static
//! text is regenerated on every save of the dynamic text.
//!
//! # Example
//!
//! ```rust
//! use template_duality::template::build;
//!
//! let record = build("daily", r#"# <% tp.date.now("YYYY-MM-DD") %>"#);
//! assert_eq!(record.static_content, "# [[DATE: YYYY-MM-DD]]");
//! assert!(record.uses_dynamic_engine);
//! ```

mod record;
mod registry;

pub use record::{build, build_with_table, render_static, TemplateRecord};
pub use registry::{RegistryError, TemplateRegistry};
