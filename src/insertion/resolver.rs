//! Chooses between dynamic execution and the static placeholder rendering

use tracing::{debug, info, warn};

use crate::parser::ast::Span;
use crate::placeholder::scan_placeholders;
use crate::template::TemplateRecord;

use super::engine::{DynamicEngine, Notifier};

/// Which rendering ended up in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePath {
    Dynamic,
    Static,
}

/// Outcome of one insertion event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionResult {
    /// Text written into the target document
    pub final_text: String,
    /// Byte range of each placeholder in `final_text`; empty on the dynamic path
    pub placeholder_positions: Vec<Span>,
    pub engine_path: EnginePath,
}

impl InsertionResult {
    /// Move placeholder ranges into document coordinates for text inserted at `base`
    pub fn shifted(mut self, base: usize) -> Self {
        for span in &mut self.placeholder_positions {
            *span = span.start + base..span.end + base;
        }
        self
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholder_positions.is_empty()
    }
}

/// Options for [`resolve_with_options`]
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Notice shown when the engine is not available
    pub unavailable_notice: String,
    /// Notice shown when the engine failed; `{error}` is replaced by the error
    pub failure_notice: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            unavailable_notice: "Dynamic template engine is not available. \
                Inserted the static version; fill in the [[...]] placeholders."
                .to_string(),
            failure_notice: "Dynamic template engine failed ({error}). \
                Inserted the static version; fill in the [[...]] placeholders."
                .to_string(),
        }
    }
}

impl ResolveOptions {
    /// Create options with the default notices
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notice for an unavailable engine
    pub fn with_unavailable_notice(mut self, notice: impl Into<String>) -> Self {
        self.unavailable_notice = notice.into();
        self
    }

    /// Set the notice for a failed execution
    pub fn with_failure_notice(mut self, notice: impl Into<String>) -> Self {
        self.failure_notice = notice.into();
        self
    }
}

/// Resolve a template for insertion with the default notices
pub fn resolve(
    record: &TemplateRecord,
    engine_available: bool,
    engine: &dyn DynamicEngine,
    notifier: &dyn Notifier,
) -> InsertionResult {
    resolve_with_options(
        record,
        engine_available,
        engine,
        notifier,
        &ResolveOptions::default(),
    )
}

/// Resolve a template for insertion.
///
/// The dynamic path is attempted only when the engine is available and the
/// template has directives. Any engine failure falls back to the static
/// rendering; it is never propagated. A notice is emitted exactly once when a
/// dynamic template ends up static, and never for templates without
/// directives.
pub fn resolve_with_options(
    record: &TemplateRecord,
    engine_available: bool,
    engine: &dyn DynamicEngine,
    notifier: &dyn Notifier,
    options: &ResolveOptions,
) -> InsertionResult {
    if !record.uses_dynamic_engine {
        debug!(id = %record.id, "template has no directives, inserting as-is");
        return static_result(record);
    }

    if !engine_available {
        info!(id = %record.id, "dynamic engine unavailable, using static version");
        notifier.notify(&options.unavailable_notice);
        return static_result(record);
    }

    match engine.execute(&record.dynamic_content) {
        Ok(final_text) => {
            debug!(id = %record.id, "dynamic execution succeeded");
            InsertionResult {
                final_text,
                placeholder_positions: Vec::new(),
                engine_path: EnginePath::Dynamic,
            }
        }
        Err(err) => {
            warn!(id = %record.id, error = %err, "dynamic execution failed, using static version");
            notifier.notify(
                &options
                    .failure_notice
                    .replace("{error}", &err.to_string()),
            );
            static_result(record)
        }
    }
}

/// The static rendering, with placeholder positions re-scanned from the text
fn static_result(record: &TemplateRecord) -> InsertionResult {
    let final_text = record.static_content.clone();
    let placeholder_positions = scan_placeholders(&final_text)
        .into_iter()
        .map(|p| p.span)
        .collect();

    InsertionResult {
        final_text,
        placeholder_positions,
        engine_path: EnginePath::Static,
    }
}
