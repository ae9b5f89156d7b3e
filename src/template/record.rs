//! Template records and the dual template builder

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directives::DirectiveTable;
use crate::parser::{parse_with_table, Directive};
use crate::placeholder::translate;

/// The persisted pairing of a template's dynamic source and its static rendering.
///
/// `static_content` is derived: every change to `dynamic_content` goes
/// through [`TemplateRecord::set_dynamic_content`] or [`build`], which
/// regenerate it wholesale. Edits made to the static text directly are
/// discarded on the next save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub dynamic_content: String,
    pub static_content: String,
    pub uses_dynamic_engine: bool,
}

impl TemplateRecord {
    /// Replace the dynamic source and re-derive the static fields
    pub fn set_dynamic_content(&mut self, content: impl Into<String>, table: &DirectiveTable) {
        let rebuilt = build_with_table(self.id.clone(), content, table);
        *self = rebuilt;
    }

    /// Re-derive the static fields from the current dynamic source
    pub fn rederive(&mut self, table: &DirectiveTable) {
        let content = std::mem::take(&mut self.dynamic_content);
        self.set_dynamic_content(content, table);
    }
}

/// Build a template record with the default directive table
pub fn build(id: impl Into<String>, dynamic_content: impl Into<String>) -> TemplateRecord {
    build_with_table(id, dynamic_content, &DirectiveTable::default())
}

/// Build a template record with a custom directive table
pub fn build_with_table(
    id: impl Into<String>,
    dynamic_content: impl Into<String>,
    table: &DirectiveTable,
) -> TemplateRecord {
    let id = id.into();
    let dynamic_content = dynamic_content.into();
    let directives = parse_with_table(&dynamic_content, table);
    let static_content = render_static(&dynamic_content, &directives);

    debug!(
        id = %id,
        directives = directives.len(),
        "built template record"
    );

    TemplateRecord {
        id,
        uses_dynamic_engine: !directives.is_empty(),
        dynamic_content,
        static_content,
    }
}

/// Replace each directive span with its placeholder.
///
/// Directives are applied in ascending span order; `drift` tracks how far
/// earlier replacements have moved later spans.
pub fn render_static(dynamic_content: &str, directives: &[Directive]) -> String {
    let mut output = dynamic_content.to_string();
    let mut drift: isize = 0;

    for directive in directives {
        let placeholder = translate(directive);
        let start = directive.span.start.saturating_add_signed(drift);
        let end = directive.span.end.saturating_add_signed(drift);
        output.replace_range(start..end, &placeholder);
        drift += placeholder.len() as isize - directive.span.len() as isize;
    }

    output
}
