//! Directive types produced by the parser

use serde::{Deserialize, Serialize};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// What a directive computes at insertion time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    /// Date computation, e.g. `tp.date.now("YYYY-MM-DD")`
    Date,
    /// User input, e.g. `tp.system.prompt("Mood", "neutral")`
    Prompt,
    /// Host or system introspection, e.g. `tp.file.title`
    SystemInfo,
    /// Control flow that cannot be reduced to a single value
    Conditional,
    /// Anything unrecognised or malformed
    Other,
}

impl DirectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Date => "date",
            DirectiveKind::Prompt => "prompt",
            DirectiveKind::SystemInfo => "system_info",
            DirectiveKind::Conditional => "conditional",
            DirectiveKind::Other => "other",
        }
    }
}

impl std::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dynamic directive found in template text.
///
/// Tokens live for one parse pass: the builder consumes them to produce the
/// static rendering and then drops them.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Span of the whole directive, markers included
    pub span: Span,
    /// Extracted arguments; for `Conditional` and `Other` this is the raw interior
    pub parameters: Vec<String>,
    /// Interior text between the markers, trimmed
    pub raw: String,
}

impl Directive {
    /// First parameter, if any
    pub fn first(&self) -> Option<&str> {
        self.parameters.first().map(|s| s.as_str())
    }

    /// Second parameter, if any
    pub fn second(&self) -> Option<&str> {
        self.parameters.get(1).map(|s| s.as_str())
    }
}

/// A parsed directive interior: `path.to.function(arg, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: Vec<Spanned<String>>,
    /// Argument spans relative to the interior; `None` when there is no argument list
    pub args: Option<Vec<Span>>,
}

impl Call {
    /// Dotted path segments as plain strings
    pub fn segments(&self) -> Vec<&str> {
        self.path.iter().map(|s| s.node.as_str()).collect()
    }
}
