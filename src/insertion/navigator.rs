//! Cyclic caret navigation over the placeholders of one insertion

use thiserror::Error;

use crate::parser::ast::Span;

use super::engine::Editor;
use super::resolver::InsertionResult;

/// Errors from starting navigation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// Navigation was started on an insertion without placeholders
    #[error("insertion has no placeholders to navigate")]
    EmptyPlaceholderSet,
}

/// Walks the caret through placeholders in order, wrapping after the last.
///
/// Each insertion event gets its own navigator; nothing is shared between them.
#[derive(Debug, Clone)]
pub struct PlaceholderNavigator {
    positions: Vec<Span>,
    cursor: usize,
    visited: usize,
}

impl PlaceholderNavigator {
    /// Start navigating the placeholders of an insertion.
    ///
    /// Callers should check [`InsertionResult::has_placeholders`] first.
    pub fn start(result: &InsertionResult) -> Result<Self, NavigationError> {
        if result.placeholder_positions.is_empty() {
            return Err(NavigationError::EmptyPlaceholderSet);
        }
        Ok(Self {
            positions: result.placeholder_positions.clone(),
            cursor: 0,
            visited: 0,
        })
    }

    /// Select the next placeholder in the editor and return its range
    pub fn next(&mut self, editor: &mut dyn Editor) -> Span {
        let span = self.positions[self.cursor].clone();
        editor.place_caret(span.start, span.len());

        self.cursor = (self.cursor + 1) % self.positions.len();
        self.visited = (self.visited + 1).min(self.positions.len());
        span
    }

    /// Placeholders not yet visited
    pub fn remaining(&self) -> usize {
        self.positions.len() - self.visited
    }
}
