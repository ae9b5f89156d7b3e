//! Insertion: turning a template record into document text
//!
//! The resolver picks the dynamic or static rendering, and the navigator
//! walks the caret through any placeholders left in the inserted text. The
//! host supplies the engine, notice display, and editor through the traits
//! in [`engine`].

pub mod engine;
mod navigator;
mod resolver;

pub use engine::{CommandEngine, DynamicEngine, Editor, EngineError, Notifier};
pub use navigator::{NavigationError, PlaceholderNavigator};
pub use resolver::{
    resolve, resolve_with_options, EnginePath, InsertionResult, ResolveOptions,
};
