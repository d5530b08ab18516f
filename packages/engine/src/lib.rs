//! # Treescribe Engine
//!
//! Batch, plugin-driven rewriting of immutable syntax trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ syntax: source text → immutable tree +      │
//! │         semantic model (one version)        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ dispatcher: one read-only traversal routes  │
//! │ categorized elements to installed plugins;  │
//! │ plugins record pending edits + imports      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ batcher: resolve every pending edit against │
//! │ the pristine tree, then substitute all of   │
//! │ them in one structural pass → new tree      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ imports: append missing using directives    │
//! │ persist: encoding-preserving write, only    │
//! │          when the result actually differs   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Trees are immutable**: a rewrite never edits in place; it produces
//!    a wholly new tree version with fresh element identities.
//! 2. **Decide cheap, compute late**: plugins flag elements synchronously
//!    during the walk; replacement values are computed afterwards, possibly
//!    suspending, always against the pristine original tree.
//! 3. **Substitute once**: all replacements land in a single structural
//!    pass, so no pending edit is ever invalidated by an earlier one.
//! 4. **All or nothing**: a document either rewrites completely or fails;
//!    there is no partial tree and no partial write.

mod batcher;
mod context;
mod dispatcher;
mod document;
mod edits;
mod errors;
mod handler;
mod imports;
mod persist;
mod plugin;

pub use context::ExpressionContext;
pub use dispatcher::Dispatcher;
pub use document::Document;
pub use edits::{EditSink, PendingEdits};
pub use errors::{PluginPhase, RewriteError};
pub use handler::{RewriteHandler, RewriteOutcome};
pub use imports::normalize_imports;
pub use persist::PersistOutcome;
pub use plugin::RewritePlugin;

// Re-export the provider surface plugins program against.
pub use treescribe_syntax::{
    ElementId, IdGenerator, NodeKind, SemanticModel, Symbol, SymbolKind, SyntaxElement, SyntaxNode,
    SyntaxToken, SyntaxTree, SyntaxTrivia, TokenKind, TriviaKind,
};
