//! # Treescribe Policies
//!
//! Built-in rewrite plugins for the treescribe engine. Each policy is an
//! ordinary [`RewritePlugin`](treescribe_engine::RewritePlugin): it flags
//! elements during the engine's single traversal and computes replacements
//! when the batcher asks.
//!
//! - [`RenamePolicy`]: config-driven identifier renames, optionally
//!   pulling in the import the new name lives under.
//! - [`CommentSpacingPolicy`]: normalizes `//comment` to `// comment`.

mod comments;
mod rename;

pub use comments::CommentSpacingPolicy;
pub use rename::{RenamePolicy, RenameRule};
