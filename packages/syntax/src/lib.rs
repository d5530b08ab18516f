//! # Treescribe Syntax
//!
//! Lossless syntax tree provider for the Treescribe rewrite engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tokenizer: source text → lexemes + trivia   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: lexemes → immutable green tree      │
//! │  - every byte of input lands in the tree    │
//! │  - element IDs valid for one tree version   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ semantic: tree version → symbol bindings    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! One parse produces one tree version. Rebuilding a tree (after a batch
//! of substitutions) produces a wholly new version with fresh element
//! identities; a `SemanticModel` bound to the old version goes stale.

pub mod error;
pub mod factory;
mod id_generator;
pub mod kind;
pub mod parser;
pub mod semantic;
pub mod tokenizer;
pub mod tree;

pub use error::{ParseError, ParseResult};
pub use id_generator::{document_id, IdGenerator};
pub use kind::{NodeKind, TokenKind, TriviaKind};
pub use parser::Parser;
pub use semantic::{SemanticModel, Symbol, SymbolKind};
pub use tokenizer::{lex, Lexeme};
pub use tree::{ElementId, SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTree, SyntaxTrivia};
