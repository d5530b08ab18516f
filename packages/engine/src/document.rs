//! # Document Handle
//!
//! One source file as seen by the rewrite engine. A document can be:
//! - **File-backed**: loaded from disk (encoding-sniffed on read) and
//!   eligible for write-back through the persistence gate.
//! - **Memory-backed**: source text only; rewrites that change it are
//!   reported but never persisted.
//!
//! The syntax tree and semantic model are produced lazily, once, and
//! shared; both are bound to the single tree version this document holds
//! for the duration of one rewrite.

use crate::errors::RewriteError;
use crate::persist::decode_bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use treescribe_syntax::{SemanticModel, SyntaxTree};

pub struct Document {
    path: Option<PathBuf>,
    source: String,
    tree: OnceCell<Arc<SyntaxTree>>,
    model: OnceCell<Arc<SemanticModel>>,
}

impl Document {
    /// Memory-backed document (tests, scratch buffers).
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            path: None,
            source: source.into(),
            tree: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    /// File-backed document. The file's bytes are decoded with the same
    /// encoding detection the persistence gate uses at write time.
    pub fn load(path: PathBuf) -> Result<Self, RewriteError> {
        let bytes = std::fs::read(&path)?;
        Ok(Self {
            source: decode_bytes(&bytes),
            path: Some(path),
            tree: OnceCell::new(),
            model: OnceCell::new(),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifier used in logs and error reports.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }

    /// The document's syntax tree, parsed on first access.
    pub async fn syntax_tree(&self) -> Result<Arc<SyntaxTree>, RewriteError> {
        self.tree
            .get_or_try_init(|| async {
                let name = self.display_name();
                let tree = SyntaxTree::parse(&self.source, &name).map_err(|source| {
                    RewriteError::MissingSyntaxRoot { path: name, source }
                })?;
                Ok(Arc::new(tree))
            })
            .await
            .map(Arc::clone)
    }

    /// The semantic model for this document's tree version.
    ///
    /// A document that fails to parse surfaces its parse error here
    /// unchanged; `MissingSemanticModel` is reserved for binding
    /// failure against a good tree.
    pub async fn semantic_model(&self) -> Result<Arc<SemanticModel>, RewriteError> {
        let tree = self.syntax_tree().await?;

        self.model
            .get_or_try_init(|| async { Ok::<_, RewriteError>(Arc::new(SemanticModel::bind(&tree))) })
            .await
            .map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_document_parses_lazily() {
        let doc = Document::from_source("class C { }");
        assert!(doc.path().is_none());

        let tree = doc.syntax_tree().await.unwrap();
        assert_eq!(tree.to_source_text(), "class C { }");

        // Second access returns the same version.
        let again = doc.syntax_tree().await.unwrap();
        assert_eq!(tree.version(), again.version());
    }

    #[tokio::test]
    async fn test_unparseable_document_has_no_syntax_root() {
        let doc = Document::from_source("class {");
        let err = doc.syntax_tree().await.unwrap_err();
        assert!(matches!(err, RewriteError::MissingSyntaxRoot { .. }));
    }

    #[tokio::test]
    async fn test_semantic_model_surfaces_the_parse_error() {
        let doc = Document::from_source("class {");
        let err = doc.semantic_model().await.unwrap_err();
        assert!(matches!(err, RewriteError::MissingSyntaxRoot { .. }));
    }

    #[tokio::test]
    async fn test_semantic_model_matches_tree_version() {
        let doc = Document::from_source("class C { void M() { var x = 1; } }");
        let tree = doc.syntax_tree().await.unwrap();
        let model = doc.semantic_model().await.unwrap();
        assert!(model.is_valid_for(&tree));
    }
}
