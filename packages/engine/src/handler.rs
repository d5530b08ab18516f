//! # Rewrite Handler
//!
//! Owns the installed plugin set and runs the full pipeline for one
//! document: traverse → resolve → substitute → reconcile imports →
//! persist. Each stage consumes the previous stage's output; nothing
//! here retries, and a failure at any stage is the document's failure.

use crate::batcher::substitute_all;
use crate::dispatcher::Dispatcher;
use crate::document::Document;
use crate::errors::RewriteError;
use crate::imports::normalize_imports;
use crate::persist::{persist, PersistOutcome};
use crate::plugin::RewritePlugin;
use std::sync::Arc;
use treescribe_syntax::NodeKind;

/// What happened to one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No plugin changed anything; no I/O occurred.
    Unchanged,
    /// The tree changed; `persisted` says whether a backing file was
    /// rewritten (memory-backed documents change without I/O).
    Rewritten { persisted: bool },
}

#[derive(Default)]
pub struct RewriteHandler {
    plugins: Vec<Arc<dyn RewritePlugin>>,
}

impl RewriteHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a rewrite plugin. Installation order is visit order, and
    /// it also fixes the winner when plugins target the same element.
    pub fn install_plugin(&mut self, plugin: Arc<dyn RewritePlugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> &[Arc<dyn RewritePlugin>] {
        &self.plugins
    }

    /// Run the whole pipeline for one document.
    pub async fn rewrite_document(&self, doc: &Document) -> Result<RewriteOutcome, RewriteError> {
        let tree = doc.syntax_tree().await?;
        let model = doc.semantic_model().await?;

        let edits = Dispatcher::new(&self.plugins, &model).run(tree.root())?;
        let required_imports = edits.required_imports();

        let rewritten = if edits.has_replacements() {
            substitute_all(&tree, &edits, &self.plugins).await?
        } else {
            tree.as_ref().clone()
        };

        if rewritten.root().kind != NodeKind::SourceUnit {
            return Err(RewriteError::InvalidRewriteResult {
                kind: rewritten.root().kind,
            });
        }

        let rewritten = if required_imports.is_empty() {
            rewritten
        } else {
            let mut ids = rewritten.replacement_ids();
            let (unit, changed) =
                normalize_imports(rewritten.root().clone(), &required_imports, &mut ids);
            if changed {
                rewritten.rebuild(unit)
            } else {
                rewritten
            }
        };

        tracing::debug!(
            document = %doc.display_name(),
            "rewrite pipeline complete, gating persistence"
        );

        match persist(&tree, &rewritten, doc.path())? {
            PersistOutcome::Unchanged => Ok(RewriteOutcome::Unchanged),
            PersistOutcome::ChangedInMemory => Ok(RewriteOutcome::Rewritten { persisted: false }),
            PersistOutcome::Written => Ok(RewriteOutcome::Rewritten { persisted: true }),
        }
    }
}
