//! # Visitor Dispatcher
//!
//! One depth-first, pre-order traversal per document. Every node whose
//! kind classifies into an [`ExpressionContext`] is offered to each
//! installed plugin, synchronously and in installation order. The
//! dispatcher never mutates the tree; plugins signal intent by writing
//! into the pending-edit registry through their [`EditSink`].
//!
//! A failing visit call aborts the whole document — whether that takes
//! down a batch of documents is the orchestrating caller's decision.

use crate::context::ExpressionContext;
use crate::edits::{EditSink, PendingEdits};
use crate::errors::{PluginPhase, RewriteError};
use crate::plugin::RewritePlugin;
use std::sync::Arc;
use treescribe_syntax::{SemanticModel, SyntaxNode};

pub struct Dispatcher<'a> {
    plugins: &'a [Arc<dyn RewritePlugin>],
    model: &'a SemanticModel,
    edits: PendingEdits,
}

impl<'a> Dispatcher<'a> {
    pub fn new(plugins: &'a [Arc<dyn RewritePlugin>], model: &'a SemanticModel) -> Self {
        Self {
            plugins,
            model,
            edits: PendingEdits::new(),
        }
    }

    /// Walk the tree once and collect every pending edit and required
    /// import the plugins register.
    pub fn run(mut self, root: &SyntaxNode) -> Result<PendingEdits, RewriteError> {
        self.visit_node(root)?;
        Ok(self.edits)
    }

    fn visit_node(&mut self, node: &SyntaxNode) -> Result<(), RewriteError> {
        if let Some(context) = ExpressionContext::classify(node.kind) {
            for (index, plugin) in self.plugins.iter().enumerate() {
                let mut sink = EditSink::new(index, &mut self.edits);
                plugin
                    .visit(node, context, self.model, &mut sink)
                    .map_err(|source| RewriteError::Plugin {
                        plugin: plugin.name().to_string(),
                        phase: PluginPhase::Visit,
                        source,
                    })?;
            }
        }

        for child in node.child_nodes() {
            self.visit_node(child)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every (context, text) pair it is offered.
    struct RecordingPlugin {
        seen: Mutex<Vec<(ExpressionContext, String)>>,
    }

    impl RewritePlugin for RecordingPlugin {
        fn name(&self) -> &str {
            "recording"
        }

        fn visit(
            &self,
            node: &SyntaxNode,
            context: ExpressionContext,
            _model: &SemanticModel,
            _edits: &mut EditSink<'_>,
        ) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push((context, node.resolved_text()));
            Ok(())
        }
    }

    struct FailingPlugin;

    impl RewritePlugin for FailingPlugin {
        fn name(&self) -> &str {
            "failing"
        }

        fn visit(
            &self,
            _node: &SyntaxNode,
            _context: ExpressionContext,
            _model: &SemanticModel,
            _edits: &mut EditSink<'_>,
        ) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }
    }

    #[test]
    fn test_traversal_routes_categorized_nodes_in_order() {
        let tree = treescribe_syntax::SyntaxTree::parse(
            "using System;\nclass C { void M() { x = 2; } }",
            "/t.cs",
        )
        .unwrap();
        let model = SemanticModel::bind(&tree);

        let plugin = Arc::new(RecordingPlugin {
            seen: Mutex::new(Vec::new()),
        });
        let plugins: Vec<Arc<dyn RewritePlugin>> = vec![plugin.clone()];

        let edits = Dispatcher::new(&plugins, &model).run(tree.root()).unwrap();
        assert!(!edits.has_replacements());

        let seen = plugin.seen.lock().unwrap();
        let contexts: Vec<_> = seen.iter().map(|(c, _)| *c).collect();
        // Pre-order: using, method, assignment, then the identifier
        // inside the assignment's left side.
        assert_eq!(
            contexts,
            vec![
                ExpressionContext::UsingDirective,
                ExpressionContext::MethodDeclaration,
                ExpressionContext::Assignment,
                ExpressionContext::IdentifierName,
            ]
        );
    }

    #[test]
    fn test_failing_visit_aborts_the_document() {
        let tree =
            treescribe_syntax::SyntaxTree::parse("class C { void M() { } }", "/t.cs").unwrap();
        let model = SemanticModel::bind(&tree);

        let plugins: Vec<Arc<dyn RewritePlugin>> = vec![Arc::new(FailingPlugin)];
        let err = Dispatcher::new(&plugins, &model)
            .run(tree.root())
            .unwrap_err();

        assert!(matches!(
            err,
            RewriteError::Plugin {
                phase: PluginPhase::Visit,
                ..
            }
        ));
    }
}
