use crate::context::ExpressionContext;
use crate::edits::EditSink;
use async_trait::async_trait;
use treescribe_syntax::{SemanticModel, SyntaxNode, SyntaxToken, SyntaxTrivia};

/// Capability surface every rewrite policy implements.
///
/// One plugin instance serves every document in a run, and documents are
/// processed in parallel, so implementations must be stateless or
/// internally synchronized (`Send + Sync` is enforced here).
///
/// The contract deliberately splits deciding from computing:
///
/// - [`visit`](RewritePlugin::visit) runs synchronously during the single
///   read-only traversal. Its only side channel is the [`EditSink`]:
///   flag elements for replacement, demand imports. Flagging the same
///   element twice is safe; registration is idempotent.
/// - The `resolve_*` capabilities run after the traversal, may suspend,
///   and are invoked exactly once per unique (plugin, element) pair per
///   document. They always receive the element from the pristine original
///   tree, never from a partially rewritten one.
///
/// When several plugins flag the identical element, each resolves
/// independently but the final per-kind map is keyed by the element
/// alone, so the plugin resolved last wins. With a fixed installation
/// order the winner is deterministic, but no priority is defined; avoid
/// overlapping targets between plugins.
#[async_trait]
pub trait RewritePlugin: Send + Sync {
    /// Stable name used in logs and error reports.
    fn name(&self) -> &str;

    /// Inspect one categorized element during the read-only traversal.
    fn visit(
        &self,
        node: &SyntaxNode,
        context: ExpressionContext,
        model: &SemanticModel,
        edits: &mut EditSink<'_>,
    ) -> anyhow::Result<()>;

    /// Compute the replacement for a node this plugin flagged.
    async fn resolve_node(&self, original: &SyntaxNode) -> anyhow::Result<SyntaxNode> {
        anyhow::bail!(
            "plugin \"{}\" registered a node edit but does not resolve nodes (element {})",
            self.name(),
            original.id
        )
    }

    /// Compute the replacement for a token this plugin flagged.
    async fn resolve_token(&self, original: &SyntaxToken) -> anyhow::Result<SyntaxToken> {
        anyhow::bail!(
            "plugin \"{}\" registered a token edit but does not resolve tokens (element {})",
            self.name(),
            original.id
        )
    }

    /// Compute the replacement for a trivia unit this plugin flagged.
    async fn resolve_trivia(&self, original: &SyntaxTrivia) -> anyhow::Result<SyntaxTrivia> {
        anyhow::bail!(
            "plugin \"{}\" registered a trivia edit but does not resolve trivia (element {})",
            self.name(),
            original.id
        )
    }
}
