//! # Substitution Batcher
//!
//! Turns a registry of pending edits into a new tree version in two
//! strictly separated phases:
//!
//! 1. **Resolve**: ask each owning plugin for the replacement value of
//!    every flagged element. Every resolution sees the element exactly as
//!    it exists in the pristine original tree, so resolutions are
//!    independent of each other and run concurrently — across the three
//!    element kinds and within each kind.
//! 2. **Substitute**: apply all three original→replacement maps to the
//!    original tree in a single structural pass. One pass is the point:
//!    applying edits one at a time would rebuild (and re-identify) every
//!    subtree above each edit, invalidating any pending key that lives
//!    inside an already-rewritten region.
//!
//! Any failed resolution fails the whole batch; no partial tree exists.

use crate::edits::PendingEdits;
use crate::errors::{PluginPhase, RewriteError};
use crate::plugin::RewritePlugin;
use futures::future::{try_join3, try_join_all};
use std::collections::HashMap;
use std::sync::Arc;
use treescribe_syntax::{
    ElementId, SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTree, SyntaxTrivia,
};

struct ReplacementMaps {
    nodes: HashMap<ElementId, SyntaxNode>,
    tokens: HashMap<ElementId, SyntaxToken>,
    trivia: HashMap<ElementId, SyntaxTrivia>,
}

/// Resolve every pending edit and substitute all of them at once,
/// producing the next tree version.
pub(crate) async fn substitute_all(
    tree: &SyntaxTree,
    edits: &PendingEdits,
    plugins: &[Arc<dyn RewritePlugin>],
) -> Result<SyntaxTree, RewriteError> {
    let maps = resolve_all(edits, plugins).await?;
    let new_root = substitute_node(tree.root(), &maps);
    Ok(tree.rebuild(new_root))
}

async fn resolve_all(
    edits: &PendingEdits,
    plugins: &[Arc<dyn RewritePlugin>],
) -> Result<ReplacementMaps, RewriteError> {
    let node_futures = edits.node_edits().iter().map(|(index, original)| {
        let plugin = Arc::clone(&plugins[*index]);
        async move {
            let replacement = plugin
                .resolve_node(original)
                .await
                .map_err(|source| resolve_failure(plugin.name(), source))?;
            Ok::<_, RewriteError>((original.id.clone(), replacement))
        }
    });

    let token_futures = edits.token_edits().iter().map(|(index, original)| {
        let plugin = Arc::clone(&plugins[*index]);
        async move {
            let replacement = plugin
                .resolve_token(original)
                .await
                .map_err(|source| resolve_failure(plugin.name(), source))?;
            Ok::<_, RewriteError>((original.id.clone(), replacement))
        }
    });

    let trivia_futures = edits.trivia_edits().iter().map(|(index, original)| {
        let plugin = Arc::clone(&plugins[*index]);
        async move {
            let replacement = plugin
                .resolve_trivia(original)
                .await
                .map_err(|source| resolve_failure(plugin.name(), source))?;
            Ok::<_, RewriteError>((original.id.clone(), replacement))
        }
    });

    // The three kinds have no ordering dependency; within a kind the
    // uniqueness key already guarantees no element appears twice.
    let (nodes, tokens, trivia) = try_join3(
        try_join_all(node_futures),
        try_join_all(token_futures),
        try_join_all(trivia_futures),
    )
    .await?;

    // Collapsing into per-element maps in registration order makes the
    // winner deterministic when two plugins flagged the same element.
    Ok(ReplacementMaps {
        nodes: nodes.into_iter().collect(),
        tokens: tokens.into_iter().collect(),
        trivia: trivia.into_iter().collect(),
    })
}

fn resolve_failure(plugin: &str, source: anyhow::Error) -> RewriteError {
    RewriteError::Plugin {
        plugin: plugin.to_string(),
        phase: PluginPhase::Resolve,
        source,
    }
}

/// One pre-order pass over the original tree. A node matched by the node
/// map is replaced wholesale (its interior edits, if any, were computed
/// against the original and are superseded); everything else is rebuilt
/// around substituted children. Elements absent from all three maps pass
/// through unchanged.
fn substitute_node(node: &SyntaxNode, maps: &ReplacementMaps) -> SyntaxNode {
    if let Some(replacement) = maps.nodes.get(&node.id) {
        return replacement.clone();
    }

    SyntaxNode {
        id: node.id.clone(),
        kind: node.kind,
        children: node
            .children
            .iter()
            .map(|child| match child {
                SyntaxElement::Node(inner) => SyntaxElement::Node(substitute_node(inner, maps)),
                SyntaxElement::Token(token) => SyntaxElement::Token(substitute_token(token, maps)),
            })
            .collect(),
    }
}

fn substitute_token(token: &SyntaxToken, maps: &ReplacementMaps) -> SyntaxToken {
    if let Some(replacement) = maps.tokens.get(&token.id) {
        return replacement.clone();
    }

    SyntaxToken {
        id: token.id.clone(),
        kind: token.kind,
        text: token.text.clone(),
        leading: substitute_trivia(&token.leading, maps),
        trailing: substitute_trivia(&token.trailing, maps),
    }
}

fn substitute_trivia(trivia: &[SyntaxTrivia], maps: &ReplacementMaps) -> Vec<SyntaxTrivia> {
    trivia
        .iter()
        .map(|unit| maps.trivia.get(&unit.id).unwrap_or(unit).clone())
        .collect()
}
