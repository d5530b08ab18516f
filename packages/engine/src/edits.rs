//! # Pending-Edit Registry
//!
//! Deduplicated record of "this plugin wants to replace this original
//! element", scoped to one document and discarded after its batch.
//!
//! Three independent collections, one per element kind, each keyed by
//! (plugin, original element). Registration is idempotent: a duplicate
//! key contributes nothing, which is what lets a plugin flag the same
//! element from several visit calls without ever paying a second
//! resolution. Insertion order is preserved so resolution order — and
//! therefore the last-write-wins outcome for overlapping plugins — is
//! deterministic for a fixed installation order.

use std::collections::HashSet;
use treescribe_syntax::{ElementId, SyntaxNode, SyntaxToken, SyntaxTrivia};

pub(crate) type PluginIndex = usize;

/// Everything the traversal accumulated for one document.
#[derive(Debug, Default)]
pub struct PendingEdits {
    node_edits: Vec<(PluginIndex, SyntaxNode)>,
    token_edits: Vec<(PluginIndex, SyntaxToken)>,
    trivia_edits: Vec<(PluginIndex, SyntaxTrivia)>,

    seen_nodes: HashSet<(PluginIndex, ElementId)>,
    seen_tokens: HashSet<(PluginIndex, ElementId)>,
    seen_trivia: HashSet<(PluginIndex, ElementId)>,

    required_imports: Vec<String>,
}

impl PendingEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no plugin flagged any element of any kind.
    pub fn has_replacements(&self) -> bool {
        !self.node_edits.is_empty() || !self.token_edits.is_empty() || !self.trivia_edits.is_empty()
    }

    pub(crate) fn node_edits(&self) -> &[(PluginIndex, SyntaxNode)] {
        &self.node_edits
    }

    pub(crate) fn token_edits(&self) -> &[(PluginIndex, SyntaxToken)] {
        &self.token_edits
    }

    pub(crate) fn trivia_edits(&self) -> &[(PluginIndex, SyntaxTrivia)] {
        &self.trivia_edits
    }

    /// Required import names, deduplicated, first-request order.
    pub fn required_imports(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.required_imports
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    fn register_node(&mut self, plugin: PluginIndex, node: &SyntaxNode) {
        if self.seen_nodes.insert((plugin, node.id.clone())) {
            self.node_edits.push((plugin, node.clone()));
        }
    }

    fn register_token(&mut self, plugin: PluginIndex, token: &SyntaxToken) {
        if self.seen_tokens.insert((plugin, token.id.clone())) {
            self.token_edits.push((plugin, token.clone()));
        }
    }

    fn register_trivia(&mut self, plugin: PluginIndex, trivia: &SyntaxTrivia) {
        if self.seen_trivia.insert((plugin, trivia.id.clone())) {
            self.trivia_edits.push((plugin, trivia.clone()));
        }
    }

    fn require_import(&mut self, name: String) {
        self.required_imports.push(name);
    }
}

/// Registration handle a plugin writes through during `visit`.
///
/// Binds the registry to the plugin's installation index so the
/// dedup key is always (plugin, element) without the plugin having to
/// know its own position.
pub struct EditSink<'a> {
    plugin: PluginIndex,
    edits: &'a mut PendingEdits,
}

impl<'a> EditSink<'a> {
    pub(crate) fn new(plugin: PluginIndex, edits: &'a mut PendingEdits) -> Self {
        Self { plugin, edits }
    }

    /// Flag a node of the original tree for replacement.
    pub fn replace_node(&mut self, original: &SyntaxNode) {
        self.edits.register_node(self.plugin, original);
    }

    /// Flag a token of the original tree for replacement.
    pub fn replace_token(&mut self, original: &SyntaxToken) {
        self.edits.register_token(self.plugin, original);
    }

    /// Flag a trivia unit of the original tree for replacement.
    pub fn replace_trivia(&mut self, original: &SyntaxTrivia) {
        self.edits.register_trivia(self.plugin, original);
    }

    /// Demand an import declaration in the rewritten unit.
    pub fn require_import(&mut self, name: impl Into<String>) {
        self.edits.require_import(name.into());
    }
}
