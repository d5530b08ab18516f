//! # Rename Policy
//!
//! Renames identifiers according to a configured rule set. A rule maps an
//! old name to a new one and may carry the namespace the new name lives
//! under; the engine's import normalizer appends that namespace when the
//! rename actually fires.

use anyhow::Context as _;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use treescribe_engine::{
    EditSink, ExpressionContext, RewritePlugin, SemanticModel, SyntaxElement, SyntaxNode, TokenKind,
};

/// One configured rename.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
    /// Namespace to import when this rule fires.
    #[serde(default)]
    pub import: Option<String>,
}

pub struct RenamePolicy {
    rules: HashMap<String, RenameRule>,
}

impl RenamePolicy {
    pub fn new(rules: Vec<RenameRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| (rule.from.clone(), rule))
            .collect();
        Self { rules }
    }

    /// Load rules from a JSON array of `{ "from", "to", "import"? }`.
    pub fn from_json(config: &str) -> anyhow::Result<Self> {
        let rules: Vec<RenameRule> =
            serde_json::from_str(config).context("invalid rename policy config")?;
        Ok(Self::new(rules))
    }

    fn rule_for(&self, node: &SyntaxNode) -> Option<&RenameRule> {
        node.identifier_text().and_then(|name| self.rules.get(name))
    }
}

#[async_trait]
impl RewritePlugin for RenamePolicy {
    fn name(&self) -> &str {
        "rename"
    }

    fn visit(
        &self,
        node: &SyntaxNode,
        context: ExpressionContext,
        _model: &SemanticModel,
        edits: &mut EditSink<'_>,
    ) -> anyhow::Result<()> {
        if context != ExpressionContext::IdentifierName {
            return Ok(());
        }

        if let Some(rule) = self.rule_for(node) {
            tracing::debug!(from = %rule.from, to = %rule.to, "flagging identifier for rename");
            edits.replace_node(node);
            if let Some(import) = &rule.import {
                edits.require_import(import);
            }
        }
        Ok(())
    }

    async fn resolve_node(&self, original: &SyntaxNode) -> anyhow::Result<SyntaxNode> {
        let rule = self
            .rule_for(original)
            .context("flagged identifier has no matching rename rule")?;

        let mut replacement = original.clone();
        for child in &mut replacement.children {
            if let SyntaxElement::Token(token) = child {
                if token.kind == TokenKind::Identifier {
                    *token = token.with_text(rule.to.clone());
                }
            }
        }
        Ok(replacement)
    }
}
