//! # Comment Spacing Policy
//!
//! Normalizes line comments so the text is separated from the slashes:
//! `//note` becomes `// note`. Comments that already have the space, bare
//! `//` markers and `///` doc comments are left alone.
//!
//! Plugins only see categorized nodes, so this policy reaches exactly the
//! comments attached under a using directive, a method declaration or an
//! expression context. A comment elsewhere (say, inside an empty class
//! body with no methods) is never offered to the policy and stays as is.

use async_trait::async_trait;
use treescribe_engine::{
    EditSink, ExpressionContext, RewritePlugin, SemanticModel, SyntaxNode, SyntaxTrivia, TriviaKind,
};

pub struct CommentSpacingPolicy;

fn needs_space(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("//") else {
        return false;
    };
    match rest.chars().next() {
        Some(first) => first != ' ' && first != '/' && first != '!',
        None => false,
    }
}

#[async_trait]
impl RewritePlugin for CommentSpacingPolicy {
    fn name(&self) -> &str {
        "comment-spacing"
    }

    fn visit(
        &self,
        node: &SyntaxNode,
        _context: ExpressionContext,
        _model: &SemanticModel,
        edits: &mut EditSink<'_>,
    ) -> anyhow::Result<()> {
        // The same comment is seen from every enclosing categorized node;
        // the registry collapses the duplicates to one pending edit.
        for token in node.descendant_tokens() {
            for trivia in token.leading.iter().chain(&token.trailing) {
                if trivia.kind == TriviaKind::LineComment && needs_space(&trivia.text) {
                    edits.replace_trivia(trivia);
                }
            }
        }
        Ok(())
    }

    async fn resolve_trivia(&self, original: &SyntaxTrivia) -> anyhow::Result<SyntaxTrivia> {
        let body = original
            .text
            .strip_prefix("//")
            .unwrap_or(&original.text);

        let mut replacement = original.clone();
        replacement.text = format!("// {}", body);
        Ok(replacement)
    }
}
