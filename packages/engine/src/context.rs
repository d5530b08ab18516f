use serde::{Deserialize, Serialize};
use treescribe_syntax::NodeKind;

/// Closed set of syntactic categories the dispatcher routes to plugins.
///
/// Dispatch is a single table lookup from node kind to tag; adding a
/// category means adding a tag and a match arm here, not a new trait
/// method on every plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionContext {
    AnonymousMethod,
    Assignment,
    IdentifierName,
    Invocation,
    MemberAccess,
    MethodDeclaration,
    UsingDirective,
}

impl ExpressionContext {
    /// Category tag for a node kind, or `None` when the dispatcher
    /// passes over the node without consulting plugins.
    pub fn classify(kind: NodeKind) -> Option<ExpressionContext> {
        match kind {
            NodeKind::AnonymousMethodExpression => Some(ExpressionContext::AnonymousMethod),
            NodeKind::AssignmentExpression => Some(ExpressionContext::Assignment),
            NodeKind::IdentifierName => Some(ExpressionContext::IdentifierName),
            NodeKind::InvocationExpression => Some(ExpressionContext::Invocation),
            NodeKind::MemberAccessExpression => Some(ExpressionContext::MemberAccess),
            NodeKind::MethodDeclaration => Some(ExpressionContext::MethodDeclaration),
            NodeKind::UsingDirective => Some(ExpressionContext::UsingDirective),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_covers_the_seven_categories() {
        let classified = [
            NodeKind::AnonymousMethodExpression,
            NodeKind::AssignmentExpression,
            NodeKind::IdentifierName,
            NodeKind::InvocationExpression,
            NodeKind::MemberAccessExpression,
            NodeKind::MethodDeclaration,
            NodeKind::UsingDirective,
        ];
        for kind in classified {
            assert!(ExpressionContext::classify(kind).is_some(), "{:?}", kind);
        }

        assert!(ExpressionContext::classify(NodeKind::SourceUnit).is_none());
        assert!(ExpressionContext::classify(NodeKind::Block).is_none());
        assert!(ExpressionContext::classify(NodeKind::LiteralExpression).is_none());
    }
}
