//! Construction helpers for synthesizing replacement elements.
//!
//! Rewrite policies use these to build the values they hand back during
//! resolution; the import normalizer uses them to append missing using
//! directives. Synthesized identities come from the caller's generator
//! and are replaced wholesale when the substituted tree is rebuilt.

use crate::id_generator::IdGenerator;
use crate::kind::{NodeKind, TokenKind, TriviaKind};
use crate::tree::{SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTrivia};

pub fn trivia(ids: &mut IdGenerator, kind: TriviaKind, text: impl Into<String>) -> SyntaxTrivia {
    SyntaxTrivia {
        id: ids.next_id(),
        kind,
        text: text.into(),
    }
}

pub fn token(ids: &mut IdGenerator, kind: TokenKind, text: impl Into<String>) -> SyntaxToken {
    SyntaxToken {
        id: ids.next_id(),
        kind,
        text: text.into(),
        leading: Vec::new(),
        trailing: Vec::new(),
    }
}

pub fn identifier_name(ids: &mut IdGenerator, text: impl Into<String>) -> SyntaxNode {
    let mut node = SyntaxNode::new(NodeKind::IdentifierName, ids.next_id());
    let ident = token(ids, TokenKind::Identifier, text);
    node.children.push(SyntaxElement::Token(ident));
    node
}

pub fn numeric_literal(ids: &mut IdGenerator, text: impl Into<String>) -> SyntaxNode {
    let mut node = SyntaxNode::new(NodeKind::LiteralExpression, ids.next_id());
    let literal = token(ids, TokenKind::NumericLiteral, text);
    node.children.push(SyntaxElement::Token(literal));
    node
}

/// Build a `QualifiedName` from a dotted string like `"Vendor.Utilities"`.
pub fn qualified_name(ids: &mut IdGenerator, dotted: &str) -> SyntaxNode {
    let mut node = SyntaxNode::new(NodeKind::QualifiedName, ids.next_id());

    for (index, part) in dotted.split('.').enumerate() {
        if index > 0 {
            let dot = token(ids, TokenKind::Dot, ".");
            node.children.push(SyntaxElement::Token(dot));
        }
        let ident = token(ids, TokenKind::Identifier, part);
        node.children.push(SyntaxElement::Token(ident));
    }

    node
}

/// Build a complete `using <name>;` directive ending in a newline.
pub fn using_directive(ids: &mut IdGenerator, dotted: &str) -> SyntaxNode {
    let mut node = SyntaxNode::new(NodeKind::UsingDirective, ids.next_id());

    let mut using = token(ids, TokenKind::UsingKeyword, "using");
    using
        .trailing
        .push(trivia(ids, TriviaKind::Whitespace, " "));
    node.children.push(SyntaxElement::Token(using));

    let name = qualified_name(ids, dotted);
    node.children.push(SyntaxElement::Node(name));

    let mut semicolon = token(ids, TokenKind::Semicolon, ";");
    semicolon
        .trailing
        .push(trivia(ids, TriviaKind::EndOfLine, "\n"));
    node.children.push(SyntaxElement::Token(semicolon));

    node
}
