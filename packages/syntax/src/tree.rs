//! # Green Tree
//!
//! Immutable, lossless syntax tree. Every byte of the parsed source is
//! held by some token or trivia unit, so rendering a tree reproduces its
//! source text exactly.
//!
//! Identity model: every element (node, token, trivia) carries a string
//! ID that is unique within one tree version. A batch substitution never
//! edits a tree in place; it rebuilds a new root and re-identifies every
//! element under a bumped generation, so stale IDs can never alias into
//! the new version.

use crate::error::ParseResult;
use crate::id_generator::IdGenerator;
use crate::kind::{NodeKind, TokenKind, TriviaKind};
use serde::{Deserialize, Serialize};

/// Identity of one element within one tree version.
pub type ElementId = String;

/// Whitespace or comment attached to a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxTrivia {
    pub id: ElementId,
    pub kind: TriviaKind,
    pub text: String,
}

/// Terminal token with its leading and trailing trivia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxToken {
    pub id: ElementId,
    pub kind: TokenKind,
    pub text: String,
    pub leading: Vec<SyntaxTrivia>,
    pub trailing: Vec<SyntaxTrivia>,
}

/// Non-terminal node; children are nodes and tokens in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub id: ElementId,
    pub kind: NodeKind,
    pub children: Vec<SyntaxElement>,
}

/// One child slot of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxToken {
    /// Copy of this token with different text, trivia preserved.
    pub fn with_text(&self, text: impl Into<String>) -> SyntaxToken {
        SyntaxToken {
            id: self.id.clone(),
            kind: self.kind,
            text: text.into(),
            leading: self.leading.clone(),
            trailing: self.trailing.clone(),
        }
    }

    pub fn write_text(&self, out: &mut String) {
        for trivia in &self.leading {
            out.push_str(&trivia.text);
        }
        out.push_str(&self.text);
        for trivia in &self.trailing {
            out.push_str(&trivia.text);
        }
    }

    fn is_equivalent_to(&self, other: &SyntaxToken) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && trivia_equivalent(&self.leading, &other.leading)
            && trivia_equivalent(&self.trailing, &other.trailing)
    }

    fn with_fresh_ids(&self, ids: &mut IdGenerator) -> SyntaxToken {
        SyntaxToken {
            id: ids.next_id(),
            kind: self.kind,
            text: self.text.clone(),
            leading: self.leading.iter().map(|t| t.with_fresh_id(ids)).collect(),
            trailing: self.trailing.iter().map(|t| t.with_fresh_id(ids)).collect(),
        }
    }
}

impl SyntaxTrivia {
    fn with_fresh_id(&self, ids: &mut IdGenerator) -> SyntaxTrivia {
        SyntaxTrivia {
            id: ids.next_id(),
            kind: self.kind,
            text: self.text.clone(),
        }
    }
}

fn trivia_equivalent(a: &[SyntaxTrivia], b: &[SyntaxTrivia]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.kind == y.kind && x.text == y.text)
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, id: ElementId) -> Self {
        Self {
            id,
            kind,
            children: Vec::new(),
        }
    }

    /// Direct child nodes, in source order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        })
    }

    /// Direct child tokens, in source order.
    pub fn child_tokens(&self) -> impl Iterator<Item = &SyntaxToken> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Token(token) => Some(token),
            SyntaxElement::Node(_) => None,
        })
    }

    /// First direct child node of the given kind.
    pub fn find_node(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    /// First direct child token of the given kind.
    pub fn find_token(&self, kind: TokenKind) -> Option<&SyntaxToken> {
        self.child_tokens().find(|token| token.kind == kind)
    }

    /// All tokens under this node, pre-order.
    pub fn descendant_tokens(&self) -> Vec<&SyntaxToken> {
        let mut tokens = Vec::new();
        collect_tokens(self, &mut tokens);
        tokens
    }

    /// All nodes under this node (excluding itself), pre-order.
    pub fn descendant_nodes(&self) -> Vec<&SyntaxNode> {
        let mut nodes = Vec::new();
        collect_nodes(self, &mut nodes);
        nodes
    }

    /// For an `IdentifierName` node, the identifier text.
    pub fn identifier_text(&self) -> Option<&str> {
        match self.kind {
            NodeKind::IdentifierName => self
                .find_token(TokenKind::Identifier)
                .map(|token| token.text.as_str()),
            _ => None,
        }
    }

    /// Token text of this subtree with all trivia stripped.
    ///
    /// This is the resolved form used when comparing names: `A . B` and
    /// `A.B` collapse to the same string.
    pub fn resolved_text(&self) -> String {
        let mut out = String::new();
        for token in self.descendant_tokens() {
            out.push_str(&token.text);
        }
        out
    }

    pub fn write_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.write_text(out),
                SyntaxElement::Token(token) => token.write_text(out),
            }
        }
    }

    /// Full source text of this subtree, trivia included.
    pub fn to_source_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    /// Structural equivalence: same kinds, token text and trivia text,
    /// element identities ignored.
    pub fn is_equivalent_to(&self, other: &SyntaxNode) -> bool {
        self.kind == other.kind
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| match (a, b) {
                    (SyntaxElement::Node(x), SyntaxElement::Node(y)) => x.is_equivalent_to(y),
                    (SyntaxElement::Token(x), SyntaxElement::Token(y)) => x.is_equivalent_to(y),
                    _ => false,
                })
    }

    /// Deep copy with every identity reassigned from `ids`.
    pub fn with_fresh_ids(&self, ids: &mut IdGenerator) -> SyntaxNode {
        SyntaxNode {
            id: ids.next_id(),
            kind: self.kind,
            children: self
                .children
                .iter()
                .map(|child| match child {
                    SyntaxElement::Node(node) => SyntaxElement::Node(node.with_fresh_ids(ids)),
                    SyntaxElement::Token(token) => SyntaxElement::Token(token.with_fresh_ids(ids)),
                })
                .collect(),
        }
    }
}

fn collect_tokens<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a SyntaxToken>) {
    for child in &node.children {
        match child {
            SyntaxElement::Node(inner) => collect_tokens(inner, out),
            SyntaxElement::Token(token) => out.push(token),
        }
    }
}

fn collect_nodes<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a SyntaxNode>) {
    for child in &node.children {
        if let SyntaxElement::Node(inner) = child {
            out.push(inner);
            collect_nodes(inner, out);
        }
    }
}

/// One immutable version of a parsed source unit.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: SyntaxNode,
    document: String,
    generation: u32,
}

impl SyntaxTree {
    /// Parse source text into a fresh tree (generation 0).
    pub fn parse(source: &str, path: &str) -> ParseResult<SyntaxTree> {
        let document = crate::id_generator::document_id(path);
        let ids = IdGenerator::from_seed(format!("{}.0", document));
        let root = crate::parser::Parser::new(source, ids)?.parse_source_unit()?;

        Ok(SyntaxTree {
            root,
            document,
            generation: 0,
        })
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Version stamp; element IDs are only meaningful alongside this.
    pub fn version(&self) -> String {
        format!("{}.{}", self.document, self.generation)
    }

    /// Produce the next tree version from a substituted root.
    ///
    /// Every element in the result is re-identified under a bumped
    /// generation; nothing from this version's identity space survives.
    pub fn rebuild(&self, new_root: SyntaxNode) -> SyntaxTree {
        let generation = self.generation + 1;
        let mut ids = IdGenerator::from_seed(format!("{}.{}", self.document, generation));

        SyntaxTree {
            root: new_root.with_fresh_ids(&mut ids),
            document: self.document.clone(),
            generation,
        }
    }

    /// ID generator yielding identities that cannot collide with this
    /// version's, for synthesizing replacement elements.
    pub fn replacement_ids(&self) -> IdGenerator {
        IdGenerator::from_seed(format!("{}.{}r", self.document, self.generation))
    }

    pub fn to_source_text(&self) -> String {
        self.root.to_source_text()
    }

    pub fn is_equivalent_to(&self, other: &SyntaxTree) -> bool {
        self.root.is_equivalent_to(other.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "using System;\n\nclass C {\n    void M() { var x = 1; }\n}\n";

    #[test]
    fn test_parse_roundtrip_is_lossless() {
        let tree = SyntaxTree::parse(SOURCE, "/test.cs").unwrap();
        assert_eq!(tree.to_source_text(), SOURCE);
    }

    #[test]
    fn test_equivalence_ignores_identities() {
        let a = SyntaxTree::parse(SOURCE, "/a.cs").unwrap();
        let b = SyntaxTree::parse(SOURCE, "/b.cs").unwrap();

        assert!(a.is_equivalent_to(&b));
        assert_ne!(a.root().id, b.root().id);
    }

    #[test]
    fn test_equivalence_sees_trivia_changes() {
        let a = SyntaxTree::parse("class C { }", "/a.cs").unwrap();
        let b = SyntaxTree::parse("class  C { }", "/a.cs").unwrap();

        assert!(!a.is_equivalent_to(&b));
    }

    #[test]
    fn test_rebuild_bumps_every_identity() {
        let tree = SyntaxTree::parse(SOURCE, "/test.cs").unwrap();
        let rebuilt = tree.rebuild(tree.root().clone());

        assert_ne!(tree.version(), rebuilt.version());
        assert!(tree.is_equivalent_to(&rebuilt));

        let old_ids: std::collections::HashSet<_> = std::iter::once(&tree.root().id)
            .chain(tree.root().descendant_nodes().iter().map(|n| &n.id))
            .collect();
        assert!(!old_ids.contains(&rebuilt.root().id));
        for node in rebuilt.root().descendant_nodes() {
            assert!(!old_ids.contains(&node.id));
        }
    }

    #[test]
    fn test_resolved_text_strips_trivia() {
        let tree = SyntaxTree::parse("using Vendor . Utilities ;", "/a.cs").unwrap();
        let using = tree.root().find_node(NodeKind::UsingDirective).unwrap();
        let name = using.find_node(NodeKind::QualifiedName).unwrap();
        assert_eq!(name.resolved_text(), "Vendor.Utilities");
    }
}
