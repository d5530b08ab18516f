//! Symbol binding for one tree version.
//!
//! The binder is deliberately shallow: lexical scoping over usings,
//! classes, methods, parameters and locals, with no type inference.
//! A model is valid for exactly the tree version it was built from;
//! lookups against elements of any other version return nothing.

use crate::kind::{NodeKind, TokenKind};
use crate::tree::{ElementId, SyntaxNode, SyntaxTree};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Namespace,
    Class,
    Method,
    Parameter,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

/// Bindings from identifier-name elements of one tree version to symbols.
#[derive(Debug)]
pub struct SemanticModel {
    version: String,
    bindings: HashMap<ElementId, Symbol>,
}

impl SemanticModel {
    /// Build a model for the given tree.
    pub fn bind(tree: &SyntaxTree) -> SemanticModel {
        let mut binder = Binder::default();
        binder.bind_source_unit(tree.root());

        SemanticModel {
            version: tree.version(),
            bindings: binder.bindings,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Symbol bound to an identifier-name node, if any.
    ///
    /// Element IDs embed their version stamp, so an element from a
    /// superseded tree simply resolves to nothing here.
    pub fn symbol_for(&self, node: &SyntaxNode) -> Option<&Symbol> {
        if !node.id.starts_with(&format!("{}-", self.version)) {
            return None;
        }
        self.bindings.get(&node.id)
    }

    pub fn is_valid_for(&self, tree: &SyntaxTree) -> bool {
        self.version == tree.version()
    }
}

#[derive(Default)]
struct Binder {
    scopes: Vec<HashMap<String, Symbol>>,
    bindings: HashMap<ElementId, Symbol>,
}

impl Binder {
    fn bind_source_unit(&mut self, unit: &SyntaxNode) {
        self.scopes.push(HashMap::new());

        for using in unit.child_nodes() {
            if using.kind == NodeKind::UsingDirective {
                if let Some(name) = using.find_node(NodeKind::QualifiedName) {
                    self.declare(name.resolved_text(), SymbolKind::Namespace);
                }
            }
        }

        // Classes are visible to each other regardless of order.
        for class in unit.child_nodes() {
            if class.kind == NodeKind::ClassDeclaration {
                if let Some(name) = class.find_token(TokenKind::Identifier) {
                    self.declare(name.text.clone(), SymbolKind::Class);
                }
            }
        }

        for class in unit.child_nodes() {
            if class.kind == NodeKind::ClassDeclaration {
                self.bind_class(class);
            }
        }

        self.scopes.pop();
    }

    fn bind_class(&mut self, class: &SyntaxNode) {
        self.scopes.push(HashMap::new());

        for method in class.child_nodes() {
            if method.kind == NodeKind::MethodDeclaration {
                // The method name is the last identifier before the
                // parameter list; the first may be a return type.
                if let Some(name) = method
                    .child_tokens()
                    .filter(|t| t.kind == TokenKind::Identifier)
                    .last()
                {
                    self.declare(name.text.clone(), SymbolKind::Method);
                }
            }
        }

        for method in class.child_nodes() {
            if method.kind == NodeKind::MethodDeclaration {
                self.bind_method(method);
            }
        }

        self.scopes.pop();
    }

    fn bind_method(&mut self, method: &SyntaxNode) {
        self.scopes.push(HashMap::new());

        if let Some(params) = method.find_node(NodeKind::ParameterList) {
            self.declare_parameters(params);
        }

        if let Some(body) = method.find_node(NodeKind::Block) {
            self.bind_block(body);
        }

        self.scopes.pop();
    }

    fn declare_parameters(&mut self, params: &SyntaxNode) {
        for param in params.child_nodes() {
            if param.kind == NodeKind::Parameter {
                // Parameter is `<type> <name>`; the name is the second
                // identifier.
                if let Some(name) = param
                    .child_tokens()
                    .filter(|t| t.kind == TokenKind::Identifier)
                    .nth(1)
                {
                    self.declare(name.text.clone(), SymbolKind::Parameter);
                }
            }
        }
    }

    fn bind_block(&mut self, block: &SyntaxNode) {
        self.scopes.push(HashMap::new());

        for statement in block.child_nodes() {
            match statement.kind {
                NodeKind::LocalDeclaration => {
                    for expr in statement.child_nodes() {
                        self.bind_expression(expr);
                    }
                    if let Some(name) = statement.find_token(TokenKind::Identifier) {
                        self.declare(name.text.clone(), SymbolKind::Local);
                    }
                }
                _ => {
                    for expr in statement.child_nodes() {
                        self.bind_expression(expr);
                    }
                }
            }
        }

        self.scopes.pop();
    }

    fn bind_expression(&mut self, expr: &SyntaxNode) {
        match expr.kind {
            NodeKind::IdentifierName => {
                if let Some(symbol) = self.lookup(expr.identifier_text().unwrap_or_default()) {
                    self.bindings.insert(expr.id.clone(), symbol);
                }
            }
            NodeKind::MemberAccessExpression => {
                // Only the leftmost object resolves lexically; the member
                // name would need type information.
                if let Some(object) = expr.child_nodes().next() {
                    self.bind_expression(object);
                }
            }
            NodeKind::AnonymousMethodExpression => {
                self.scopes.push(HashMap::new());
                if let Some(params) = expr.find_node(NodeKind::ParameterList) {
                    self.declare_parameters(params);
                }
                if let Some(body) = expr.find_node(NodeKind::Block) {
                    self.bind_block(body);
                }
                self.scopes.pop();
            }
            _ => {
                for child in expr.child_nodes() {
                    self.bind_expression(child);
                }
            }
        }
    }

    fn declare(&mut self, name: String, kind: SymbolKind) {
        let symbol = Symbol {
            name: name.clone(),
            kind,
        };
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, symbol);
        }
    }

    fn lookup(&self, name: &str) -> Option<Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SyntaxTree;

    fn identifiers<'a>(tree: &'a SyntaxTree, text: &str) -> Vec<&'a SyntaxNode> {
        tree.root()
            .descendant_nodes()
            .into_iter()
            .filter(|n| n.identifier_text() == Some(text))
            .collect()
    }

    #[test]
    fn test_local_binds_to_local_symbol() {
        let tree =
            SyntaxTree::parse("class C { void M() { var x = 1; x = 2; } }", "/t.cs").unwrap();
        let model = SemanticModel::bind(&tree);

        let uses = identifiers(&tree, "x");
        // The `x` in `x = 2` resolves to the local declared above.
        let symbol = model.symbol_for(uses.last().unwrap()).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Local);
        assert_eq!(symbol.name, "x");
    }

    #[test]
    fn test_unknown_identifier_binds_to_nothing() {
        let tree = SyntaxTree::parse("class C { void M() { Foo(); } }", "/t.cs").unwrap();
        let model = SemanticModel::bind(&tree);

        let uses = identifiers(&tree, "Foo");
        assert!(model.symbol_for(uses[0]).is_none());
    }

    #[test]
    fn test_parameter_binds_inside_anonymous_method() {
        let tree = SyntaxTree::parse(
            "class C { void M() { var f = delegate (int y) { return y; }; } }",
            "/t.cs",
        )
        .unwrap();
        let model = SemanticModel::bind(&tree);

        let uses = identifiers(&tree, "y");
        let symbol = model.symbol_for(uses.last().unwrap()).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Parameter);
    }

    #[test]
    fn test_model_goes_stale_across_versions() {
        let tree = SyntaxTree::parse("class C { void M() { var x = 1; x = 2; } }", "/t.cs").unwrap();
        let model = SemanticModel::bind(&tree);

        let rebuilt = tree.rebuild(tree.root().clone());
        assert!(!model.is_valid_for(&rebuilt));

        let uses: Vec<_> = rebuilt
            .root()
            .descendant_nodes()
            .into_iter()
            .filter(|n| n.identifier_text() == Some("x"))
            .collect();
        assert!(model.symbol_for(uses[0]).is_none());
    }
}
