//! Recursive-descent parser producing the lossless green tree.
//!
//! Grammar (C#-flavored subset):
//!
//! ```text
//! source_unit   := using_directive* class_decl*
//! using_directive := 'using' qualified_name ';'
//! qualified_name  := Ident ('.' Ident)*
//! class_decl    := 'class' Ident '{' method_decl* '}'
//! method_decl   := ('void' | Ident) Ident parameter_list block
//! parameter_list := '(' (parameter (',' parameter)*)? ')'
//! parameter     := Ident Ident
//! block         := '{' statement* '}'
//! statement     := 'var' Ident '=' expression ';'
//!                | 'return' expression? ';'
//!                | expression ';'
//! expression    := postfix ('=' expression)?
//! postfix       := primary ('.' Ident | '(' arguments? ')')*
//! primary       := Ident | Number | String
//!                | 'delegate' parameter_list? block
//!                | '(' expression ')'
//! ```

use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::kind::{NodeKind, TokenKind};
use crate::tokenizer::{lex, Lexeme};
use crate::tree::{SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTrivia};

pub struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    ids: IdGenerator,
}

impl Parser {
    pub fn new(source: &str, ids: IdGenerator) -> ParseResult<Self> {
        Ok(Self {
            lexemes: lex(source)?,
            pos: 0,
            ids,
        })
    }

    /// Parse a complete top-level unit: usings, then class declarations.
    pub fn parse_source_unit(mut self) -> ParseResult<SyntaxNode> {
        let mut unit = self.node(NodeKind::SourceUnit);

        while self.peek_kind() == Some(TokenKind::UsingKeyword) {
            let using = self.parse_using_directive()?;
            unit.children.push(SyntaxElement::Node(using));
        }

        while !self.is_at_end() {
            let class = self.parse_class_declaration()?;
            unit.children.push(SyntaxElement::Node(class));
        }

        Ok(unit)
    }

    fn parse_using_directive(&mut self) -> ParseResult<SyntaxNode> {
        let mut using = self.node(NodeKind::UsingDirective);
        self.expect_into(&mut using, TokenKind::UsingKeyword)?;

        let name = self.parse_qualified_name()?;
        using.children.push(SyntaxElement::Node(name));

        self.expect_into(&mut using, TokenKind::Semicolon)?;
        Ok(using)
    }

    fn parse_qualified_name(&mut self) -> ParseResult<SyntaxNode> {
        let mut name = self.node(NodeKind::QualifiedName);
        self.expect_into(&mut name, TokenKind::Identifier)?;

        while self.peek_kind() == Some(TokenKind::Dot) {
            self.expect_into(&mut name, TokenKind::Dot)?;
            self.expect_into(&mut name, TokenKind::Identifier)?;
        }

        Ok(name)
    }

    fn parse_class_declaration(&mut self) -> ParseResult<SyntaxNode> {
        let mut class = self.node(NodeKind::ClassDeclaration);
        self.expect_into(&mut class, TokenKind::ClassKeyword)?;
        self.expect_into(&mut class, TokenKind::Identifier)?;
        self.expect_into(&mut class, TokenKind::OpenBrace)?;

        while !self.is_at_end() && self.peek_kind() != Some(TokenKind::CloseBrace) {
            let method = self.parse_method_declaration()?;
            class.children.push(SyntaxElement::Node(method));
        }

        self.expect_into(&mut class, TokenKind::CloseBrace)?;
        Ok(class)
    }

    fn parse_method_declaration(&mut self) -> ParseResult<SyntaxNode> {
        let mut method = self.node(NodeKind::MethodDeclaration);

        match self.peek_kind() {
            Some(TokenKind::VoidKeyword) => {
                self.expect_into(&mut method, TokenKind::VoidKeyword)?;
            }
            Some(TokenKind::Identifier) => {
                // Return type as a plain type name.
                self.expect_into(&mut method, TokenKind::Identifier)?;
            }
            _ => {
                return Err(self.unexpected("'void' or a return type"));
            }
        }

        self.expect_into(&mut method, TokenKind::Identifier)?;

        let params = self.parse_parameter_list()?;
        method.children.push(SyntaxElement::Node(params));

        let body = self.parse_block()?;
        method.children.push(SyntaxElement::Node(body));

        Ok(method)
    }

    fn parse_parameter_list(&mut self) -> ParseResult<SyntaxNode> {
        let mut list = self.node(NodeKind::ParameterList);
        self.expect_into(&mut list, TokenKind::OpenParen)?;

        if self.peek_kind() != Some(TokenKind::CloseParen) {
            loop {
                let param = self.parse_parameter()?;
                list.children.push(SyntaxElement::Node(param));

                if self.peek_kind() == Some(TokenKind::Comma) {
                    self.expect_into(&mut list, TokenKind::Comma)?;
                } else {
                    break;
                }
            }
        }

        self.expect_into(&mut list, TokenKind::CloseParen)?;
        Ok(list)
    }

    fn parse_parameter(&mut self) -> ParseResult<SyntaxNode> {
        let mut param = self.node(NodeKind::Parameter);
        self.expect_into(&mut param, TokenKind::Identifier)?;
        self.expect_into(&mut param, TokenKind::Identifier)?;
        Ok(param)
    }

    fn parse_block(&mut self) -> ParseResult<SyntaxNode> {
        let mut block = self.node(NodeKind::Block);
        self.expect_into(&mut block, TokenKind::OpenBrace)?;

        while !self.is_at_end() && self.peek_kind() != Some(TokenKind::CloseBrace) {
            let statement = self.parse_statement()?;
            block.children.push(SyntaxElement::Node(statement));
        }

        self.expect_into(&mut block, TokenKind::CloseBrace)?;
        Ok(block)
    }

    fn parse_statement(&mut self) -> ParseResult<SyntaxNode> {
        match self.peek_kind() {
            Some(TokenKind::VarKeyword) => {
                let mut local = self.node(NodeKind::LocalDeclaration);
                self.expect_into(&mut local, TokenKind::VarKeyword)?;
                self.expect_into(&mut local, TokenKind::Identifier)?;
                self.expect_into(&mut local, TokenKind::Equals)?;

                let value = self.parse_expression()?;
                local.children.push(SyntaxElement::Node(value));

                self.expect_into(&mut local, TokenKind::Semicolon)?;
                Ok(local)
            }
            Some(TokenKind::ReturnKeyword) => {
                let mut ret = self.node(NodeKind::ReturnStatement);
                self.expect_into(&mut ret, TokenKind::ReturnKeyword)?;

                if self.peek_kind() != Some(TokenKind::Semicolon) {
                    let value = self.parse_expression()?;
                    ret.children.push(SyntaxElement::Node(value));
                }

                self.expect_into(&mut ret, TokenKind::Semicolon)?;
                Ok(ret)
            }
            _ => {
                let mut statement = self.node(NodeKind::ExpressionStatement);
                let expression = self.parse_expression()?;
                statement.children.push(SyntaxElement::Node(expression));
                self.expect_into(&mut statement, TokenKind::Semicolon)?;
                Ok(statement)
            }
        }
    }

    fn parse_expression(&mut self) -> ParseResult<SyntaxNode> {
        let left = self.parse_postfix()?;

        if self.peek_kind() == Some(TokenKind::Equals) {
            let mut assignment = self.node(NodeKind::AssignmentExpression);
            assignment.children.push(SyntaxElement::Node(left));
            self.expect_into(&mut assignment, TokenKind::Equals)?;

            // Right-associative.
            let right = self.parse_expression()?;
            assignment.children.push(SyntaxElement::Node(right));
            return Ok(assignment);
        }

        Ok(left)
    }

    fn parse_postfix(&mut self) -> ParseResult<SyntaxNode> {
        let mut expression = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    let mut access = self.node(NodeKind::MemberAccessExpression);
                    access.children.push(SyntaxElement::Node(expression));
                    self.expect_into(&mut access, TokenKind::Dot)?;

                    let name = self.parse_identifier_name()?;
                    access.children.push(SyntaxElement::Node(name));
                    expression = access;
                }
                Some(TokenKind::OpenParen) => {
                    let mut invocation = self.node(NodeKind::InvocationExpression);
                    invocation.children.push(SyntaxElement::Node(expression));

                    let arguments = self.parse_argument_list()?;
                    invocation.children.push(SyntaxElement::Node(arguments));
                    expression = invocation;
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    fn parse_argument_list(&mut self) -> ParseResult<SyntaxNode> {
        let mut list = self.node(NodeKind::ArgumentList);
        self.expect_into(&mut list, TokenKind::OpenParen)?;

        if self.peek_kind() != Some(TokenKind::CloseParen) {
            loop {
                let argument = self.parse_expression()?;
                list.children.push(SyntaxElement::Node(argument));

                if self.peek_kind() == Some(TokenKind::Comma) {
                    self.expect_into(&mut list, TokenKind::Comma)?;
                } else {
                    break;
                }
            }
        }

        self.expect_into(&mut list, TokenKind::CloseParen)?;
        Ok(list)
    }

    fn parse_primary(&mut self) -> ParseResult<SyntaxNode> {
        match self.peek_kind() {
            Some(TokenKind::Identifier) => self.parse_identifier_name(),
            Some(TokenKind::NumericLiteral) => {
                let mut literal = self.node(NodeKind::LiteralExpression);
                self.expect_into(&mut literal, TokenKind::NumericLiteral)?;
                Ok(literal)
            }
            Some(TokenKind::StringLiteral) => {
                let mut literal = self.node(NodeKind::LiteralExpression);
                self.expect_into(&mut literal, TokenKind::StringLiteral)?;
                Ok(literal)
            }
            Some(TokenKind::DelegateKeyword) => {
                let mut anon = self.node(NodeKind::AnonymousMethodExpression);
                self.expect_into(&mut anon, TokenKind::DelegateKeyword)?;

                if self.peek_kind() == Some(TokenKind::OpenParen) {
                    let params = self.parse_parameter_list()?;
                    anon.children.push(SyntaxElement::Node(params));
                }

                let body = self.parse_block()?;
                anon.children.push(SyntaxElement::Node(body));
                Ok(anon)
            }
            Some(TokenKind::OpenParen) => {
                let mut paren = self.node(NodeKind::ParenthesizedExpression);
                self.expect_into(&mut paren, TokenKind::OpenParen)?;

                let inner = self.parse_expression()?;
                paren.children.push(SyntaxElement::Node(inner));

                self.expect_into(&mut paren, TokenKind::CloseParen)?;
                Ok(paren)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_identifier_name(&mut self) -> ParseResult<SyntaxNode> {
        let mut name = self.node(NodeKind::IdentifierName);
        self.expect_into(&mut name, TokenKind::Identifier)?;
        Ok(name)
    }

    // --- token plumbing ---

    fn node(&mut self, kind: NodeKind) -> SyntaxNode {
        SyntaxNode::new(kind, self.ids.next_id())
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.lexemes.get(self.pos).map(|lexeme| lexeme.kind)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    fn expect_into(&mut self, parent: &mut SyntaxNode, kind: TokenKind) -> ParseResult<()> {
        let token = self.expect(kind)?;
        parent.children.push(SyntaxElement::Token(token));
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<SyntaxToken> {
        let lexeme = match self.lexemes.get(self.pos) {
            Some(lexeme) if lexeme.kind == kind => lexeme.clone(),
            Some(lexeme) => {
                return Err(ParseError::unexpected_token(
                    lexeme.span.start,
                    kind.description(),
                    lexeme.text.clone(),
                ));
            }
            None => return Err(ParseError::unexpected_eof(self.end_pos())),
        };

        self.pos += 1;
        Ok(self.take_token(lexeme))
    }

    fn take_token(&mut self, lexeme: Lexeme) -> SyntaxToken {
        SyntaxToken {
            id: self.ids.next_id(),
            kind: lexeme.kind,
            text: lexeme.text,
            leading: lexeme
                .leading
                .into_iter()
                .map(|(kind, text)| SyntaxTrivia {
                    id: self.ids.next_id(),
                    kind,
                    text,
                })
                .collect(),
            trailing: lexeme
                .trailing
                .into_iter()
                .map(|(kind, text)| SyntaxTrivia {
                    id: self.ids.next_id(),
                    kind,
                    text,
                })
                .collect(),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.lexemes.get(self.pos) {
            Some(lexeme) => {
                ParseError::unexpected_token(lexeme.span.start, expected, lexeme.text.clone())
            }
            None => ParseError::unexpected_eof(self.end_pos()),
        }
    }

    fn end_pos(&self) -> usize {
        self.lexemes.last().map(|lexeme| lexeme.span.end).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SyntaxTree;

    fn parse(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, "/test.cs").expect("parse failed")
    }

    #[test]
    fn test_parse_using_directives() {
        let tree = parse("using System;\nusing Vendor.Utilities;\nclass C { }");
        let usings: Vec<_> = tree
            .root()
            .child_nodes()
            .filter(|n| n.kind == NodeKind::UsingDirective)
            .collect();
        assert_eq!(usings.len(), 2);
        assert_eq!(
            usings[1]
                .find_node(NodeKind::QualifiedName)
                .unwrap()
                .resolved_text(),
            "Vendor.Utilities"
        );
    }

    #[test]
    fn test_parse_scenario_a_shape() {
        let tree = parse("class C { void M() { var x = 1; x = 2; } }");

        let class = tree.root().find_node(NodeKind::ClassDeclaration).unwrap();
        let method = class.find_node(NodeKind::MethodDeclaration).unwrap();
        let block = method.find_node(NodeKind::Block).unwrap();

        let statements: Vec<_> = block.child_nodes().collect();
        assert_eq!(statements[0].kind, NodeKind::LocalDeclaration);
        assert_eq!(statements[1].kind, NodeKind::ExpressionStatement);

        let assignment = statements[1]
            .find_node(NodeKind::AssignmentExpression)
            .unwrap();
        let operands: Vec<_> = assignment.child_nodes().collect();
        assert_eq!(operands[0].kind, NodeKind::IdentifierName);
        assert_eq!(operands[1].kind, NodeKind::LiteralExpression);
    }

    #[test]
    fn test_parse_invocation_and_member_access() {
        let tree = parse("class C { void M() { Console.WriteLine(x, 1); } }");

        let nodes = tree.root().descendant_nodes();
        let invocation = nodes
            .iter()
            .find(|n| n.kind == NodeKind::InvocationExpression)
            .unwrap();

        let callee = invocation
            .find_node(NodeKind::MemberAccessExpression)
            .unwrap();
        assert_eq!(callee.resolved_text(), "Console.WriteLine");

        let arguments = invocation.find_node(NodeKind::ArgumentList).unwrap();
        assert_eq!(arguments.child_nodes().count(), 2);
    }

    #[test]
    fn test_parse_anonymous_method() {
        let tree = parse("class C { void M() { var f = delegate (int x) { return x; }; } }");
        let nodes = tree.root().descendant_nodes();
        let anon = nodes
            .iter()
            .find(|n| n.kind == NodeKind::AnonymousMethodExpression)
            .unwrap();
        assert!(anon.find_node(NodeKind::ParameterList).is_some());
        assert!(anon.find_node(NodeKind::Block).is_some());
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = SyntaxTree::parse("class C {", "/test.cs").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_typed_method_declaration() {
        let tree = parse("class C { int Get() { return 1; } }");
        let method = tree
            .root()
            .find_node(NodeKind::ClassDeclaration)
            .unwrap()
            .find_node(NodeKind::MethodDeclaration)
            .unwrap();
        let idents: Vec<_> = method
            .child_tokens()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, vec!["int", "Get"]);
    }
}
