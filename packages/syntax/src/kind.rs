use serde::{Deserialize, Serialize};

/// Syntactic category of a non-terminal tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root container for one source file: usings followed by declarations.
    SourceUnit,
    UsingDirective,
    QualifiedName,
    ClassDeclaration,
    MethodDeclaration,
    ParameterList,
    Parameter,
    Block,
    LocalDeclaration,
    ExpressionStatement,
    ReturnStatement,
    AssignmentExpression,
    InvocationExpression,
    ArgumentList,
    MemberAccessExpression,
    IdentifierName,
    LiteralExpression,
    AnonymousMethodExpression,
    ParenthesizedExpression,
}

/// Terminal token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    NumericLiteral,
    StringLiteral,
    UsingKeyword,
    ClassKeyword,
    VarKeyword,
    VoidKeyword,
    ReturnKeyword,
    DelegateKeyword,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Semicolon,
    Comma,
    Dot,
    Equals,
}

impl TokenKind {
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::NumericLiteral => "numeric literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::UsingKeyword => "'using'",
            TokenKind::ClassKeyword => "'class'",
            TokenKind::VarKeyword => "'var'",
            TokenKind::VoidKeyword => "'void'",
            TokenKind::ReturnKeyword => "'return'",
            TokenKind::DelegateKeyword => "'delegate'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Equals => "'='",
        }
    }
}

/// Category of a trivia unit (whitespace and comments around tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriviaKind {
    Whitespace,
    EndOfLine,
    LineComment,
    BlockComment,
}
