use crate::error::{ParseError, ParseResult};
use crate::kind::{TokenKind, TriviaKind};
use logos::Logos;
use std::ops::Range;

/// Raw lexical classes straight out of logos, before trivia attachment.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[token("using")]
    Using,

    #[token("class")]
    Class,

    #[token("var")]
    Var,

    #[token("void")]
    Void,

    #[token("return")]
    Return,

    #[token("delegate")]
    Delegate,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("=")]
    Equals,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,
}

impl RawToken {
    fn token_kind(self) -> Option<TokenKind> {
        match self {
            RawToken::Using => Some(TokenKind::UsingKeyword),
            RawToken::Class => Some(TokenKind::ClassKeyword),
            RawToken::Var => Some(TokenKind::VarKeyword),
            RawToken::Void => Some(TokenKind::VoidKeyword),
            RawToken::Return => Some(TokenKind::ReturnKeyword),
            RawToken::Delegate => Some(TokenKind::DelegateKeyword),
            RawToken::Identifier => Some(TokenKind::Identifier),
            RawToken::Number => Some(TokenKind::NumericLiteral),
            RawToken::String => Some(TokenKind::StringLiteral),
            RawToken::OpenBrace => Some(TokenKind::OpenBrace),
            RawToken::CloseBrace => Some(TokenKind::CloseBrace),
            RawToken::OpenParen => Some(TokenKind::OpenParen),
            RawToken::CloseParen => Some(TokenKind::CloseParen),
            RawToken::Semicolon => Some(TokenKind::Semicolon),
            RawToken::Comma => Some(TokenKind::Comma),
            RawToken::Dot => Some(TokenKind::Dot),
            RawToken::Equals => Some(TokenKind::Equals),
            RawToken::Whitespace
            | RawToken::Newline
            | RawToken::LineComment
            | RawToken::BlockComment => None,
        }
    }

    fn trivia_kind(self) -> Option<TriviaKind> {
        match self {
            RawToken::Whitespace => Some(TriviaKind::Whitespace),
            RawToken::Newline => Some(TriviaKind::EndOfLine),
            RawToken::LineComment => Some(TriviaKind::LineComment),
            RawToken::BlockComment => Some(TriviaKind::BlockComment),
            _ => None,
        }
    }
}

/// A significant token with its surrounding trivia attached.
///
/// Attachment follows the usual lossless-tree convention: a token's
/// leading run is every trivia unit since the previous token's trailing
/// run; its trailing run extends up to and including the first newline
/// after it. Trivia at the very end of the file sticks to the last token.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: TokenKind,
    pub text: String,
    pub leading: Vec<(TriviaKind, String)>,
    pub trailing: Vec<(TriviaKind, String)>,
    pub span: Range<usize>,
}

/// Lex source text into trivia-carrying lexemes.
///
/// Concatenating every lexeme's leading trivia, text and trailing trivia
/// reproduces the input byte for byte.
pub fn lex(source: &str) -> ParseResult<Vec<Lexeme>> {
    let mut lexer = RawToken::lexer(source);
    let mut lexemes: Vec<Lexeme> = Vec::new();
    let mut pending: Vec<(TriviaKind, String)> = Vec::new();

    while let Some(raw) = lexer.next() {
        let raw = raw.map_err(|_| ParseError::lexer_error(lexer.span().start))?;
        let text = lexer.slice().to_string();

        if let Some(trivia) = raw.trivia_kind() {
            // Trailing trivia of the previous token runs up to and
            // including the first newline; everything after that is
            // leading trivia of the next token.
            if pending.is_empty() {
                if let Some(last) = lexemes.last_mut() {
                    let ends_line = last
                        .trailing
                        .last()
                        .is_some_and(|(kind, _)| *kind == TriviaKind::EndOfLine);

                    if !ends_line {
                        last.trailing.push((trivia, text));
                        continue;
                    }
                }
            }
            pending.push((trivia, text));
            continue;
        }

        let kind = raw
            .token_kind()
            .expect("raw token is either trivia or significant");

        lexemes.push(Lexeme {
            kind,
            text,
            leading: std::mem::take(&mut pending),
            trailing: Vec::new(),
            span: lexer.span(),
        });
    }

    // Whatever trivia is left belongs to the tail of the file.
    if !pending.is_empty() {
        if let Some(last) = lexemes.last_mut() {
            last.trailing.append(&mut pending);
        }
    }

    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(lexemes: &[Lexeme]) -> String {
        let mut out = String::new();
        for lexeme in lexemes {
            for (_, text) in &lexeme.leading {
                out.push_str(text);
            }
            out.push_str(&lexeme.text);
            for (_, text) in &lexeme.trailing {
                out.push_str(text);
            }
        }
        out
    }

    #[test]
    fn test_lex_basic() {
        let lexemes = lex("using System;").unwrap();
        let kinds: Vec<_> = lexemes.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::UsingKeyword,
                TokenKind::Identifier,
                TokenKind::Semicolon
            ]
        );
    }

    #[test]
    fn test_lex_is_lossless() {
        let source = "using System;\n\n// entry point\nclass C {\n\tvoid M() { var x = 1; }\n}\n";
        let lexemes = lex(source).unwrap();
        assert_eq!(render(&lexemes), source);
    }

    #[test]
    fn test_trailing_trivia_stops_at_newline() {
        let lexemes = lex("class C // note\n{ }").unwrap();
        let ident = &lexemes[1];
        assert_eq!(ident.text, "C");
        let trailing: Vec<_> = ident.trailing.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            trailing,
            vec![
                TriviaKind::Whitespace,
                TriviaKind::LineComment,
                TriviaKind::EndOfLine
            ]
        );
    }

    #[test]
    fn test_file_tail_trivia_sticks_to_last_token() {
        let source = "class C { }\n\n// done\n";
        let lexemes = lex(source).unwrap();
        assert_eq!(render(&lexemes), source);
    }

    #[test]
    fn test_lexer_error_position() {
        let err = lex("class C { @ }").unwrap_err();
        assert_eq!(err, ParseError::lexer_error(10));
    }
}
