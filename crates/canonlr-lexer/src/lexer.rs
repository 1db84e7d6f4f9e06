//! Lexer implementation.

use crate::token::TokenKind;
use logos::Logos;
use std::ops::Range;

// 入力のトークン列
#[derive(Debug, Copy, Clone, Logos, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"0[xX][0-9a-fA-F]+", priority = 5)]
    Hex,

    #[regex(r"0[oO][0-7]+", priority = 5)]
    Octal,

    #[regex(r"0[bB][01]+", priority = 5)]
    Binary,

    #[regex(r"([0-9]+\.[0-9]*|\.[0-9]+)([eE][\+\-]?[0-9]+)?")]
    Float,

    // digits running straight into letters, e.g. `12abc`.
    #[regex(r"[0-9]+[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    InvalidNumber,

    #[regex(r"'[^'\n]*'")]
    Char,

    #[regex(r"'[^'\n]*")]
    UnterminatedChar,

    #[regex(r#""[^"\n]*""#)]
    String,

    #[regex(r#""[^"\n]*"#)]
    UnterminatedString,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Assign,

    #[token("==")]
    Eq,

    #[token("!")]
    Not,

    #[token("!=")]
    Neq,

    #[token("+")]
    Plus,

    #[token("+=")]
    PlusAssign,

    #[token("-")]
    Minus,

    #[token("-=")]
    MinusAssign,

    #[token("*")]
    Asterisk,

    #[token("*=")]
    AsteriskAssign,

    #[token("/")]
    Slash,

    #[token("/=")]
    SlashAssign,

    #[token("<")]
    Lt,

    #[token("<=")]
    Lte,

    #[token(">")]
    Gt,

    #[token(">=")]
    Gte,

    #[token("&&")]
    #[token("&")]
    And,

    #[token("||")]
    #[token("|")]
    Or,
}

/// A diagnostic attached to a token. Scanning always continues past it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexicalError {
    #[error("unterminated character constant")]
    UnterminatedChar,

    #[error("unterminated string constant")]
    UnterminatedString,

    #[error("unknown character: {:?}", _0)]
    UnknownCharacter(char),

    #[error("invalid number: {}", _0)]
    InvalidNumber(String),
}

/// A token with its kind and literal text.
///
/// Character and string constants carry their contents without quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    pub kind: TokenKind,
    pub text: &'source str,
    pub span: Range<usize>,
    pub error: Option<LexicalError>,
}

impl Token<'_> {
    /// The grammar terminal of this token.
    pub fn terminal(&self) -> &'static str {
        self.kind.terminal()
    }
}

impl canonlr_runtime::Token<String> for Token<'_> {
    fn as_symbol(&self) -> String {
        self.terminal().to_owned()
    }
}

impl canonlr_runtime::Token<String> for &Token<'_> {
    fn as_symbol(&self) -> String {
        self.terminal().to_owned()
    }
}

/// Scan the whole input into tokens.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    RawToken::lexer(input)
        .spanned()
        .map(|(res, span)| {
            let slice = &input[span.clone()];
            let token = match res {
                Ok(raw) => convert(raw, slice, span),
                Err(()) => Token {
                    kind: TokenKind::Unknown,
                    text: slice,
                    error: slice
                        .chars()
                        .next()
                        .map(LexicalError::UnknownCharacter),
                    span,
                },
            };
            if let Some(ref err) = token.error {
                tracing::debug!("lexical diagnostic at {:?}: {}", token.span, err);
            }
            token
        })
        .collect()
}

fn convert(raw: RawToken, slice: &str, span: Range<usize>) -> Token<'_> {
    let (kind, text, error) = match raw {
        RawToken::Ident => (
            TokenKind::keyword(slice).unwrap_or(TokenKind::Ident),
            slice,
            None,
        ),
        RawToken::Number => (TokenKind::Number, slice, None),
        RawToken::Hex => (TokenKind::Hex, slice, None),
        RawToken::Octal => (TokenKind::Octal, slice, None),
        RawToken::Binary => (TokenKind::Binary, slice, None),
        RawToken::Float => (TokenKind::Float, slice, None),
        RawToken::InvalidNumber => (
            TokenKind::Unknown,
            slice,
            Some(LexicalError::InvalidNumber(slice.to_owned())),
        ),
        RawToken::Char => (TokenKind::Char, &slice[1..slice.len() - 1], None),
        RawToken::UnterminatedChar => (
            TokenKind::Char,
            &slice[1..],
            Some(LexicalError::UnterminatedChar),
        ),
        RawToken::String => (TokenKind::String, &slice[1..slice.len() - 1], None),
        RawToken::UnterminatedString => (
            TokenKind::String,
            &slice[1..],
            Some(LexicalError::UnterminatedString),
        ),
        RawToken::LParen => (TokenKind::LParen, slice, None),
        RawToken::RParen => (TokenKind::RParen, slice, None),
        RawToken::LBrace => (TokenKind::LBrace, slice, None),
        RawToken::RBrace => (TokenKind::RBrace, slice, None),
        RawToken::Semicolon => (TokenKind::Semicolon, slice, None),
        RawToken::Assign => (TokenKind::Assign, slice, None),
        RawToken::Eq => (TokenKind::Eq, slice, None),
        RawToken::Not => (TokenKind::Not, slice, None),
        RawToken::Neq => (TokenKind::Neq, slice, None),
        RawToken::Plus => (TokenKind::Plus, slice, None),
        RawToken::PlusAssign => (TokenKind::PlusAssign, slice, None),
        RawToken::Minus => (TokenKind::Minus, slice, None),
        RawToken::MinusAssign => (TokenKind::MinusAssign, slice, None),
        RawToken::Asterisk => (TokenKind::Asterisk, slice, None),
        RawToken::AsteriskAssign => (TokenKind::AsteriskAssign, slice, None),
        RawToken::Slash => (TokenKind::Slash, slice, None),
        RawToken::SlashAssign => (TokenKind::SlashAssign, slice, None),
        RawToken::Lt => (TokenKind::Lt, slice, None),
        RawToken::Lte => (TokenKind::Lte, slice, None),
        RawToken::Gt => (TokenKind::Gt, slice, None),
        RawToken::Gte => (TokenKind::Gte, slice, None),
        RawToken::And => (TokenKind::And, slice, None),
        RawToken::Or => (TokenKind::Or, slice, None),
    };
    Token {
        kind,
        text,
        span,
        error,
    }
}

/// A cursor over scanned tokens with a single pushback slot.
#[derive(Debug)]
pub struct TokenStream<'source> {
    tokens: std::vec::IntoIter<Token<'source>>,
    pending: Option<Token<'source>>,
}

impl<'source> TokenStream<'source> {
    pub fn new(input: &'source str) -> Self {
        Self::from_tokens(tokenize(input))
    }

    pub fn from_tokens(tokens: Vec<Token<'source>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            pending: None,
        }
    }

    pub fn next_token(&mut self) -> Option<Token<'source>> {
        self.pending.take().or_else(|| self.tokens.next())
    }

    pub fn peek(&mut self) -> Option<&Token<'source>> {
        if self.pending.is_none() {
            self.pending = self.tokens.next();
        }
        self.pending.as_ref()
    }

    /// Push a token back so that the next call to `next_token` returns it.
    ///
    /// Only one token can be pending; if the slot is taken the token is
    /// handed back as the error.
    pub fn unread(&mut self, token: Token<'source>) -> Result<(), Token<'source>> {
        if self.pending.is_some() {
            return Err(token);
        }
        self.pending = Some(token);
        Ok(())
    }
}

impl<'source> Iterator for TokenStream<'source> {
    type Item = Token<'source>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
