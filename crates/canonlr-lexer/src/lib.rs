//! Tokenizer for the small C-like source language fed to the LR(1) driver.

pub mod lexer;
pub mod source;
pub mod token;

pub use crate::{
    lexer::{tokenize, LexicalError, Token, TokenStream},
    source::strip_comments,
    token::TokenKind,
};
