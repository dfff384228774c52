//! Script tokenizer for leading-trivia detection.
//!
//! The projection engine only needs to know where the leading run of
//! comments and line breaks in a script ends. This crate provides the
//! [`Tokenizer`] seam the engine consumes and [`ScriptTokenizer`], a
//! logos-based lexer that classifies just enough of JavaScript to answer
//! that question.

pub mod token;
pub mod tokenizer;

pub use token::{Token, TokenKind};
pub use tokenizer::{ScriptTokenizer, ScriptTokens, Tokenizer, tokenize};
