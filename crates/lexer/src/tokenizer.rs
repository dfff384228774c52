use logos::{Lexer, Logos};

use crate::token::{Token, TokenKind};

/// Source of classified tokens, pulled lazily from the start of a text.
///
/// Implementations must be total: every input, including the empty string,
/// yields a (possibly empty) token stream whose spans are ordered and lie
/// inside the text.
pub trait Tokenizer: Send + Sync {
	/// Returns the tokens of `text` in order.
	fn tokens<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = Token> + 'a>;
}

/// Raw lexer states. Horizontal whitespace is skipped; everything the trivia
/// scanner does not care about collapses into [`RawToken::Code`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\x{0B}\x{0C}\x{A0}\x{FEFF}]+")]
enum RawToken {
	#[token("/*", block_comment)]
	BlockComment,

	#[regex(r"//[^\r\n\x{2028}\x{2029}]*")]
	LineComment,

	#[regex(r"\r\n|\n|\r|\x{2028}|\x{2029}")]
	LineBreak,

	#[token("/")]
	Slash,

	#[token("/=")]
	SlashAssign,

	#[regex(r"[^ \t\x{0B}\x{0C}\x{A0}\x{FEFF}\r\n\x{2028}\x{2029}/]+")]
	Code,
}

/// Consumes a block comment body. An unterminated comment runs to the end of
/// the input.
fn block_comment(lex: &mut Lexer<RawToken>) -> bool {
	let rest = lex.remainder();
	let len = rest.find("*/").map_or(rest.len(), |idx| idx + 2);
	lex.bump(len);
	true
}

/// Tokenizer for JavaScript-like sources.
///
/// Recognizes comments, line breaks and bare `/`. It does not attempt to tell
/// division from regular expression literals; a `/` is always reported as
/// [`TokenKind::Divide`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTokenizer;

impl ScriptTokenizer {
	/// Creates a tokenizer.
	pub const fn new() -> Self {
		Self
	}
}

impl Tokenizer for ScriptTokenizer {
	fn tokens<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = Token> + 'a> {
		Box::new(ScriptTokens::new(text))
	}
}

/// Lazy token stream produced by [`ScriptTokenizer`].
pub struct ScriptTokens<'a> {
	lexer: Lexer<'a, RawToken>,
}

impl<'a> ScriptTokens<'a> {
	/// Starts tokenizing `text` from its first byte.
	pub fn new(text: &'a str) -> Self {
		Self {
			lexer: RawToken::lexer(text),
		}
	}
}

impl Iterator for ScriptTokens<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		let kind = match self.lexer.next()? {
			Ok(RawToken::BlockComment) => TokenKind::MultiLineComment,
			Ok(RawToken::LineComment) => TokenKind::SingleLineComment,
			Ok(RawToken::LineBreak) => TokenKind::EndOfLine,
			Ok(RawToken::Slash) => TokenKind::Divide,
			Ok(RawToken::SlashAssign | RawToken::Code) | Err(()) => TokenKind::Other,
		};
		Some(Token::new(kind, self.lexer.span()))
	}
}

/// Collects every token of `text`.
pub fn tokenize(text: &str) -> Vec<Token> {
	ScriptTokens::new(text).collect()
}
