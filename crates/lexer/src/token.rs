use std::ops::Range;

/// Token classes the trivia scanner distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// `/* ... */`, including an unterminated comment running to the end.
	MultiLineComment,
	/// `// ...` up to, not including, the line break.
	SingleLineComment,
	/// A single line break (`\r\n`, `\n`, `\r`, U+2028 or U+2029).
	EndOfLine,
	/// A bare `/`.
	///
	/// This is what a user produces while starting to type a comment.
	Divide,
	/// Anything else.
	Other,
}

impl TokenKind {
	/// Returns true for comments and line breaks.
	#[inline]
	pub fn is_trivia(self) -> bool {
		matches!(
			self,
			TokenKind::MultiLineComment | TokenKind::SingleLineComment | TokenKind::EndOfLine
		)
	}
}

/// A classified token with its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	/// Token class.
	pub kind: TokenKind,
	/// Byte range in the source text.
	pub span: Range<usize>,
}

impl Token {
	/// Creates a token.
	pub fn new(kind: TokenKind, span: Range<usize>) -> Self {
		Self { kind, span }
	}

	/// Byte offset of the first byte of the token.
	#[inline]
	pub fn start(&self) -> usize {
		self.span.start
	}

	/// Byte offset just past the token.
	#[inline]
	pub fn end(&self) -> usize {
		self.span.end
	}
}
