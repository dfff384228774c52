//! Leading-trivia detection.

use cloak_lexer::{TokenKind, Tokenizer};
use cloak_primitives::CharIdx;

/// Returns the char offset just past the leading run of comments and line
/// breaks in `text`.
///
/// Scanning stops at the first token that is not trivia. The boundary is that
/// token's start, except for a bare `/`: a user who has only typed the first
/// slash of a new comment keeps it on the header side, so the boundary moves
/// to the token's end. A text made only of trivia returns its full length.
pub fn find_trivia_end(tokenizer: &dyn Tokenizer, text: &str) -> CharIdx {
	let byte = trivia_end_byte(tokenizer, text);
	text.get(..byte).unwrap_or(text).chars().count()
}

fn trivia_end_byte(tokenizer: &dyn Tokenizer, text: &str) -> usize {
	for token in tokenizer.tokens(text) {
		match token.kind {
			kind if kind.is_trivia() => continue,
			TokenKind::Divide => return token.end(),
			_ => return token.start(),
		}
	}
	text.len()
}
