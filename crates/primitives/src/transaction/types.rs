use crate::range::{CharIdx, CharLen};

/// Owned text carried by insertions.
pub type Tendril = String;

/// A replacement requested against a document.
///
/// Replaces the characters in `[start, end)` with `replacement`; a
/// replacement of [`None`] deletes the range, and `start == end` with
/// `Some` text is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
	/// First character to replace.
	pub start: CharIdx,
	/// End of the replaced range (exclusive).
	pub end: CharIdx,
	/// Text to put in place of the range.
	pub replacement: Option<Tendril>,
}

impl Change {
	/// Inserts `text` at `pos`.
	pub fn insert(pos: CharIdx, text: impl Into<Tendril>) -> Self {
		Self {
			start: pos,
			end: pos,
			replacement: Some(text.into()),
		}
	}

	/// Deletes `[start, end)`.
	pub fn delete(start: CharIdx, end: CharIdx) -> Self {
		Self {
			start,
			end,
			replacement: None,
		}
	}

	/// Replaces `[start, end)` with `text`.
	pub fn replace(start: CharIdx, end: CharIdx, text: impl Into<Tendril>) -> Self {
		Self {
			start,
			end,
			replacement: Some(text.into()),
		}
	}
}

/// Which side of an insertion a mapped position lands on.
///
/// Only matters when the position sits exactly where text is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Stay in front of the inserted text.
	Left,
	/// Move past the inserted text.
	Right,
}

/// Inserted text together with its char count.
///
/// The count is computed once so that mapping and applying a changeset never
/// re-walk the text. The fields stay private to keep the two in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
	text: Tendril,
	char_len: CharLen,
}

impl Insertion {
	/// Wraps `text`, counting its characters.
	#[inline]
	pub fn new(text: Tendril) -> Self {
		let char_len = text.chars().count();
		Self { text, char_len }
	}

	/// Returns true if nothing is inserted.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.char_len == 0
	}

	/// Returns the inserted text.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns the cached character length.
	#[inline]
	pub fn char_len(&self) -> CharLen {
		self.char_len
	}

	pub(super) fn push_str(&mut self, other: &Insertion) {
		self.text.push_str(&other.text);
		self.char_len += other.char_len;
	}
}

/// One step of a changeset, consumed left to right over the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Keep the next N source characters.
	Retain(CharLen),
	/// Drop the next N source characters.
	Delete(CharLen),
	/// Emit new text at the current position.
	Insert(Insertion),
}
