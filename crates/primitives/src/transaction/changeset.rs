use std::iter::Peekable;
use std::slice;

use super::types::{Bias, Insertion, Operation, Tendril};
use crate::edit::TextEdit;
use crate::range::{CharIdx, CharLen};
use crate::{Rope, RopeSlice};

/// A retain/delete/insert program that rewrites one document into another.
///
/// The operations walk the source text once from the start. Adjacent
/// operations of the same kind are merged as they are pushed, and an insert
/// is always placed before a delete at the same position, so a replacement
/// reads as `Insert, Delete`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	pub(super) changes: Vec<Operation>,
	/// Source length in chars.
	pub(super) len: CharLen,
	/// Result length in chars.
	pub(super) len_after: CharLen,
}

impl ChangeSet {
	/// Creates an empty changeset; the source length grows as operations are
	/// pushed.
	pub fn new(_doc: RopeSlice) -> Self {
		Self::default()
	}

	/// Creates an empty changeset with room for `capacity` operations.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			changes: Vec::with_capacity(capacity),
			len: 0,
			len_after: 0,
		}
	}

	/// Length of the source document.
	pub fn len(&self) -> CharLen {
		self.len
	}

	/// Length of the document once the changeset is applied.
	pub fn len_after(&self) -> CharLen {
		self.len_after
	}

	/// Returns true if no operations were pushed.
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	/// Returns true if applying this changeset leaves the text untouched.
	pub fn is_identity(&self) -> bool {
		self.changes.iter().all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Returns the raw operations.
	pub fn changes(&self) -> &[Operation] {
		&self.changes
	}

	pub(crate) fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	pub(crate) fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	pub(crate) fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}

		let ins = Insertion::new(text);
		self.len_after += ins.char_len();

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				prev.push_str(&ins);
			}
			[.., last @ Operation::Delete(_)] => {
				// Keep inserts ahead of deletes at the same position.
				let del = std::mem::replace(last, Operation::Insert(ins));
				self.changes.push(del);
			}
			_ => {
				self.changes.push(Operation::Insert(ins));
			}
		}
	}

	/// Applies the changeset to `doc` in place.
	pub fn apply(&self, doc: &mut Rope) {
		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => pos += n,
				Operation::Delete(n) => doc.remove(pos..pos + n),
				Operation::Insert(ins) => {
					doc.insert(pos, ins.text());
					pos += ins.char_len();
				}
			}
		}
	}

	/// Maps a source position to its place in the changed document.
	///
	/// Positions inside a deleted range collapse to the deletion point.
	/// `bias` decides whether a position at an insertion point stays in
	/// front of the new text or moves past it.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		let mut old_pos = 0;
		let mut new_pos = 0;

		for op in &self.changes {
			if old_pos > pos {
				break;
			}

			match op {
				Operation::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Operation::Insert(ins) => {
					if old_pos != pos || bias == Bias::Right {
						new_pos += ins.char_len();
					}
				}
			}
		}

		new_pos + (pos - old_pos)
	}

	/// Returns the replacements this changeset performs, in document order.
	///
	/// Every edit's `start` is a position in the source document.
	pub fn edits(&self) -> Edits<'_> {
		Edits {
			ops: self.changes.iter().peekable(),
			pos: 0,
		}
	}
}

/// Iterator over the [`TextEdit`]s of a [`ChangeSet`].
///
/// An adjacent insert and delete collapse into a single replacement.
pub struct Edits<'a> {
	ops: Peekable<slice::Iter<'a, Operation>>,
	pos: CharIdx,
}

impl Iterator for Edits<'_> {
	type Item = TextEdit;

	fn next(&mut self) -> Option<TextEdit> {
		loop {
			match self.ops.next()? {
				Operation::Retain(n) => self.pos += n,
				Operation::Delete(n) => {
					let start = self.pos;
					self.pos += n;
					let new_len = match self.ops.peek() {
						Some(Operation::Insert(ins)) => {
							let len = ins.char_len();
							self.ops.next();
							len
						}
						_ => 0,
					};
					return Some(TextEdit::new(start, *n, new_len));
				}
				Operation::Insert(ins) => {
					let start = self.pos;
					let old_len = match self.ops.peek() {
						Some(Operation::Delete(n)) => {
							let n = *n;
							self.ops.next();
							self.pos += n;
							n
						}
						_ => 0,
					};
					return Some(TextEdit::new(start, old_len, ins.char_len()));
				}
			}
		}
	}
}
