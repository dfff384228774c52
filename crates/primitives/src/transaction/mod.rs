//! Edit transactions over rope text.
//!
//! A [`Transaction`] wraps a [`ChangeSet`] built from sorted
//! [`Change`] requests. Buffers apply transactions, map tracked positions
//! through them with a [`Bias`], and report the resulting [`TextEdit`]s to
//! their listeners.
//!
//! [`TextEdit`]: crate::TextEdit

mod changeset;
mod types;


pub use changeset::{ChangeSet, Edits};
pub use types::{Bias, Change, Insertion, Operation, Tendril};

use crate::range::{CharIdx, CharRange};
use crate::{Rope, RopeSlice};

/// A set of changes applied to a document as one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	changes: ChangeSet,
}

impl Transaction {
	/// Builds a transaction from changes sorted by position.
	///
	/// Changes must not overlap. Out-of-range positions are clamped to the
	/// document in release builds and trip a debug assertion otherwise.
	pub fn change(doc: RopeSlice, changes: impl IntoIterator<Item = Change>) -> Self {
		let len = doc.len_chars();
		let changes = changes.into_iter();
		let mut changeset = ChangeSet::with_capacity(2 * changes.size_hint().0 + 1);

		let mut last = 0;
		for change in changes {
			debug_assert!(
				change.start <= change.end && change.end <= len,
				"change {}..{} out of bounds for document of {len} chars",
				change.start,
				change.end
			);
			debug_assert!(change.start >= last, "changes must be sorted and non-overlapping");

			let start = change.start.clamp(last, len);
			let end = change.end.clamp(start, len);

			changeset.retain(start - last);
			if let Some(text) = change.replacement {
				changeset.insert(text);
			}
			changeset.delete(end - start);
			last = end;
		}

		changeset.retain(len - last);
		debug_assert_eq!(changeset.len(), len);

		Self { changes: changeset }
	}

	/// Inserts `text` at `pos`.
	pub fn insert(doc: RopeSlice, pos: CharIdx, text: impl Into<Tendril>) -> Self {
		Self::change(doc, [Change::insert(pos, text)])
	}

	/// Deletes `range`.
	pub fn delete(doc: RopeSlice, range: CharRange) -> Self {
		Self::change(doc, [Change::delete(range.start, range.end)])
	}

	/// Replaces `range` with `text`.
	pub fn replace(doc: RopeSlice, range: CharRange, text: impl Into<Tendril>) -> Self {
		Self::change(doc, [Change::replace(range.start, range.end, text)])
	}

	/// Applies the transaction to `doc`.
	pub fn apply(&self, doc: &mut Rope) {
		self.changes.apply(doc);
	}

	/// Returns the underlying changeset.
	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	/// Returns the raw operations.
	pub fn operations(&self) -> &[Operation] {
		self.changes.changes()
	}

	/// Maps a position in the source document through this transaction.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		self.changes.map_pos(pos, bias)
	}

	/// Returns the replacements in document order.
	pub fn edits(&self) -> Edits<'_> {
		self.changes.edits()
	}
}

impl From<ChangeSet> for Transaction {
	fn from(changes: ChangeSet) -> Self {
		Self { changes }
	}
}
