use smallvec::SmallVec;

use crate::range::{CharIdx, CharLen};

/// A single replacement in a text, measured in characters.
///
/// `old_len` characters starting at `start` were replaced by `new_len`
/// characters. Pure insertions have `old_len == 0`, pure deletions have
/// `new_len == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextEdit {
	/// First character affected by the edit.
	pub start: CharIdx,
	/// Number of characters removed.
	pub old_len: CharLen,
	/// Number of characters inserted in their place.
	pub new_len: CharLen,
}

impl TextEdit {
	/// Creates a new edit record.
	pub const fn new(start: CharIdx, old_len: CharLen, new_len: CharLen) -> Self {
		Self {
			start,
			old_len,
			new_len,
		}
	}

	/// Creates a pure insertion of `len` characters at `start`.
	pub const fn insertion(start: CharIdx, len: CharLen) -> Self {
		Self::new(start, 0, len)
	}

	/// Creates a pure deletion of `len` characters at `start`.
	pub const fn deletion(start: CharIdx, len: CharLen) -> Self {
		Self::new(start, len, 0)
	}

	/// End of the replaced range in the text before the edit.
	#[inline]
	pub const fn old_end(&self) -> CharIdx {
		self.start + self.old_len
	}

	/// End of the inserted range in the text after the edit.
	#[inline]
	pub const fn new_end(&self) -> CharIdx {
		self.start + self.new_len
	}

	/// Signed change in text length caused by this edit.
	#[inline]
	pub fn delta(&self) -> isize {
		self.new_len as isize - self.old_len as isize
	}

	/// Returns true if the edit neither removes nor inserts anything.
	#[inline]
	pub const fn is_noop(&self) -> bool {
		self.old_len == 0 && self.new_len == 0
	}

	/// Returns this edit moved right by `offset` characters.
	#[inline]
	pub const fn shifted(self, offset: CharLen) -> Self {
		Self::new(self.start + offset, self.old_len, self.new_len)
	}
}

/// An ordered batch of edits produced by one buffer revision.
///
/// Edits are sorted by `start` and non-overlapping. Every `start` is expressed
/// in the coordinates of the text *before* the batch was applied, which is
/// how a [`ChangeSet`](crate::ChangeSet) describes its replacements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
	/// Buffer version after the batch was applied.
	pub version: u64,
	edits: SmallVec<[TextEdit; 4]>,
}

impl EditBatch {
	/// Creates a batch for `version` from the given edits.
	pub fn new(version: u64, edits: impl IntoIterator<Item = TextEdit>) -> Self {
		let edits: SmallVec<[TextEdit; 4]> = edits.into_iter().filter(|e| !e.is_noop()).collect();
		debug_assert!(
			edits.windows(2).all(|w| w[0].old_end() <= w[1].start),
			"edit batch must be sorted and non-overlapping"
		);
		Self { version, edits }
	}

	/// Returns the edits in document order.
	pub fn edits(&self) -> &[TextEdit] {
		&self.edits
	}

	/// Returns an iterator over the edits in document order.
	pub fn iter(&self) -> std::slice::Iter<'_, TextEdit> {
		self.edits.iter()
	}

	/// Returns the number of edits.
	pub fn len(&self) -> usize {
		self.edits.len()
	}

	/// Returns true if the batch carries no edits.
	pub fn is_empty(&self) -> bool {
		self.edits.is_empty()
	}

	/// Returns the first edit starting at or before `offset`, if any.
	///
	/// Edits are sorted, so the search never needs to look past the first
	/// edit: if it starts after `offset`, every later edit does too.
	pub fn first_at_or_before(&self, offset: CharIdx) -> Option<&TextEdit> {
		self.edits.iter().find(|edit| edit.start <= offset)
	}

	/// Net change in text length over the whole batch.
	pub fn delta(&self) -> isize {
		self.edits.iter().map(TextEdit::delta).sum()
	}
}

impl<'a> IntoIterator for &'a EditBatch {
	type Item = &'a TextEdit;
	type IntoIter = std::slice::Iter<'a, TextEdit>;

	fn into_iter(self) -> Self::IntoIter {
		self.edits.iter()
	}
}
