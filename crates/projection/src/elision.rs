use cloak_primitives::range::contains;
use cloak_primitives::{CharIdx, CharLen, CharRange};

use crate::composite::CompositeDocument;

/// Body-only window onto a [`CompositeDocument`].
///
/// The header is hidden as a prefix of known length; the footer is hidden by
/// ending the window at the end of the body. The prefix must be recomputed
/// whenever the header is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElisionView {
	hidden_prefix: CharLen,
}

impl ElisionView {
	/// Creates a view hiding a header of `header_len` chars.
	pub fn new(header_len: CharLen) -> Self {
		Self {
			hidden_prefix: header_len,
		}
	}

	/// Length of the hidden header.
	pub fn hidden_prefix(&self) -> CharLen {
		self.hidden_prefix
	}

	/// Adopts the length of a replaced header.
	pub fn recompute(&mut self, header_len: CharLen) {
		self.hidden_prefix = header_len;
	}

	/// Composite range a consumer may see and edit.
	pub fn visible_range(&self, composite: &CompositeDocument) -> CharRange {
		debug_assert_eq!(
			self.hidden_prefix,
			composite.header_len(),
			"view not recomputed after header replacement"
		);
		self.hidden_prefix..self.hidden_prefix + composite.body_len()
	}

	/// Returns exactly the body text.
	pub fn visible_text(&self, composite: &CompositeDocument) -> String {
		composite.slice(self.visible_range(composite))
	}

	/// Maps a visible offset to composite coordinates.
	pub fn to_composite(&self, pos: CharIdx) -> CharIdx {
		self.hidden_prefix + pos
	}

	/// Maps a composite offset into the view, if it falls inside it.
	///
	/// The end of the body counts as inside so a cursor can sit after the
	/// last body char.
	pub fn to_visible(&self, composite: &CompositeDocument, pos: CharIdx) -> Option<CharIdx> {
		let range = self.visible_range(composite);
		(range.start <= pos && pos <= range.end).then(|| pos - range.start)
	}

	/// Returns true if replacing `range` (composite coordinates) leaves the
	/// header and footer untouched.
	pub fn is_editable(&self, composite: &CompositeDocument, range: &CharRange) -> bool {
		contains(&self.visible_range(composite), range)
	}
}
