use cloak_primitives::{Bias, CharIdx, CharRange, ChangeSet};

/// Handle to a range the buffer keeps valid across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub(crate) usize);

/// A range mapped through every change applied to its buffer.
///
/// The start leans left and the end leans right, so text inserted exactly at
/// either edge ends up inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrackedRange {
	start: CharIdx,
	end: CharIdx,
}

impl TrackedRange {
	pub(crate) fn new(range: CharRange) -> Self {
		Self {
			start: range.start,
			end: range.end,
		}
	}

	pub(crate) fn range(&self) -> CharRange {
		self.start..self.end
	}

	pub(crate) fn map(&mut self, changes: &ChangeSet) {
		self.start = changes.map_pos(self.start, Bias::Left);
		self.end = changes.map_pos(self.end, Bias::Right).max(self.start);
	}
}
