//! Header, body and footer joined into one addressable text.

use cloak_buffer::{BufferHandle, TrackId};
use cloak_primitives::{CharIdx, CharLen, CharRange, Rope, RopeSlice, TextEdit};
use tracing::error;

/// One of the three segments of a [`CompositeDocument`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
	Header,
	Body,
	Footer,
}

impl SegmentKind {
	/// All segments in document order.
	pub const ALL: [SegmentKind; 3] = [SegmentKind::Header, SegmentKind::Body, SegmentKind::Footer];
}

/// A change in composite coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeEdit {
	/// Segment the change happened in.
	pub segment: SegmentKind,
	/// Composite char offset where the replaced text started.
	pub start: CharIdx,
	/// Replaced length in chars.
	pub old_len: CharLen,
	/// Replacement length in chars.
	pub new_len: CharLen,
}

impl CompositeEdit {
	/// Returns the same change as a plain [`TextEdit`].
	pub fn as_text_edit(&self) -> TextEdit {
		TextEdit::new(self.start, self.old_len, self.new_len)
	}
}

/// Live reference to the whole text of a host buffer.
///
/// The buffer keeps the tracked range valid across edits, so the body is
/// never copied. Dropping the handle releases the track.
pub struct BodyHandle {
	buffer: BufferHandle,
	track: TrackId,
}

impl BodyHandle {
	/// Tracks the whole current text of `buffer`.
	pub fn track_all(buffer: BufferHandle) -> Self {
		let track = buffer.track_all();
		Self { buffer, track }
	}

	pub fn buffer(&self) -> &BufferHandle {
		&self.buffer
	}

	/// Current extent of the body in buffer coordinates.
	pub fn range(&self) -> CharRange {
		match self.buffer.tracked_range(self.track) {
			Ok(range) => range,
			Err(err) => {
				error!(%err, "Body track released while still referenced");
				0..0
			}
		}
	}

	/// Current body length in chars.
	pub fn len(&self) -> CharLen {
		self.range().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Runs `f` over the current body text.
	pub fn with_text<R>(&self, f: impl FnOnce(RopeSlice<'_>) -> R) -> R {
		self.buffer.with(|buffer| {
			let range = buffer.tracked_range(self.track).unwrap_or(0..0);
			f(buffer.content().slice(range))
		})
	}
}

impl Drop for BodyHandle {
	fn drop(&mut self) {
		let _ = self.buffer.untrack(self.track);
	}
}

impl std::fmt::Debug for BodyHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BodyHandle")
			.field("buffer", &self.buffer)
			.field("track", &self.track)
			.finish()
	}
}

/// Virtual text made of an owned header, a tracked body and an owned footer.
///
/// Only the header is ever replaced, and only as a whole. The body segment is
/// the same tracked range for the lifetime of the document.
#[derive(Debug)]
pub struct CompositeDocument {
	header: String,
	header_len: CharLen,
	body: BodyHandle,
	footer: String,
	footer_len: CharLen,
	version: u64,
}

impl CompositeDocument {
	/// Joins `header`, `body` and `footer`.
	pub fn new(header: String, body: BodyHandle, footer: impl Into<String>) -> Self {
		let footer = footer.into();
		Self {
			header_len: header.chars().count(),
			footer_len: footer.chars().count(),
			header,
			body,
			footer,
			version: 0,
		}
	}

	/// Swaps the header for `header` and reports the change as a single edit.
	pub fn replace_header(&mut self, header: String) -> CompositeEdit {
		let old_len = self.header_len;
		self.header_len = header.chars().count();
		self.header = header;
		self.version += 1;
		CompositeEdit {
			segment: SegmentKind::Header,
			start: 0,
			old_len,
			new_len: self.header_len,
		}
	}

	/// Translates an edit of the body into composite coordinates.
	pub fn map_body_edit(&self, edit: &TextEdit) -> CompositeEdit {
		let edit = edit.shifted(self.header_len);
		CompositeEdit {
			segment: SegmentKind::Body,
			start: edit.start,
			old_len: edit.old_len,
			new_len: edit.new_len,
		}
	}

	pub fn header(&self) -> &str {
		&self.header
	}

	pub fn footer(&self) -> &str {
		&self.footer
	}

	pub fn body(&self) -> &BodyHandle {
		&self.body
	}

	pub fn header_len(&self) -> CharLen {
		self.header_len
	}

	pub fn body_len(&self) -> CharLen {
		self.body.len()
	}

	pub fn footer_len(&self) -> CharLen {
		self.footer_len
	}

	pub fn len_chars(&self) -> CharLen {
		self.header_len + self.body_len() + self.footer_len
	}

	/// Number of header replacements so far.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Composite range occupied by `kind`.
	pub fn segment(&self, kind: SegmentKind) -> CharRange {
		let body_end = self.header_len + self.body_len();
		match kind {
			SegmentKind::Header => 0..self.header_len,
			SegmentKind::Body => self.header_len..body_end,
			SegmentKind::Footer => body_end..body_end + self.footer_len,
		}
	}

	/// Returns the full virtual text.
	pub fn text(&self) -> String {
		let mut out = String::with_capacity(self.header.len() + self.footer.len());
		out.push_str(&self.header);
		self.body.with_text(|body| out.extend(body.chunks()));
		out.push_str(&self.footer);
		out
	}

	/// Returns the full virtual text as a rope.
	pub fn to_rope(&self) -> Rope {
		let mut rope = Rope::from(self.header.as_str());
		self.body.with_text(|body| rope.append(Rope::from(body)));
		rope.append(Rope::from(self.footer.as_str()));
		rope
	}

	/// Returns the text in `range`, clamped to the document.
	pub fn slice(&self, range: CharRange) -> String {
		let mut out = String::new();
		for kind in SegmentKind::ALL {
			let segment = self.segment(kind);
			let start = range.start.max(segment.start);
			let end = range.end.min(segment.end);
			if start >= end {
				continue;
			}
			let local = start - segment.start..end - segment.start;
			match kind {
				SegmentKind::Header => push_chars(&mut out, &self.header, local),
				SegmentKind::Body => self.body.with_text(|body| out.extend(body.slice(local).chunks())),
				SegmentKind::Footer => push_chars(&mut out, &self.footer, local),
			}
		}
		out
	}
}

fn push_chars(out: &mut String, text: &str, range: CharRange) {
	out.extend(text.chars().skip(range.start).take(range.len()));
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn document(body: &str) -> (BufferHandle, CompositeDocument) {
		let buffer = BufferHandle::new(body, None);
		let body = BodyHandle::track_all(buffer.clone());
		(buffer, CompositeDocument::new("H\n".to_string(), body, "\nF"))
	}

	#[test]
	fn test_text_concatenates_segments() {
		let (_buffer, doc) = document("body");
		assert_eq!(doc.text(), "H\nbody\nF");
		assert_eq!(doc.to_rope().to_string(), doc.text());
		assert_eq!(doc.len_chars(), 8);
	}

	#[test]
	fn test_body_is_read_through() {
		let (buffer, doc) = document("body");
		buffer.insert(0, "my ").unwrap();
		buffer.insert(7, "!").unwrap();
		assert_eq!(doc.text(), "H\nmy body!\nF");
		assert_eq!(doc.segment(SegmentKind::Body), 2..10);
		assert_eq!(doc.segment(SegmentKind::Footer), 10..12);
	}

	#[test]
	fn test_replace_header_reports_one_edit() {
		let (_buffer, mut doc) = document("body");
		let edit = doc.replace_header("héader\n".to_string());
		assert_eq!(
			edit,
			CompositeEdit {
				segment: SegmentKind::Header,
				start: 0,
				old_len: 2,
				new_len: 7,
			}
		);
		assert_eq!(doc.version(), 1);
		assert_eq!(doc.text(), "héader\nbody\nF");
	}

	#[test]
	fn test_slice_spans_segments() {
		let (_buffer, doc) = document("body");
		assert_eq!(doc.slice(1..4), "\nbo");
		assert_eq!(doc.slice(5..100), "y\nF");
		assert_eq!(doc.slice(2..6), "body");
		assert_eq!(doc.slice(3..3), "");
	}

	#[test]
	fn test_map_body_edit() {
		let (_buffer, doc) = document("body");
		let edit = doc.map_body_edit(&TextEdit::new(1, 2, 5));
		assert_eq!(edit.segment, SegmentKind::Body);
		assert_eq!(edit.as_text_edit(), TextEdit::new(3, 2, 5));
	}

	#[test]
	fn test_drop_releases_track() {
		let buffer = BufferHandle::new("body", None);
		let body = BodyHandle::track_all(buffer.clone());
		let track = body.track;
		drop(body);
		assert!(buffer.tracked_range(track).is_err());
	}
}
