use std::path::PathBuf;
use std::sync::{Arc, Weak};

use cloak_primitives::{Change, EditBatch, TextEdit, Transaction};
use parking_lot::Mutex;
use proptest::prelude::*;

use crate::{BufferError, BufferHandle, BufferSnapshot, EditListener};

/// Records every notification it receives.
#[derive(Default)]
struct Recorder {
	batches: Mutex<Vec<(String, EditBatch)>>,
	paths: Mutex<Vec<Option<PathBuf>>>,
}

impl EditListener for Recorder {
	fn on_edits(&self, snapshot: &BufferSnapshot, batch: &EditBatch) {
		self.batches.lock().push((snapshot.text.to_string(), batch.clone()));
	}

	fn on_path_changed(&self, snapshot: &BufferSnapshot) {
		self.paths.lock().push(snapshot.path.clone());
	}
}

fn subscribe(buffer: &BufferHandle) -> Arc<Recorder> {
	let recorder = Arc::new(Recorder::default());
	let weak: Weak<dyn EditListener> = Arc::downgrade(&recorder) as Weak<dyn EditListener>;
	buffer.subscribe(weak);
	recorder
}

#[test]
fn test_insert_advances_version() {
	let buffer = BufferHandle::new("hello", None);
	let batch = buffer.insert(5, " world").unwrap();
	assert_eq!(buffer.text(), "hello world");
	assert_eq!(buffer.version(), 1);
	assert_eq!(batch.version, 1);
	assert_eq!(batch.edits(), &[TextEdit::insertion(5, 6)]);
}

#[test]
fn test_length_mismatch_is_rejected() {
	let buffer = BufferHandle::new("hello", None);
	let other = cloak_primitives::Rope::from("hi");
	let tx = Transaction::insert(other.slice(..), 0, "x");
	assert_eq!(
		buffer.apply(&tx),
		Err(BufferError::LengthMismatch {
			expected: 2,
			actual: 5
		})
	);
	assert_eq!(buffer.version(), 0);
}

#[test]
fn test_out_of_bounds_edit_is_rejected() {
	let buffer = BufferHandle::new("abc", None);
	assert!(matches!(
		buffer.delete(2..9),
		Err(BufferError::RangeOutOfBounds { start: 2, end: 9, len: 3 })
	));
}

#[test]
fn test_identity_transaction_is_silent() {
	let buffer = BufferHandle::new("abc", None);
	let recorder = subscribe(&buffer);
	let tx = buffer.with(|b| Transaction::change(b.content().slice(..), Vec::<Change>::new()));
	let batch = buffer.apply(&tx).unwrap();
	assert!(batch.is_empty());
	assert_eq!(buffer.version(), 0);
	assert!(recorder.batches.lock().is_empty());
}

#[test]
fn test_tracked_range_follows_edits() {
	let buffer = BufferHandle::new("0123456789", None);
	let id = buffer.track(3..6).unwrap();

	buffer.insert(0, "ab").unwrap();
	assert_eq!(buffer.tracked_range(id).unwrap(), 5..8);

	buffer.insert(6, "X").unwrap();
	assert_eq!(buffer.tracked_range(id).unwrap(), 5..9);

	buffer.delete(0..2).unwrap();
	assert_eq!(buffer.tracked_range(id).unwrap(), 3..7);
	let range = buffer.tracked_range(id).unwrap();
	assert_eq!(buffer.with(|b| b.content().slice(range).to_string()), "3X45");
}

#[test]
fn test_tracked_range_absorbs_edge_insertions() {
	let buffer = BufferHandle::new("body", None);
	let id = buffer.track_all();
	buffer.insert(0, "<").unwrap();
	buffer.insert(5, ">").unwrap();
	assert_eq!(buffer.tracked_range(id).unwrap(), 0..6);
}

#[test]
fn test_tracked_range_survives_total_deletion() {
	let buffer = BufferHandle::new("body", None);
	let id = buffer.track_all();
	buffer.delete(0..4).unwrap();
	assert_eq!(buffer.tracked_range(id).unwrap(), 0..0);
	buffer.insert(0, "new").unwrap();
	assert_eq!(buffer.tracked_range(id).unwrap(), 0..3);
}

#[test]
fn test_untrack() {
	let buffer = BufferHandle::new("abc", None);
	let id = buffer.track(0..1).unwrap();
	buffer.untrack(id).unwrap();
	assert_eq!(buffer.tracked_range(id), Err(BufferError::UnknownTrack(id)));
	assert_eq!(buffer.untrack(id), Err(BufferError::UnknownTrack(id)));
}

#[test]
fn test_listener_receives_post_edit_snapshot() {
	let buffer = BufferHandle::new("abc", None);
	let recorder = subscribe(&buffer);
	buffer.replace(1..2, "XYZ").unwrap();

	let batches = recorder.batches.lock();
	assert_eq!(batches.len(), 1);
	assert_eq!(batches[0].0, "aXYZc");
	assert_eq!(batches[0].1.edits(), &[TextEdit::new(1, 1, 3)]);
}

#[test]
fn test_dropped_listener_is_pruned() {
	let buffer = BufferHandle::new("abc", None);
	let recorder = subscribe(&buffer);
	drop(recorder);
	buffer.insert(0, "x").unwrap();
	assert_eq!(buffer.with(|b| b.listeners.len()), 0);
}

/// Reads the buffer from inside its callback.
struct Reader {
	buffer: BufferHandle,
	seen: Mutex<Vec<usize>>,
}

impl EditListener for Reader {
	fn on_edits(&self, _snapshot: &BufferSnapshot, _batch: &EditBatch) {
		self.seen.lock().push(self.buffer.len_chars());
	}
}

#[test]
fn test_listener_may_read_buffer() {
	let buffer = BufferHandle::new("abc", None);
	let reader = Arc::new(Reader {
		buffer: buffer.clone(),
		seen: Mutex::new(Vec::new()),
	});
	buffer.subscribe(Arc::downgrade(&reader) as Weak<dyn EditListener>);
	buffer.insert(3, "d").unwrap();
	assert_eq!(*reader.seen.lock(), vec![4]);
}

#[test]
fn test_set_path_notifies() {
	let buffer = BufferHandle::new("abc", None);
	let recorder = subscribe(&buffer);
	buffer.set_path(Some(PathBuf::from("/tmp/a.js")));
	assert_eq!(buffer.path(), Some(PathBuf::from("/tmp/a.js")));
	assert_eq!(*recorder.paths.lock(), vec![Some(PathBuf::from("/tmp/a.js"))]);
}

proptest! {
	/// A whole-text track always covers exactly the whole text.
	#[test]
	fn prop_track_all_covers_text(
		initial in "[a-z\n]{0,40}",
		edits in prop::collection::vec((0usize..50, 0usize..5, "[a-z]{0,4}"), 0..8),
	) {
		let buffer = BufferHandle::new(&initial, None);
		let id = buffer.track_all();

		for (pos, del, text) in edits {
			let len = buffer.len_chars();
			let start = pos.min(len);
			let end = (start + del).min(len);
			buffer.replace(start..end, text).unwrap();
			prop_assert_eq!(buffer.tracked_range(id).unwrap(), 0..buffer.len_chars());
		}
	}
}
