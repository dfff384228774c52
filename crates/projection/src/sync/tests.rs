use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use cloak_buffer::BufferHandle;
use cloak_lexer::ScriptTokenizer;
use cloak_primitives::TextEdit;
use pretty_assertions::assert_eq;

use super::*;
use crate::lookup::NoAuxiliary;

fn synchronizer(buffer: &BufferHandle) -> ChangeSynchronizer {
	ChangeSynchronizer::new(
		Box::new(ScriptTokenizer),
		Box::new(NoAuxiliary),
		HeaderTemplate::default(),
		&buffer.snapshot(),
	)
}

#[test]
fn test_initial_scan() {
	let buffer = BufferHandle::new("// hello\nvar x = 1;", None);
	let sync = synchronizer(&buffer);
	assert_eq!(sync.boundary(), 9);
	assert!(sync.header().starts_with("// hello\n"));
}

#[test]
fn test_edit_past_boundary_is_ignored() {
	let buffer = BufferHandle::new("// hello\nvar x = 1;", None);
	let mut sync = synchronizer(&buffer);
	let before = sync.header().to_string();

	let batch = buffer.insert(15, " + 2").unwrap();
	assert_eq!(sync.on_edits(&buffer.snapshot(), &batch), SyncOutcome::Ignored);
	assert_eq!(sync.header(), before);
}

#[test]
fn test_edit_at_boundary_rescans() {
	let buffer = BufferHandle::new("// hello\nvar x = 1;", None);
	let mut sync = synchronizer(&buffer);

	// Code typed right at the boundary leaves the trivia as it was.
	let batch = buffer.insert(9, "let y;").unwrap();
	assert_eq!(sync.on_edits(&buffer.snapshot(), &batch), SyncOutcome::Unchanged);
	assert_eq!(sync.boundary(), 9);
}

#[test]
fn test_comment_edit_replaces_header() {
	let buffer = BufferHandle::new("// hello\nvar x = 1;", None);
	let mut sync = synchronizer(&buffer);

	let batch = buffer.replace(3..8, "world").unwrap();
	let SyncOutcome::Replaced(header) = sync.on_edits(&buffer.snapshot(), &batch) else {
		panic!("expected a header replacement");
	};
	assert!(header.starts_with("// world\n\r\n"));
	assert_eq!(sync.header(), header);
}

#[test]
fn test_qualifies_checks_every_edit() {
	let buffer = BufferHandle::new("// a\ncode", None);
	let sync = synchronizer(&buffer);
	assert_eq!(sync.boundary(), 5);

	let late = EditBatch::new(1, [TextEdit::insertion(7, 1)]);
	let mixed = EditBatch::new(1, [TextEdit::insertion(5, 1), TextEdit::insertion(7, 1)]);
	assert!(!sync.qualifies(&late));
	assert!(sync.qualifies(&mixed));
}

#[test]
fn test_rescan_picks_up_path_and_auxiliary() {
	let buffer = BufferHandle::new("x", Some(PathBuf::from("/src/a.js")));
	let mut sync = ChangeSynchronizer::new(
		Box::new(ScriptTokenizer),
		Box::new(|path: &Path| Some(path.with_extension("d.ts").to_string_lossy().into_owned())),
		HeaderTemplate::default(),
		&buffer.snapshot(),
	);
	assert!(sync.header().contains("/// <reference path=\"/src/a.d.ts\" />\r\n"));
	assert!(sync.header().contains("__dirname = \"/src\";\r\n"));

	buffer.set_path(Some(PathBuf::from("/lib/b.js")));
	let SyncOutcome::Replaced(header) = sync.rescan(&buffer.snapshot()) else {
		panic!("expected a header replacement");
	};
	assert!(header.contains("__filename = \"/lib/b.js\";\r\n"));
	assert!(header.contains("/// <reference path=\"/lib/b.d.ts\" />\r\n"));
}

#[test]
fn test_late_batch_does_not_roll_back_header() {
	let buffer = BufferHandle::new("// a\ncode", None);
	let mut sync = synchronizer(&buffer);

	let first = buffer.insert(0, "// z\n").unwrap();
	let second = buffer.insert(0, "// b\n").unwrap();
	let live = buffer.snapshot();

	// Delivered newest first, as when another listener edits in its callback.
	assert!(matches!(sync.on_edits(&live, &second), SyncOutcome::Replaced(_)));
	assert_eq!(sync.scanned_version(), 2);
	assert_eq!(sync.on_edits(&live, &first), SyncOutcome::Ignored);
	assert!(sync.header().starts_with("// b\n// z\n// a\n\r\n"));
	assert_eq!(sync.boundary(), 15);
}

#[test]
fn test_stale_snapshot_is_not_rescanned() {
	let buffer = BufferHandle::new("// a\ncode", None);
	let mut sync = synchronizer(&buffer);
	let old = buffer.snapshot();
	buffer.insert(0, "// b\n").unwrap();

	assert!(matches!(sync.rescan(&buffer.snapshot()), SyncOutcome::Replaced(_)));
	assert_eq!(sync.rescan(&old), SyncOutcome::Unchanged);
	assert!(sync.header().starts_with("// b\n// a\n"));
}

#[test]
fn test_latch_state_machine() {
	let latch = SyncLatch::new();
	assert_eq!(latch.state(), SyncState::Idle);

	let mut guard = latch.enter(PendingScan::Refresh).unwrap();
	assert_eq!(latch.state(), SyncState::Scanning);
	assert!(latch.enter(PendingScan::Edits(EditBatch::new(1, []))).is_none());

	assert_eq!(
		guard.next_batch(),
		Some(vec![PendingScan::Refresh, PendingScan::Edits(EditBatch::new(1, []))])
	);
	assert_eq!(latch.state(), SyncState::Scanning);
	assert_eq!(guard.next_batch(), None);
	assert_eq!(latch.state(), SyncState::Idle);
	assert_eq!(guard.next_batch(), None);

	// Work queued after the pass released the latch starts a new pass and
	// survives the old guard being dropped.
	let mut next = latch.enter(PendingScan::Refresh).unwrap();
	drop(guard);
	assert_eq!(latch.state(), SyncState::Scanning);
	assert_eq!(next.next_batch(), Some(vec![PendingScan::Refresh]));
	assert_eq!(next.next_batch(), None);
}

#[test]
fn test_work_queued_while_finishing_is_drained() {
	let latch = SyncLatch::new();
	let mut guard = latch.enter(PendingScan::Refresh).unwrap();
	assert_eq!(guard.next_batch().map(|batch| batch.len()), Some(1));

	// Arrives after the last drain but before the pass checks again.
	assert!(latch.enter(PendingScan::Refresh).is_none());
	assert_eq!(guard.next_batch(), Some(vec![PendingScan::Refresh]));
	assert_eq!(guard.next_batch(), None);
	assert_eq!(latch.state(), SyncState::Idle);
}

#[test]
fn test_latch_loses_no_work_across_threads() {
	const THREADS: usize = 8;
	const PER_THREAD: usize = 500;

	let latch = SyncLatch::new();
	let drained = AtomicUsize::new(0);

	std::thread::scope(|scope| {
		for _ in 0..THREADS {
			scope.spawn(|| {
				for _ in 0..PER_THREAD {
					if let Some(mut guard) = latch.enter(PendingScan::Refresh) {
						while let Some(batch) = guard.next_batch() {
							drained.fetch_add(batch.len(), Ordering::Relaxed);
						}
					}
				}
			});
		}
	});

	assert_eq!(drained.load(Ordering::Relaxed), THREADS * PER_THREAD);
	assert_eq!(latch.state(), SyncState::Idle);
}
