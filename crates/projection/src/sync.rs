//! Incremental header maintenance.
//!
//! [`ChangeSynchronizer`] decides, per edit batch, whether the leading trivia
//! of the body may have changed. Only edits starting at or before the last
//! known trivia boundary trigger a re-scan; everything else costs one offset
//! comparison per edit.
//!
//! [`SyncLatch`] guards against re-entrant and concurrent delivery: a
//! consumer that edits the body from inside a change notification, or a
//! second thread editing the buffer, causes a new batch to arrive while the
//! previous one is still being processed. Such batches are queued and drained
//! by the pass already running.

use cloak_buffer::BufferSnapshot;
use cloak_lexer::Tokenizer;
use cloak_primitives::{CharIdx, EditBatch};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::header::HeaderTemplate;
use crate::lookup::{self, AuxiliaryLookup};
use crate::trivia::find_trivia_end;

/// Result of feeding one batch or refresh to a [`ChangeSynchronizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
	/// No edit reached the trivia boundary.
	Ignored,
	/// The body was re-scanned and the header came out identical.
	Unchanged,
	/// The header changed; carries the new header text.
	Replaced(String),
}

/// Tracks the trivia boundary and the header derived from it.
pub struct ChangeSynchronizer {
	tokenizer: Box<dyn Tokenizer>,
	lookup: Box<dyn AuxiliaryLookup>,
	template: HeaderTemplate,
	boundary: CharIdx,
	header: String,
	scanned_version: u64,
}

impl ChangeSynchronizer {
	/// Scans `snapshot` and synthesizes the initial header.
	pub fn new(
		tokenizer: Box<dyn Tokenizer>,
		lookup: Box<dyn AuxiliaryLookup>,
		template: HeaderTemplate,
		snapshot: &BufferSnapshot,
	) -> Self {
		let mut sync = Self {
			tokenizer,
			lookup,
			template,
			boundary: 0,
			header: String::new(),
			scanned_version: snapshot.version,
		};
		let (boundary, header) = sync.synthesize(snapshot);
		sync.boundary = boundary;
		sync.header = header;
		sync
	}

	/// Char offset in the body where the leading trivia ended at the last scan.
	pub fn boundary(&self) -> CharIdx {
		self.boundary
	}

	/// Header produced by the last scan.
	pub fn header(&self) -> &str {
		&self.header
	}

	pub fn template(&self) -> &HeaderTemplate {
		&self.template
	}

	/// Returns true if some edit in `batch` starts at or before the boundary.
	pub fn qualifies(&self, batch: &EditBatch) -> bool {
		batch.first_at_or_before(self.boundary).is_some()
	}

	/// Buffer version the boundary and header were last computed from.
	pub fn scanned_version(&self) -> u64 {
		self.scanned_version
	}

	/// Handles a batch that has already been applied to the body.
	///
	/// `snapshot` must be the newest buffer state, not necessarily the one
	/// the batch produced. A batch the last scan already covers is ignored,
	/// so late notifications never roll the header back.
	pub fn on_edits(&mut self, snapshot: &BufferSnapshot, batch: &EditBatch) -> SyncOutcome {
		if batch.version <= self.scanned_version {
			trace!(
				version = batch.version,
				scanned_version = self.scanned_version,
				"Edits already covered by last scan"
			);
			return SyncOutcome::Ignored;
		}
		if !self.qualifies(batch) {
			trace!(
				boundary = self.boundary,
				version = batch.version,
				"Edits past trivia boundary"
			);
			return SyncOutcome::Ignored;
		}
		self.rescan(snapshot)
	}

	/// Re-scans `snapshot` unconditionally.
	///
	/// An older snapshot than the last one scanned is skipped.
	pub fn rescan(&mut self, snapshot: &BufferSnapshot) -> SyncOutcome {
		if snapshot.version < self.scanned_version {
			trace!(
				version = snapshot.version,
				scanned_version = self.scanned_version,
				"Stale snapshot"
			);
			return SyncOutcome::Unchanged;
		}
		let (boundary, header) = self.synthesize(snapshot);
		debug!(
			old_boundary = self.boundary,
			boundary,
			version = snapshot.version,
			"Re-scanned leading trivia"
		);
		self.boundary = boundary;
		self.scanned_version = snapshot.version;

		if header == self.header {
			return SyncOutcome::Unchanged;
		}
		self.header.clone_from(&header);
		SyncOutcome::Replaced(header)
	}

	fn synthesize(&self, snapshot: &BufferSnapshot) -> (CharIdx, String) {
		let text = snapshot.text.to_string();
		let boundary = find_trivia_end(self.tokenizer.as_ref(), &text);
		let trivia = snapshot.text.slice(..boundary).to_string();

		let path = snapshot.path.as_deref();
		let auxiliary = lookup::resolve(self.lookup.as_ref(), path);
		if auxiliary.is_none() {
			trace!(path = ?path, "No auxiliary reference");
		}
		let file_path = path.map(|p| p.to_string_lossy());

		let header = self
			.template
			.render(&trivia, auxiliary.as_deref(), file_path.as_deref());
		(boundary, header)
	}
}

impl std::fmt::Debug for ChangeSynchronizer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChangeSynchronizer")
			.field("template", &self.template)
			.field("boundary", &self.boundary)
			.field("header_len", &self.header.len())
			.finish_non_exhaustive()
	}
}

/// Whether a projection is currently processing a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
	Idle,
	Scanning,
}

/// Work that arrived while a scan was running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingScan {
	/// An edit batch from the body.
	Edits(EditBatch),
	/// An explicit re-scan request, such as after a rename.
	Refresh,
}

/// Idle/Scanning guard with a queue of work.
///
/// The flag and the queue share one lock, so work queued while a pass is
/// finishing is either drained by that pass or admits a new one; it is never
/// left behind.
#[derive(Debug, Default)]
pub struct SyncLatch {
	inner: Mutex<LatchInner>,
}

#[derive(Debug, Default)]
struct LatchInner {
	scanning: bool,
	pending: Vec<PendingScan>,
}

impl SyncLatch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> SyncState {
		if self.inner.lock().scanning {
			SyncState::Scanning
		} else {
			SyncState::Idle
		}
	}

	/// Queues `scan` and moves from Idle to Scanning.
	///
	/// Returns `None` if a pass is already running; that pass picks up
	/// `scan` through [`ScanGuard::next_batch`].
	pub fn enter(&self, scan: PendingScan) -> Option<ScanGuard<'_>> {
		let mut inner = self.inner.lock();
		inner.pending.push(scan);
		if inner.scanning {
			return None;
		}
		inner.scanning = true;
		Some(ScanGuard {
			latch: self,
			released: false,
		})
	}
}

/// Holds a [`SyncLatch`] in the Scanning state while a pass drains it.
#[derive(Debug)]
pub struct ScanGuard<'a> {
	latch: &'a SyncLatch,
	released: bool,
}

impl ScanGuard<'_> {
	/// Takes all queued work in arrival order.
	///
	/// Returns `None` once the queue is empty, and in the same critical
	/// section moves the latch back to Idle.
	pub fn next_batch(&mut self) -> Option<Vec<PendingScan>> {
		if self.released {
			return None;
		}
		let mut inner = self.latch.inner.lock();
		if inner.pending.is_empty() {
			inner.scanning = false;
			self.released = true;
			return None;
		}
		Some(std::mem::take(&mut inner.pending))
	}
}

impl Drop for ScanGuard<'_> {
	fn drop(&mut self) {
		if self.released {
			return;
		}
		// The pass unwound with work outstanding.
		let mut inner = self.latch.inner.lock();
		inner.scanning = false;
		inner.pending.clear();
	}
}

#[cfg(test)]
mod tests;
