use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use cloak_primitives::{
	CharIdx, CharLen, CharRange, EditBatch, Rope, Tendril, Transaction,
};
use parking_lot::RwLock;
use slab::Slab;
use tracing::trace;

use crate::error::{BufferError, Result};
use crate::listener::EditListener;
use crate::track::{TrackId, TrackedRange};

/// Counter for generating unique buffer IDs.
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

impl BufferId {
	/// Generates a new unique buffer ID.
	pub fn next() -> Self {
		Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// Immutable view of a buffer at one version.
///
/// Cloning the rope is cheap, so snapshots are handed to listeners by value
/// and stay valid while the buffer keeps changing.
#[derive(Debug, Clone)]
pub struct BufferSnapshot {
	/// Buffer the snapshot was taken from.
	pub id: BufferId,
	/// Full text.
	pub text: Rope,
	/// Associated file path, if any.
	pub path: Option<PathBuf>,
	/// Version the snapshot reflects.
	pub version: u64,
}

/// Editable text owned by the host.
///
/// Core fields are private: text only changes through [`Buffer::apply`], which
/// also advances the version and remaps every tracked range.
pub struct Buffer {
	id: BufferId,
	content: Rope,
	path: Option<PathBuf>,
	version: u64,
	tracks: Slab<TrackedRange>,
	pub(crate) listeners: Vec<Weak<dyn EditListener>>,
}

impl Buffer {
	/// Creates a buffer holding `content`.
	pub fn new(content: &str, path: Option<PathBuf>) -> Self {
		Self {
			id: BufferId::next(),
			content: Rope::from(content),
			path,
			version: 0,
			tracks: Slab::new(),
			listeners: Vec::new(),
		}
	}

	/// Returns the buffer ID.
	pub fn id(&self) -> BufferId {
		self.id
	}

	/// Returns the text.
	pub fn content(&self) -> &Rope {
		&self.content
	}

	/// Returns the associated file path.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Returns the current version; starts at 0 and increases on every
	/// applied transaction that changes text.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the length in chars.
	pub fn len_chars(&self) -> CharLen {
		self.content.len_chars()
	}

	/// Takes a snapshot of the current state.
	pub fn snapshot(&self) -> BufferSnapshot {
		BufferSnapshot {
			id: self.id,
			text: self.content.clone(),
			path: self.path.clone(),
			version: self.version,
		}
	}

	/// Applies `tx`, remaps tracked ranges and returns the resulting batch.
	///
	/// Transactions that leave the text untouched do not advance the version
	/// and produce an empty batch.
	pub fn apply(&mut self, tx: &Transaction) -> Result<EditBatch> {
		let expected = tx.changes().len();
		let actual = self.content.len_chars();
		if expected != actual {
			return Err(BufferError::LengthMismatch { expected, actual });
		}

		if tx.changes().is_identity() {
			return Ok(EditBatch::new(self.version, []));
		}

		tx.apply(&mut self.content);
		for (_, track) in self.tracks.iter_mut() {
			track.map(tx.changes());
		}
		self.version += 1;

		let batch = EditBatch::new(self.version, tx.edits());
		trace!(
			buffer = ?self.id,
			version = self.version,
			edits = batch.len(),
			"Applied transaction"
		);
		Ok(batch)
	}

	/// Starts tracking `range`.
	pub fn track(&mut self, range: CharRange) -> Result<TrackId> {
		self.check_range(&range)?;
		Ok(TrackId(self.tracks.insert(TrackedRange::new(range))))
	}

	/// Tracks the whole text, including anything later inserted at either end.
	pub fn track_all(&mut self) -> TrackId {
		TrackId(self.tracks.insert(TrackedRange::new(0..self.len_chars())))
	}

	/// Stops tracking `id`.
	pub fn untrack(&mut self, id: TrackId) -> Result<()> {
		self.tracks
			.try_remove(id.0)
			.map(drop)
			.ok_or(BufferError::UnknownTrack(id))
	}

	/// Returns the current extent of a tracked range.
	pub fn tracked_range(&self, id: TrackId) -> Result<CharRange> {
		self.tracks
			.get(id.0)
			.map(TrackedRange::range)
			.ok_or(BufferError::UnknownTrack(id))
	}

	fn check_range(&self, range: &CharRange) -> Result<()> {
		let len = self.len_chars();
		if range.start > range.end || range.end > len {
			return Err(BufferError::RangeOutOfBounds {
				start: range.start,
				end: range.end,
				len,
			});
		}
		Ok(())
	}

	/// Returns live listeners, dropping the ones whose owner went away.
	fn live_listeners(&mut self) -> Vec<Arc<dyn EditListener>> {
		let mut live = Vec::with_capacity(self.listeners.len());
		self.listeners.retain(|weak| match weak.upgrade() {
			Some(listener) => {
				live.push(listener);
				true
			}
			None => false,
		});
		live
	}
}

/// Shared handle to a [`Buffer`].
#[derive(Clone)]
pub struct BufferHandle(Arc<RwLock<Buffer>>);

impl BufferHandle {
	/// Creates a buffer and wraps it in a handle.
	pub fn new(content: &str, path: Option<PathBuf>) -> Self {
		Self(Arc::new(RwLock::new(Buffer::new(content, path))))
	}

	/// Runs `f` with shared access to the buffer.
	pub fn with<R>(&self, f: impl FnOnce(&Buffer) -> R) -> R {
		let guard = self.0.read();
		f(&guard)
	}

	fn with_mut<R>(&self, f: impl FnOnce(&mut Buffer) -> R) -> R {
		let mut guard = self.0.write();
		f(&mut guard)
	}

	/// Returns the buffer ID.
	pub fn id(&self) -> BufferId {
		self.with(Buffer::id)
	}

	/// Takes a snapshot of the current state.
	pub fn snapshot(&self) -> BufferSnapshot {
		self.with(Buffer::snapshot)
	}

	/// Returns the full text as a string.
	pub fn text(&self) -> String {
		self.with(|buffer| buffer.content().to_string())
	}

	/// Returns the length in chars.
	pub fn len_chars(&self) -> CharLen {
		self.with(Buffer::len_chars)
	}

	/// Returns the current version.
	pub fn version(&self) -> u64 {
		self.with(Buffer::version)
	}

	/// Returns the associated file path.
	pub fn path(&self) -> Option<PathBuf> {
		self.with(|buffer| buffer.path.clone())
	}

	/// Registers a listener for edit notifications.
	///
	/// The buffer keeps only a weak reference; dropping the listener's last
	/// strong reference unsubscribes it.
	pub fn subscribe(&self, listener: Weak<dyn EditListener>) {
		self.with_mut(|buffer| buffer.listeners.push(listener));
	}

	/// Applies `tx` and notifies listeners.
	pub fn apply(&self, tx: &Transaction) -> Result<EditBatch> {
		let (batch, snapshot, listeners) = self.with_mut(|buffer| {
			let batch = buffer.apply(tx)?;
			let listeners = if batch.is_empty() {
				Vec::new()
			} else {
				buffer.live_listeners()
			};
			Ok::<_, BufferError>((batch, buffer.snapshot(), listeners))
		})?;

		for listener in listeners {
			listener.on_edits(&snapshot, &batch);
		}
		Ok(batch)
	}

	/// Inserts `text` at `pos`.
	pub fn insert(&self, pos: CharIdx, text: impl Into<Tendril>) -> Result<EditBatch> {
		let tx = self.with(|buffer| {
			buffer.check_range(&(pos..pos))?;
			Ok::<_, BufferError>(Transaction::insert(buffer.content.slice(..), pos, text))
		})?;
		self.apply(&tx)
	}

	/// Deletes `range`.
	pub fn delete(&self, range: CharRange) -> Result<EditBatch> {
		let tx = self.with(|buffer| {
			buffer.check_range(&range)?;
			Ok::<_, BufferError>(Transaction::delete(buffer.content.slice(..), range))
		})?;
		self.apply(&tx)
	}

	/// Replaces `range` with `text`.
	pub fn replace(&self, range: CharRange, text: impl Into<Tendril>) -> Result<EditBatch> {
		let tx = self.with(|buffer| {
			buffer.check_range(&range)?;
			Ok::<_, BufferError>(Transaction::replace(buffer.content.slice(..), range, text))
		})?;
		self.apply(&tx)
	}

	/// Changes the associated file path and notifies listeners.
	pub fn set_path(&self, path: Option<PathBuf>) {
		let (snapshot, listeners) = self.with_mut(|buffer| {
			buffer.path = path;
			(buffer.snapshot(), buffer.live_listeners())
		});
		trace!(buffer = ?snapshot.id, path = ?snapshot.path, "Path changed");

		for listener in listeners {
			listener.on_path_changed(&snapshot);
		}
	}

	/// Starts tracking `range`.
	pub fn track(&self, range: CharRange) -> Result<TrackId> {
		self.with_mut(|buffer| buffer.track(range))
	}

	/// Tracks the whole text.
	pub fn track_all(&self) -> TrackId {
		self.with_mut(Buffer::track_all)
	}

	/// Stops tracking `id`.
	pub fn untrack(&self, id: TrackId) -> Result<()> {
		self.with_mut(|buffer| buffer.untrack(id))
	}

	/// Returns the current extent of a tracked range.
	pub fn tracked_range(&self, id: TrackId) -> Result<CharRange> {
		self.with(|buffer| buffer.tracked_range(id))
	}
}

impl std::fmt::Debug for BufferHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.with(|buffer| {
			f.debug_struct("BufferHandle")
				.field("id", &buffer.id)
				.field("version", &buffer.version)
				.field("len_chars", &buffer.len_chars())
				.finish()
		})
	}
}
