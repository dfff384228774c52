use cloak_primitives::EditBatch;

use crate::buffer::BufferSnapshot;

/// Receiver of buffer change notifications.
///
/// Callbacks run synchronously on the thread that edited the buffer, after
/// the edit has been applied and the buffer lock released.
pub trait EditListener: Send + Sync {
	/// Called once per applied transaction that changed the text.
	///
	/// `snapshot` is the buffer state right after `batch` was applied.
	fn on_edits(&self, snapshot: &BufferSnapshot, batch: &EditBatch);

	/// Called when the buffer's file path changes.
	fn on_path_changed(&self, snapshot: &BufferSnapshot) {
		let _ = snapshot;
	}
}
