//! Host text buffer.
//!
//! A [`BufferHandle`] is the externally owned, editable text that a
//! projection wraps. It offers exactly what the projection engine needs from
//! a host editor:
//!
//! - a current snapshot (text, file path, version),
//! - ordered [`EditBatch`] notifications delivered to [`EditListener`]s,
//! - tracked ranges ([`TrackId`]) that the buffer keeps valid across edits.
//!
//! Listeners are held weakly and are notified after the buffer lock has been
//! released, so a listener may read or even edit the buffer from inside its
//! callback.
//!
//! [`EditBatch`]: cloak_primitives::EditBatch

mod buffer;
mod error;
mod listener;
mod track;

#[cfg(test)]
mod tests;

pub use buffer::{Buffer, BufferHandle, BufferId, BufferSnapshot};
pub use error::{BufferError, Result};
pub use listener::EditListener;
pub use track::TrackId;
