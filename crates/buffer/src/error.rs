//! Error types for buffer operations.

use cloak_primitives::{CharIdx, CharLen};
use thiserror::Error;

use crate::track::TrackId;

/// Errors that can occur when editing or querying a buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
	/// A transaction was built against a document of a different length.
	#[error("transaction expects a document of {expected} chars, buffer has {actual}")]
	LengthMismatch {
		/// Source length the transaction was built for.
		expected: CharLen,
		/// Current buffer length.
		actual: CharLen,
	},

	/// A range does not fit inside the buffer.
	#[error("range {start}..{end} out of bounds for buffer of {len} chars")]
	RangeOutOfBounds {
		/// Requested start.
		start: CharIdx,
		/// Requested end.
		end: CharIdx,
		/// Current buffer length.
		len: CharLen,
	},

	/// The tracked range was released or never existed.
	#[error("unknown tracked range {0:?}")]
	UnknownTrack(TrackId),
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
