//! Core types for text editing: char ranges, edit records and transactions.

/// Edit records delivered to buffer listeners.
pub mod edit;
/// Char index, length and range types.
pub mod range;
/// Change sets and transactions with position mapping.
pub mod transaction;

pub use edit::{EditBatch, TextEdit};
pub use range::{CharIdx, CharLen, CharRange};
pub use ropey::{Rope, RopeSlice};
pub use transaction::{Bias, Change, ChangeSet, Tendril, Transaction};
