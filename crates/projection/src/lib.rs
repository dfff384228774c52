//! Projection engine.
//!
//! A [`Projection`] presents a host buffer as a larger virtual document: a
//! synthesized header, the buffer's text (the body) and a fixed footer. The
//! header repeats the body's leading comments and wraps the body in a
//! function, so an analyzer can treat a plain script as a module. The body is
//! read through a tracked range and never copied.
//!
//! The header depends only on the leading trivia of the body and on the file
//! path. After each edit batch the [`ChangeSynchronizer`] compares edit
//! offsets against the last known trivia boundary and re-synthesizes the
//! header only when the leading comments may have changed. Replacing the
//! header shifts the body within the composite; [`ElisionView`] follows so a
//! consumer always sees exactly the body.
//!
//! ```
//! use cloak_buffer::BufferHandle;
//! use cloak_projection::{NoAuxiliary, Projection, ProjectionConfig};
//!
//! let buffer = BufferHandle::new("// hello\nvar x = 1;", None);
//! let projection = Projection::attach(buffer.clone(), NoAuxiliary, &ProjectionConfig::default())?;
//! assert!(projection.text().starts_with("// hello\n"));
//! assert_eq!(projection.visible_text(), "// hello\nvar x = 1;");
//!
//! buffer.replace(3..8, "world")?;
//! assert!(projection.header().starts_with("// world\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod composite;
pub mod config;
pub mod elision;
pub mod error;
pub mod footer;
pub mod header;
pub mod lookup;
pub mod projection;
pub mod sync;
pub mod trivia;

pub use composite::{BodyHandle, CompositeDocument, CompositeEdit, SegmentKind};
pub use config::ProjectionConfig;
pub use elision::ElisionView;
pub use error::{ConfigError, Result};
pub use footer::FOOTER;
pub use header::{
	DEFAULT_REFERENCE_FILE, DEFAULT_WRAPPER_FN, HeaderInputs, HeaderTemplate, directory_of,
	escape_path, synthesize,
};
pub use lookup::{AuxiliaryLookup, NoAuxiliary};
pub use projection::{CompositeListener, Projection, ProjectionBuilder};
pub use sync::{ChangeSynchronizer, PendingScan, ScanGuard, SyncLatch, SyncOutcome, SyncState};
pub use trivia::find_trivia_end;
