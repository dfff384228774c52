//! Error types for projection configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or validating a [`ProjectionConfig`].
///
/// [`ProjectionConfig`]: crate::ProjectionConfig
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A required field is blank.
	#[error("missing required field: {0}")]
	MissingField(&'static str),

	/// The wrapper function name is not a valid identifier.
	#[error("invalid wrapper function name: {0:?}")]
	InvalidIdentifier(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
