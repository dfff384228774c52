//! Projection configuration.
//!
//! ```toml
//! reference-file = "nodejsref.js"
//! wrapper-fn = "__cloak_module"
//! ```
//!
//! Missing keys fall back to their defaults; unknown keys are rejected.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::header::{DEFAULT_REFERENCE_FILE, DEFAULT_WRAPPER_FN, HeaderTemplate};

/// Settings that shape the synthesized header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectionConfig {
	/// Declaration file referenced on the first header line.
	pub reference_file: String,
	/// Name of the function the body is wrapped in.
	pub wrapper_fn: String,
}

impl Default for ProjectionConfig {
	fn default() -> Self {
		Self {
			reference_file: DEFAULT_REFERENCE_FILE.to_string(),
			wrapper_fn: DEFAULT_WRAPPER_FN.to_string(),
		}
	}
}

impl ProjectionConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates the file at `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Checks that every field can be embedded in the header.
	pub fn validate(&self) -> Result<()> {
		if self.reference_file.trim().is_empty() {
			return Err(ConfigError::MissingField("reference-file"));
		}
		if !is_identifier(&self.wrapper_fn) {
			return Err(ConfigError::InvalidIdentifier(self.wrapper_fn.clone()));
		}
		Ok(())
	}

	/// Returns the header template these settings describe.
	pub fn template(&self) -> HeaderTemplate {
		HeaderTemplate::from(self)
	}
}

impl From<&ProjectionConfig> for HeaderTemplate {
	fn from(config: &ProjectionConfig) -> Self {
		HeaderTemplate::new(config.reference_file.as_str(), config.wrapper_fn.as_str())
	}
}

/// ASCII JavaScript identifier: `[A-Za-z_$][A-Za-z0-9_$]*`.
fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	chars
		.next()
		.is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
