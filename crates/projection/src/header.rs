//! Header synthesis.
//!
//! The header is the text placed in front of the body in the composite. It
//! repeats the body's leading trivia, references the declaration files the
//! analyzer should load, and opens a wrapper function that gives the body
//! CommonJS module locals. [`FOOTER`](crate::FOOTER) closes the function.
//!
//! Every line, the last one included, ends with CRLF.

const CRLF: &str = "\r\n";

/// Reference file used when no configuration overrides it.
pub const DEFAULT_REFERENCE_FILE: &str = "nodejsref.js";

/// Wrapper function name used when no configuration overrides it.
pub const DEFAULT_WRAPPER_FN: &str = "__cloak_module";

/// Everything the header depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInputs<'a> {
	/// Leading trivia of the body, copied verbatim.
	pub trivia: &'a str,
	/// Primary reference file.
	pub reference_file: &'a str,
	/// Auxiliary reference file from the host lookup.
	pub auxiliary_path: Option<&'a str>,
	/// Path of the document on disk.
	pub file_path: Option<&'a str>,
	/// Name of the wrapper function.
	pub wrapper_fn: &'a str,
}

/// Builds header text from `inputs`.
pub fn synthesize(inputs: &HeaderInputs<'_>) -> String {
	let file_path = inputs.file_path.filter(|path| !path.trim().is_empty());

	let mut out = String::with_capacity(inputs.trivia.len() + 256);
	push_line(&mut out, &[inputs.trivia]);
	push_reference(&mut out, inputs.reference_file);
	if let Some(aux) = inputs.auxiliary_path {
		push_reference(&mut out, aux);
	}

	push_line(&mut out, &["function ", inputs.wrapper_fn, "() {"]);
	let filename = file_path.map(escape_path).unwrap_or_default();
	push_line(&mut out, &["__filename = \"", &filename, "\";"]);
	if let Some(path) = file_path {
		push_line(&mut out, &["__dirname = \"", &escape_path(directory_of(path)), "\";"]);
	}
	push_line(&mut out, &["var exports = {};"]);
	push_line(&mut out, &["var module = {};"]);
	push_line(&mut out, &["module.exports = exports;"]);
	out
}

fn push_reference(out: &mut String, path: &str) {
	push_line(out, &["/// <reference path=\"", path, "\" />"]);
}

fn push_line(out: &mut String, parts: &[&str]) {
	for part in parts {
		out.push_str(part);
	}
	out.push_str(CRLF);
}

/// Doubles every backslash so `path` can sit inside a double-quoted string
/// literal. Nothing else is escaped.
pub fn escape_path(path: &str) -> String {
	path.replace('\\', "\\\\")
}

/// Returns everything before the last `\` or `/` in `path`.
///
/// Both separators are honoured on every platform so the generated text does
/// not depend on the host. A path without a separator is its own directory.
pub fn directory_of(path: &str) -> &str {
	path.rfind(|c: char| c == '\\' || c == '/')
		.map_or(path, |idx| &path[..idx])
}

/// Fixed part of the header: which reference file to load and what to call
/// the wrapper function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
	reference_file: String,
	wrapper_fn: String,
}

impl HeaderTemplate {
	/// Creates a template.
	pub fn new(reference_file: impl Into<String>, wrapper_fn: impl Into<String>) -> Self {
		Self {
			reference_file: reference_file.into(),
			wrapper_fn: wrapper_fn.into(),
		}
	}

	/// Returns a copy that wraps the body in a function named `name`.
	///
	/// Used when a module body is projected on its own rather than as the
	/// top-level script.
	pub fn with_wrapper_fn(&self, name: impl Into<String>) -> Self {
		Self {
			reference_file: self.reference_file.clone(),
			wrapper_fn: name.into(),
		}
	}

	pub fn reference_file(&self) -> &str {
		&self.reference_file
	}

	pub fn wrapper_fn(&self) -> &str {
		&self.wrapper_fn
	}

	/// Renders the header for one document state.
	pub fn render(&self, trivia: &str, auxiliary_path: Option<&str>, file_path: Option<&str>) -> String {
		synthesize(&HeaderInputs {
			trivia,
			reference_file: &self.reference_file,
			auxiliary_path,
			file_path,
			wrapper_fn: &self.wrapper_fn,
		})
	}
}

impl Default for HeaderTemplate {
	fn default() -> Self {
		Self::new(DEFAULT_REFERENCE_FILE, DEFAULT_WRAPPER_FN)
	}
}
