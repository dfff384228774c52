//! `cloak` binary.
//!
//! Loads a script into a buffer, attaches a projection, replays the requested
//! edits through the buffer and prints the composite document.

mod cli;

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cloak_buffer::BufferHandle;
use cloak_projection::{Projection, ProjectionConfig};
use tracing::{debug, info};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if cli.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let mut config = match &cli.config {
		Some(path) => ProjectionConfig::load(path)?,
		None => ProjectionConfig::default(),
	};
	if let Some(reference_file) = cli.reference_file {
		config.reference_file = reference_file;
	}

	let text = std::fs::read_to_string(&cli.file)
		.with_context(|| format!("failed to read {}", cli.file.display()))?;
	let path = std::path::absolute(&cli.file).unwrap_or_else(|_| cli.file.clone());
	let buffer = BufferHandle::new(&text, Some(path));

	let aux = cli.aux;
	let projection = Projection::attach(buffer.clone(), move |_: &Path| aux.clone(), &config)?;
	info!(
		boundary = projection.boundary(),
		header_len = projection.header().chars().count(),
		"Projected {}",
		cli.file.display()
	);

	for edit in &cli.edits {
		buffer
			.insert(edit.offset, edit.text.as_str())
			.with_context(|| format!("edit at offset {} failed", edit.offset))?;
		debug!(
			offset = edit.offset,
			boundary = projection.boundary(),
			version = projection.version(),
			"Applied edit"
		);
	}

	let output = if cli.visible {
		projection.visible_text()
	} else {
		projection.text()
	};
	std::io::stdout().lock().write_all(output.as_bytes())?;
	Ok(())
}
