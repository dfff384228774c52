//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use cloak_primitives::CharIdx;

/// Projects a script into its composite document and prints it.
#[derive(Parser, Debug)]
#[command(name = "cloak")]
#[command(about = "Wrap a script between synthesized header and footer text")]
pub struct Cli {
	/// Script to project
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// TOML configuration file
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Override the primary reference file
	#[arg(long, value_name = "NAME")]
	pub reference_file: Option<String>,

	/// Auxiliary reference path returned by the lookup
	#[arg(long, value_name = "PATH")]
	pub aux: Option<String>,

	/// Insert TEXT at char OFFSET of the body after attaching (repeatable)
	#[arg(short, long = "edit", value_name = "OFFSET:TEXT", value_parser = parse_edit)]
	pub edits: Vec<EditArg>,

	/// Print only the visible body instead of the whole composite
	#[arg(long)]
	pub visible: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

/// An insertion requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditArg {
	pub offset: CharIdx,
	pub text: String,
}

/// Parses `OFFSET:TEXT`, expanding `\n`, `\r`, `\t` and `\\` in TEXT.
pub fn parse_edit(input: &str) -> Result<EditArg, String> {
	let (offset, text) = input
		.split_once(':')
		.ok_or_else(|| format!("expected OFFSET:TEXT, got {input:?}"))?;
	let offset = offset
		.trim()
		.parse()
		.map_err(|err| format!("invalid offset {offset:?}: {err}"))?;
	Ok(EditArg {
		offset,
		text: unescape(text),
	})
}

fn unescape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('t') => out.push('\t'),
			Some('\\') => out.push('\\'),
			Some(other) => {
				out.push('\\');
				out.push(other);
			}
			None => out.push('\\'),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::plain("3:abc", 3, "abc")]
	#[case::newline("0:// a\\n", 0, "// a\n")]
	#[case::colon_in_text("7:a:b", 7, "a:b")]
	#[case::crlf("1:\\r\\n", 1, "\r\n")]
	#[case::backslash("2:C:\\\\x", 2, "C:\\x")]
	#[case::unknown_escape("2:\\q", 2, "\\q")]
	#[case::trailing_backslash("2:a\\", 2, "a\\")]
	#[case::empty_text("4:", 4, "")]
	fn test_parse_edit(#[case] input: &str, #[case] offset: CharIdx, #[case] text: &str) {
		assert_eq!(
			parse_edit(input),
			Ok(EditArg {
				offset,
				text: text.to_string(),
			})
		);
	}

	#[rstest]
	#[case::no_colon("abc")]
	#[case::negative("-1:x")]
	#[case::not_a_number("x:y")]
	fn test_parse_edit_rejects(#[case] input: &str) {
		assert!(parse_edit(input).is_err());
	}

	#[test]
	fn test_cli_definition() {
		Cli::command().debug_assert();
	}

	#[test]
	fn test_repeated_edits() {
		let cli = Cli::try_parse_from(["cloak", "a.js", "-e", "0:x", "--edit", "1:y", "--visible"]).unwrap();
		assert_eq!(cli.edits.len(), 2);
		assert_eq!(cli.edits[1].text, "y");
		assert!(cli.visible);
	}
}
