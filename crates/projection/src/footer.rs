/// Text closing the wrapper function opened by the header.
///
/// The leading line break terminates the last body line, which may not end
/// with one.
pub const FOOTER: &str = "\r\nreturn module.exports;\r\n}";

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_footer_bytes() {
		assert_eq!(FOOTER.as_bytes(), b"\r\nreturn module.exports;\r\n}");
	}
}
