use std::path::Path;

/// Resolves the auxiliary declarations file referenced by a document's
/// header.
///
/// Implementations are host-provided and may consult anything (project
/// settings, a search path). Blank results are treated as absent.
pub trait AuxiliaryLookup: Send + Sync {
	/// Returns the auxiliary file path for the document at `file_path`.
	fn lookup_auxiliary_path(&self, file_path: &Path) -> Option<String>;
}

impl<F> AuxiliaryLookup for F
where
	F: Fn(&Path) -> Option<String> + Send + Sync,
{
	fn lookup_auxiliary_path(&self, file_path: &Path) -> Option<String> {
		self(file_path)
	}
}

/// Lookup that never finds an auxiliary file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuxiliary;

impl AuxiliaryLookup for NoAuxiliary {
	fn lookup_auxiliary_path(&self, _file_path: &Path) -> Option<String> {
		None
	}
}

/// Queries `lookup` for `file_path`, discarding blank answers.
pub(crate) fn resolve(lookup: &dyn AuxiliaryLookup, file_path: Option<&Path>) -> Option<String> {
	file_path
		.and_then(|path| lookup.lookup_auxiliary_path(path))
		.filter(|aux| !aux.trim().is_empty())
}
