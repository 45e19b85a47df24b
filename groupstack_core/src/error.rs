use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum GroupStackError {
	#[error(transparent)]
	#[diagnostic(code(groupstack::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse group manifest `{path}`: {reason}")]
	#[diagnostic(
		code(groupstack::manifest_parse),
		help("a manifest is a JSON object with optional `include` and `params` objects")
	)]
	ManifestParse { path: String, reason: String },

	#[error("group `{name}` not found in `{config_path}`")]
	#[diagnostic(
		code(groupstack::group_not_found),
		help("create `{name}.json` or a `{name}/` directory inside the configuration path")
	)]
	GroupNotFound { name: String, config_path: String },

	#[error("group inclusion cycle detected: {chain}")]
	#[diagnostic(
		code(groupstack::include_cycle),
		help("remove one of the `include` entries that forms the cycle")
	)]
	IncludeCycle { chain: String },

	#[error("group inclusion is nested deeper than {limit} levels at `{name}`")]
	#[diagnostic(code(groupstack::include_depth))]
	IncludeDepthExceeded { name: String, limit: usize },

	#[error("directory `{path}` is nested deeper than {limit} levels")]
	#[diagnostic(code(groupstack::scan_depth))]
	ScanDepthExceeded { path: String, limit: usize },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(groupstack::symlink_cycle),
		help("remove the circular symlink from the group directory")
	)]
	SymlinkCycle { path: String },

	#[error("text source `{path}` is not valid UTF-8")]
	#[diagnostic(code(groupstack::source_not_utf8))]
	SourceNotUtf8 { path: String },

	#[error("template rendering failed for `{path}`: {reason}")]
	#[diagnostic(
		code(groupstack::template_render),
		help("every `<%= name %>` must refer to a parameter of the group that owns the file")
	)]
	TemplateRender { path: String, reason: String },

	#[error("failed to {operation} `{path}`: {reason}")]
	#[diagnostic(code(groupstack::file_operation))]
	FileOperation {
		operation: &'static str,
		path: String,
		reason: String,
	},
}

impl GroupStackError {
	pub(crate) fn file_operation(
		operation: &'static str,
		path: &std::path::Path,
		error: &std::io::Error,
	) -> Self {
		Self::FileOperation {
			operation,
			path: path.display().to_string(),
			reason: error.to_string(),
		}
	}
}

pub type GroupStackResult<T> = Result<T, GroupStackError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
