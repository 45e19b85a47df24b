use std::path::Path;
use std::path::PathBuf;

use crate::GroupStackError;
use crate::GroupStackResult;
use crate::diff::preview_diff;
use crate::fs_mode::DEFAULT_FILE_MODE;
use crate::fs_mode::set_mode;
use crate::merge::FileMap;
use crate::merge::MergedEntry;
use crate::render::render_segments;
use crate::scanner::TextSegment;

/// Options controlling how a composed file map is written.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
	/// Mode given to a rendered text file when none of its segments has one.
	pub default_mode: u32,
	/// Render and diff every file without touching the destination.
	pub dry_run: bool,
}

impl Default for MaterializeOptions {
	fn default() -> Self {
		Self {
			default_mode: DEFAULT_FILE_MODE,
			dry_run: false,
		}
	}
}

/// What happened to a single destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FileAction {
	/// The directory was created if needed and its mode applied.
	Directory,
	/// The binary source was copied verbatim.
	Binary,
	/// A new text file was rendered.
	Created,
	/// An existing text file was rewritten with significant changes.
	Updated { diff: String },
	/// An existing text file was rewritten, differing at most in whitespace.
	Unchanged,
	/// A text entry without segments; nothing was written.
	Skipped,
}

/// A successfully processed destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
	pub path: PathBuf,
	pub action: FileAction,
}

/// A destination path that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
	pub path: PathBuf,
	pub message: String,
}

/// Result of materializing a file map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
	/// Processed paths, in the order they were written.
	pub outcomes: Vec<FileOutcome>,
	/// Failures. Each one only affected its own path.
	pub errors: Vec<FileError>,
}

impl MaterializeReport {
	/// Returns true when every path was processed without error.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}

	/// Number of text files that were created or changed significantly.
	pub fn changed_count(&self) -> usize {
		self.outcomes
			.iter()
			.filter(|outcome| {
				matches!(
					outcome.action,
					FileAction::Created | FileAction::Updated { .. }
				)
			})
			.count()
	}

	/// The action recorded for `path`, if it was processed successfully.
	pub fn action_for(&self, path: &Path) -> Option<&FileAction> {
		self.outcomes
			.iter()
			.find(|outcome| outcome.path == path)
			.map(|outcome| &outcome.action)
	}
}

/// Writes a composed [`FileMap`] below a destination directory.
#[derive(Debug, Clone)]
pub struct Materializer {
	destination: PathBuf,
	options: MaterializeOptions,
}

impl Materializer {
	pub fn new(destination: impl Into<PathBuf>) -> Self {
		Self::with_options(destination, MaterializeOptions::default())
	}

	pub fn with_options(destination: impl Into<PathBuf>, options: MaterializeOptions) -> Self {
		Self {
			destination: destination.into(),
			options,
		}
	}

	pub fn destination(&self) -> &Path {
		&self.destination
	}

	/// Write every entry of `files`, one at a time.
	///
	/// A failing path is logged and recorded, then the next path is processed.
	/// Paths written before a failure are left in place.
	pub fn materialize(&self, files: &FileMap) -> MaterializeReport {
		let mut report = MaterializeReport::default();

		for (relative, entry) in files {
			let target = self.destination.join(relative);

			match self.process_entry(&target, entry) {
				Ok(action) => {
					report.outcomes.push(FileOutcome {
						path: target,
						action,
					});
				}
				Err(e) => {
					tracing::error!(path = %target.display(), "{e}");
					report.errors.push(FileError {
						path: target,
						message: e.to_string(),
					});
				}
			}
		}

		report
	}

	fn process_entry(&self, target: &Path, entry: &MergedEntry) -> GroupStackResult<FileAction> {
		match entry {
			MergedEntry::Directory { mode } => self.write_directory(target, *mode),
			MergedEntry::Binary { source, mode } => self.copy_binary(source, target, *mode),
			MergedEntry::Text(segments) => self.write_text(target, segments),
		}
	}

	fn write_directory(&self, target: &Path, mode: u32) -> GroupStackResult<FileAction> {
		if self.options.dry_run {
			return Ok(FileAction::Directory);
		}

		std::fs::create_dir_all(target)
			.map_err(|e| GroupStackError::file_operation("create directory", target, &e))?;
		apply_mode(target, mode)?;

		Ok(FileAction::Directory)
	}

	fn copy_binary(&self, source: &Path, target: &Path, mode: u32) -> GroupStackResult<FileAction> {
		tracing::info!("Creating {}", target.display());

		if self.options.dry_run {
			return Ok(FileAction::Binary);
		}

		create_parent(target)?;
		std::fs::copy(source, target)
			.map_err(|e| GroupStackError::file_operation("copy", source, &e))?;
		apply_mode(target, mode)?;

		Ok(FileAction::Binary)
	}

	fn write_text(&self, target: &Path, segments: &[TextSegment]) -> GroupStackResult<FileAction> {
		if segments.is_empty() {
			return Ok(FileAction::Skipped);
		}

		let contents = render_segments(segments)?;

		let action = if target.exists() {
			tracing::info!("Updating {}", target.display());
			let current = std::fs::read(target)
				.map_err(|e| GroupStackError::file_operation("read", target, &e))?;

			match preview_diff(&String::from_utf8_lossy(&current), &contents) {
				Some(diff) => {
					tracing::info!("{diff}");
					FileAction::Updated { diff }
				}
				None => FileAction::Unchanged,
			}
		} else {
			tracing::info!("Creating {}", target.display());
			FileAction::Created
		};

		if self.options.dry_run {
			return Ok(action);
		}

		create_parent(target)?;
		std::fs::write(target, &contents)
			.map_err(|e| GroupStackError::file_operation("write", target, &e))?;
		apply_mode(target, text_mode(segments, self.options.default_mode))?;

		Ok(action)
	}
}

/// The mode of the most specific segment that carries one.
pub fn text_mode(segments: &[TextSegment], default_mode: u32) -> u32 {
	segments
		.iter()
		.rev()
		.map(|segment| segment.mode)
		.find(|mode| *mode != 0)
		.unwrap_or(default_mode)
}

fn create_parent(target: &Path) -> GroupStackResult<()> {
	if let Some(parent) = target.parent() {
		std::fs::create_dir_all(parent)
			.map_err(|e| GroupStackError::file_operation("create directory", parent, &e))?;
	}

	Ok(())
}

fn apply_mode(target: &Path, mode: u32) -> GroupStackResult<()> {
	set_mode(target, mode).map_err(|e| GroupStackError::file_operation("change mode of", target, &e))
}
