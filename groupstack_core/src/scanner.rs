use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::GroupStackError;
use crate::GroupStackResult;
use crate::config::Params;
use crate::fs_mode::mode_of;

/// Maximum directory nesting below a group root.
pub const MAX_SCAN_DEPTH: usize = 64;

/// Number of leading bytes inspected to tell binary from text files.
const BINARY_SNIFF_BYTES: usize = 1024;

/// One renderable contribution to a composed text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
	/// Absolute path of the template inside its group directory.
	pub source: PathBuf,
	/// Permission bits of the source file.
	pub mode: u32,
	/// Parameters of the group that owns the source.
	pub params: Params,
}

/// A single entry found while scanning one group's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDescriptor {
	Directory { mode: u32 },
	Binary { source: PathBuf, mode: u32 },
	Text(TextSegment),
}

impl FileDescriptor {
	pub fn mode(&self) -> u32 {
		match self {
			Self::Directory { mode } | Self::Binary { mode, .. } => *mode,
			Self::Text(segment) => segment.mode,
		}
	}

	pub fn is_directory(&self) -> bool {
		matches!(self, Self::Directory { .. })
	}

	pub fn is_binary(&self) -> bool {
		matches!(self, Self::Binary { .. })
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text(_))
	}
}

/// Files of a single group keyed by their path relative to the group root.
pub type ScannedFiles = BTreeMap<PathBuf, FileDescriptor>;

/// Recursively scan `root`, the directory owned by a single group.
///
/// Text files are stamped with `params`. A missing `root` is an empty group,
/// not an error. The root directory itself is not part of the result.
pub fn scan_group_dir(root: &Path, params: &Params) -> GroupStackResult<ScannedFiles> {
	let mut files = ScannedFiles::new();

	if !root.is_dir() {
		tracing::debug!(path = %root.display(), "group directory not found, no files scanned");
		return Ok(files);
	}

	let mut ancestors = Vec::new();
	walk_dir(root, root, 0, params, &mut ancestors, &mut files)?;

	Ok(files)
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	depth: usize,
	params: &Params,
	ancestors: &mut Vec<PathBuf>,
	files: &mut ScannedFiles,
) -> GroupStackResult<()> {
	if depth > MAX_SCAN_DEPTH {
		return Err(GroupStackError::ScanDepthExceeded {
			path: dir.display().to_string(),
			limit: MAX_SCAN_DEPTH,
		});
	}

	// A symlink pointing back at one of its own ancestors would never end.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if ancestors.contains(&canonical) {
		return Err(GroupStackError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}
	ancestors.push(canonical);

	let mut entries = std::fs::read_dir(dir)?
		.map(|entry| entry.map(|entry| entry.path()))
		.collect::<Result<Vec<_>, _>>()?;
	entries.sort();

	for path in entries {
		// `metadata` follows symlinks, so a linked file is scanned as its target.
		let metadata = match std::fs::metadata(&path) {
			Ok(metadata) => metadata,
			Err(e) => {
				tracing::debug!(path = %path.display(), error = %e, "skipping unreadable entry");
				continue;
			}
		};

		let Ok(relative) = path.strip_prefix(root) else {
			continue;
		};
		let relative = relative.to_path_buf();
		let mode = mode_of(&metadata);

		if metadata.is_dir() {
			files.insert(relative, FileDescriptor::Directory { mode });
			walk_dir(root, &path, depth + 1, params, ancestors, files)?;
		} else if is_binary_file(&path)? {
			files.insert(relative, FileDescriptor::Binary { source: path, mode });
		} else {
			files.insert(
				relative,
				FileDescriptor::Text(TextSegment {
					source: path,
					mode,
					params: params.clone(),
				}),
			);
		}
	}

	ancestors.pop();
	Ok(())
}

/// Sniff the first bytes of `path` for binary content.
pub fn is_binary_file(path: &Path) -> GroupStackResult<bool> {
	let file = std::fs::File::open(path)
		.map_err(|e| GroupStackError::file_operation("read", path, &e))?;
	let mut buffer = Vec::with_capacity(BINARY_SNIFF_BYTES);
	file.take(BINARY_SNIFF_BYTES as u64)
		.read_to_end(&mut buffer)
		.map_err(|e| GroupStackError::file_operation("read", path, &e))?;

	Ok(content_inspector::inspect(&buffer).is_binary())
}
