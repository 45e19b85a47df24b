use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use crate::group::Group;
use crate::scanner::FileDescriptor;
use crate::scanner::TextSegment;

/// The composed result for a single relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedEntry {
	Directory { mode: u32 },
	Binary { source: PathBuf, mode: u32 },
	/// Text contributions ordered from least to most specific.
	Text(Vec<TextSegment>),
}

impl MergedEntry {
	/// Text segments of this entry, empty for directories and binaries.
	pub fn segments(&self) -> &[TextSegment] {
		match self {
			Self::Text(segments) => segments,
			Self::Directory { .. } | Self::Binary { .. } => &[],
		}
	}
}

impl From<FileDescriptor> for MergedEntry {
	fn from(descriptor: FileDescriptor) -> Self {
		match descriptor {
			FileDescriptor::Directory { mode } => Self::Directory { mode },
			FileDescriptor::Binary { source, mode } => Self::Binary { source, mode },
			FileDescriptor::Text(segment) => Self::Text(vec![segment]),
		}
	}
}

/// Composed files keyed by path relative to the destination root. Parents
/// always sort before their contents.
pub type FileMap = BTreeMap<PathBuf, MergedEntry>;

impl Group {
	/// Compose this group and everything it includes into one file map.
	///
	/// Children are applied in declaration order and a later child replaces
	/// an earlier child's entry outright. The group's own entries go on top:
	/// directories and binaries replace, text files are appended after any
	/// text already collected for the same path.
	pub fn merged_files(&self) -> FileMap {
		let mut files = FileMap::new();

		for child in self.children() {
			files.extend(child.merged_files());
		}

		for (path, descriptor) in self.files() {
			overlay(&mut files, path, descriptor);
		}

		files
	}
}

fn overlay(files: &mut FileMap, path: &Path, descriptor: &FileDescriptor) {
	match descriptor {
		FileDescriptor::Directory { .. } | FileDescriptor::Binary { .. } => {
			files.insert(path.to_path_buf(), descriptor.clone().into());
		}
		FileDescriptor::Text(segment) => {
			// A directory or binary below this point does not survive.
			if let Some(MergedEntry::Text(segments)) = files.get_mut(path) {
				segments.push(segment.clone());
			} else {
				files.insert(path.to_path_buf(), MergedEntry::Text(vec![segment.clone()]));
			}
		}
	}
}
