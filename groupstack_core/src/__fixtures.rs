use std::path::Path;
use std::path::PathBuf;

use rstest::fixture;
use tempfile::TempDir;

use crate::Params;
use crate::fs_mode::set_mode;

/// PNG signature followed by a chunk header, enough to be sniffed as binary.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";

/// A configuration directory on disk that tests populate group by group.
pub struct ConfigTree {
	dir: TempDir,
}

#[fixture]
pub fn config_tree() -> ConfigTree {
	ConfigTree::new()
}

#[fixture]
pub fn destination() -> TempDir {
	tempfile::tempdir().unwrap()
}

impl ConfigTree {
	pub fn new() -> Self {
		Self {
			dir: tempfile::tempdir().unwrap(),
		}
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	pub fn group_file(&self, group: &str, relative: &str) -> PathBuf {
		self.path().join(group).join(relative)
	}

	pub fn manifest(&self, group: &str, json: &str) -> &Self {
		std::fs::write(self.path().join(format!("{group}.json")), json).unwrap();
		self
	}

	pub fn text(&self, group: &str, relative: &str, content: &str) -> &Self {
		self.text_with_mode(group, relative, content, 0o644)
	}

	pub fn text_with_mode(&self, group: &str, relative: &str, content: &str, mode: u32) -> &Self {
		let path = self.group_file(group, relative);
		create_parent(&path);
		std::fs::write(&path, content).unwrap();
		set_mode(&path, mode).unwrap();
		self
	}

	pub fn binary(&self, group: &str, relative: &str, mode: u32) -> &Self {
		let path = self.group_file(group, relative);
		create_parent(&path);
		std::fs::write(&path, PNG_BYTES).unwrap();
		set_mode(&path, mode).unwrap();
		self
	}

	pub fn dir(&self, group: &str, relative: &str, mode: u32) -> &Self {
		let path = self.group_file(group, relative);
		std::fs::create_dir_all(&path).unwrap();
		set_mode(&path, mode).unwrap();
		self
	}
}

fn create_parent(path: &Path) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap();
	}
}

/// Build a [`Params`] map from key/value pairs.
pub fn params(pairs: &[(&str, &str)]) -> Params {
	pairs
		.iter()
		.map(|(key, value)| ((*key).to_string(), (*value).to_string()))
		.collect()
}
