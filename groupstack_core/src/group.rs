use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::GroupStackError;
use crate::GroupStackResult;
use crate::config::GroupManifest;
use crate::config::MANIFEST_EXTENSION;
use crate::config::ManifestOutcome;
use crate::config::Params;
use crate::config::merge_params;
use crate::scanner::FileDescriptor;
use crate::scanner::ScannedFiles;
use crate::scanner::scan_group_dir;

/// Default limit for how deeply groups may include each other.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Options controlling how a group hierarchy is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
	/// Maximum length of an inclusion chain, counting the root group.
	pub max_depth: usize,
	/// When true, a manifest that exists but cannot be parsed aborts the load
	/// instead of being treated as empty.
	pub strict_manifests: bool,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_INCLUDE_DEPTH,
			strict_manifests: false,
		}
	}
}

/// A named configuration group together with every group it includes.
///
/// Each inclusion produces its own child instance, so a group included from
/// two places is loaded twice and parameterized independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
	name: String,
	config_path: PathBuf,
	has_manifest: bool,
	include: IndexMap<String, Params>,
	params: Params,
	files: ScannedFiles,
	children: Vec<Group>,
}

impl Group {
	/// An empty, unloaded group.
	pub fn new(name: impl Into<String>, config_path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			config_path: config_path.into(),
			has_manifest: false,
			include: IndexMap::new(),
			params: Params::new(),
			files: ScannedFiles::new(),
			children: Vec::new(),
		}
	}

	/// Load the group `name` from `config_path` with default options.
	pub fn load(name: &str, config_path: &Path) -> GroupStackResult<Self> {
		Self::load_with_options(name, config_path, &LoadOptions::default())
	}

	/// Load the group `name` and, recursively, every group it includes.
	pub fn load_with_options(
		name: &str,
		config_path: &Path,
		options: &LoadOptions,
	) -> GroupStackResult<Self> {
		let mut chain = Vec::new();
		Self::load_included(name, config_path, &Params::new(), options, &mut chain)
	}

	fn load_included(
		name: &str,
		config_path: &Path,
		overrides: &Params,
		options: &LoadOptions,
		chain: &mut Vec<String>,
	) -> GroupStackResult<Self> {
		if chain.iter().any(|ancestor| ancestor == name) {
			let mut cycle = chain.clone();
			cycle.push(name.to_string());
			return Err(GroupStackError::IncludeCycle {
				chain: cycle.join(" -> "),
			});
		}

		if chain.len() >= options.max_depth {
			return Err(GroupStackError::IncludeDepthExceeded {
				name: name.to_string(),
				limit: options.max_depth,
			});
		}

		let mut group = Self::new(name, config_path);
		let outcome = GroupManifest::load(&group.manifest_path());
		group.has_manifest = !matches!(outcome, ManifestOutcome::Absent);

		let manifest = match outcome {
			ManifestOutcome::Malformed { path, reason } if !options.strict_manifests => {
				tracing::warn!(
					group = name,
					path = %path.display(),
					%reason,
					"ignoring malformed group manifest"
				);
				GroupManifest::default()
			}
			ManifestOutcome::Absent => {
				tracing::debug!(group = name, "no manifest found, using empty config");
				GroupManifest::default()
			}
			outcome => outcome.into_strict()?,
		};

		group.include = manifest.include;
		group.params = merge_params(&manifest.params, overrides);
		group.files = scan_group_dir(&group.group_path(), &group.params)?;

		chain.push(name.to_string());
		let children = group
			.include
			.iter()
			.map(|(child, child_overrides)| {
				Self::load_included(child, config_path, child_overrides, options, chain)
			})
			.collect::<GroupStackResult<Vec<_>>>();
		chain.pop();
		group.children = children?;

		tracing::debug!(
			group = name,
			files = group.files.len(),
			children = group.children.len(),
			"loaded group"
		);

		Ok(group)
	}

	/// Extend the parameters of this group. Keys in `overrides` win.
	///
	/// The parameter snapshot of every text file owned by this group is
	/// refreshed as well. Children are not affected.
	pub fn set_params(&mut self, overrides: &Params) {
		self.params = merge_params(&self.params, overrides);

		for descriptor in self.files.values_mut() {
			if let FileDescriptor::Text(segment) = descriptor {
				segment.params.clone_from(&self.params);
			}
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config_path(&self) -> &Path {
		&self.config_path
	}

	/// Effective parameters: the manifest's params with the inclusion
	/// overrides applied.
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Included group names with their overrides, in declaration order.
	pub fn include(&self) -> &IndexMap<String, Params> {
		&self.include
	}

	/// Entries found in this group's own directory.
	pub fn files(&self) -> &ScannedFiles {
		&self.files
	}

	/// Loaded children in declaration order (lowest precedence first).
	pub fn children(&self) -> &[Group] {
		&self.children
	}

	/// `<config_path>/<name>`
	pub fn group_path(&self) -> PathBuf {
		self.config_path.join(&self.name)
	}

	/// `<config_path>/<name>/<child>`
	pub fn child_path(&self, child: impl AsRef<Path>) -> PathBuf {
		self.group_path().join(child)
	}

	/// `<config_path>/<name>.json`
	pub fn manifest_path(&self) -> PathBuf {
		self.config_path
			.join(format!("{}.{MANIFEST_EXTENSION}", self.name))
	}

	/// Whether either the manifest or the directory of this group exists.
	pub fn exists_on_disk(&self) -> bool {
		self.has_manifest || self.group_path().is_dir()
	}
}
