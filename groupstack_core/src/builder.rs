use std::path::Path;
use std::path::PathBuf;

use crate::GroupStackError;
use crate::GroupStackResult;
use crate::group::Group;
use crate::group::LoadOptions;
use crate::materialize::MaterializeOptions;
use crate::materialize::MaterializeReport;
use crate::materialize::Materializer;
use crate::sync::SyncOutcome;
use crate::sync::synchronize;

/// Options for [`Builder`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
	pub load: LoadOptions,
	pub materialize: MaterializeOptions,
}

/// Entry point tying the pipeline together for one configuration path.
#[derive(Debug, Clone)]
pub struct Builder {
	config_path: PathBuf,
	options: BuildOptions,
}

impl Builder {
	pub fn new(config_path: impl Into<PathBuf>) -> Self {
		Self {
			config_path: config_path.into(),
			options: BuildOptions::default(),
		}
	}

	#[must_use]
	pub fn with_options(mut self, options: BuildOptions) -> Self {
		self.options = options;
		self
	}

	pub fn config_path(&self) -> &Path {
		&self.config_path
	}

	pub fn options(&self) -> &BuildOptions {
		&self.options
	}

	/// Refresh the configuration path from `remote`. See [`synchronize`].
	pub fn synchronize_config(&self, remote: Option<&str>) -> SyncOutcome {
		synchronize(&self.config_path, remote)
	}

	/// Load `group_name` and everything it includes.
	///
	/// Fails when the group has neither a manifest nor a directory.
	pub fn load_group(&self, group_name: &str) -> GroupStackResult<Group> {
		let group = Group::load_with_options(group_name, &self.config_path, &self.options.load)?;

		if !group.exists_on_disk() {
			return Err(GroupStackError::GroupNotFound {
				name: group_name.to_string(),
				config_path: self.config_path.display().to_string(),
			});
		}

		Ok(group)
	}

	/// Compose `group_name` and write the result below `destination`.
	///
	/// Only failures that happen before the file list exists abort the build.
	/// Per-file failures are collected in the returned report.
	pub fn build(
		&self,
		destination: impl AsRef<Path>,
		group_name: &str,
	) -> GroupStackResult<MaterializeReport> {
		let group = self.load_group(group_name)?;
		let files = group.merged_files();
		tracing::debug!(group = group_name, files = files.len(), "composed group");

		let materializer =
			Materializer::with_options(destination.as_ref(), self.options.materialize.clone());

		Ok(materializer.materialize(&files))
	}
}
