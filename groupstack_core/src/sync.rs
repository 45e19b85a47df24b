use std::path::Path;
use std::process::Command;

/// Result of refreshing the configuration source.
///
/// Synchronization is best effort: a failure is reported here and logged,
/// never raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncOutcome {
	/// An existing clone was updated with `git pull`.
	Pulled,
	/// The remote was cloned into the configuration path.
	Cloned,
	/// No existing clone and no remote to clone from.
	Skipped,
	/// `git` could not be run or exited unsuccessfully.
	Failed { reason: String },
}

impl SyncOutcome {
	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed { .. })
	}
}

/// Update the clone at `config_path`, or clone `remote` into it when there is
/// no clone yet.
pub fn synchronize(config_path: &Path, remote: Option<&str>) -> SyncOutcome {
	let outcome = if config_path.join(".git").exists() {
		let mut command = Command::new("git");
		command.arg("pull").current_dir(config_path);
		run_git(command, SyncOutcome::Pulled)
	} else if let Some(remote) = remote {
		let mut command = Command::new("git");
		command.arg("clone").arg(remote).arg(config_path);
		run_git(command, SyncOutcome::Cloned)
	} else {
		SyncOutcome::Skipped
	};

	match &outcome {
		SyncOutcome::Failed { reason } => {
			tracing::debug!(path = %config_path.display(), %reason, "configuration sync failed");
		}
		other => {
			tracing::debug!(path = %config_path.display(), outcome = ?other, "configuration sync finished");
		}
	}

	outcome
}

fn run_git(mut command: Command, success: SyncOutcome) -> SyncOutcome {
	let output = match command.output() {
		Ok(output) => output,
		Err(e) => {
			return SyncOutcome::Failed {
				reason: e.to_string(),
			};
		}
	};

	if output.status.success() {
		return success;
	}

	let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
	let reason = if stderr.is_empty() {
		format!(
			"git exited with status {}",
			output
				.status
				.code()
				.map_or_else(|| "unknown".to_string(), |code| code.to_string())
		)
	} else {
		stderr
	};

	SyncOutcome::Failed { reason }
}
