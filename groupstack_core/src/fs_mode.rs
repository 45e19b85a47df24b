//! Permission bits as plain `u32` modes, so descriptors can carry them
//! independently of the platform.

use std::fs::Metadata;
use std::path::Path;

/// Mode applied to a rendered text file when none of its segments carries
/// one (`rw-r--r--`).
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Permission bits of `metadata`.
#[cfg(unix)]
pub fn mode_of(metadata: &Metadata) -> u32 {
	use std::os::unix::fs::PermissionsExt;

	metadata.permissions().mode() & 0o7777
}

/// Permission bits of `metadata`, approximated from the read-only flag.
#[cfg(not(unix))]
pub fn mode_of(metadata: &Metadata) -> u32 {
	match (metadata.is_dir(), metadata.permissions().readonly()) {
		(true, true) => 0o555,
		(true, false) => 0o755,
		(false, true) => 0o444,
		(false, false) => DEFAULT_FILE_MODE,
	}
}

/// Apply `mode` to the file or directory at `path`.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
	use std::os::unix::fs::PermissionsExt;

	std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

/// Apply the owner write bit of `mode` as the read-only flag.
#[cfg(not(unix))]
pub fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
	let mut permissions = std::fs::metadata(path)?.permissions();
	permissions.set_readonly(mode & 0o200 == 0);
	std::fs::set_permissions(path, permissions)
}
