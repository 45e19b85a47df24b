use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Deserializer;

use crate::GroupStackError;

/// Flat template parameters. Later writes win when two sets are merged.
pub type Params = BTreeMap<String, String>;

/// File extension of a group manifest, which sits next to the group
/// directory: `<config_path>/<name>.json`.
pub const MANIFEST_EXTENSION: &str = "json";

/// A group manifest.
///
/// ```json
/// {
///   "include": {
///     "base": {},
///     "lib": { "version": "2" }
///   },
///   "params": { "name": "web", "port": 8080 }
/// }
/// ```
///
/// Unknown keys are ignored. The order of `include` entries is kept because
/// it decides precedence between the included groups.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GroupManifest {
	/// Included group name mapped to the parameter overrides applied to that
	/// inclusion only.
	#[serde(default, deserialize_with = "deserialize_include")]
	pub include: IndexMap<String, Params>,
	/// Parameters made available to this group's text templates.
	#[serde(default, deserialize_with = "deserialize_params")]
	pub params: Params,
}

/// Result of reading a manifest from disk.
///
/// A missing or broken manifest is not fatal by default: both collapse into an
/// empty [`GroupManifest`] through [`ManifestOutcome::into_manifest`]. The
/// variants stay distinct so that stricter callers can reject
/// [`ManifestOutcome::Malformed`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ManifestOutcome {
	Loaded(GroupManifest),
	Absent,
	Malformed { path: PathBuf, reason: String },
}

impl ManifestOutcome {
	/// The manifest to use, falling back to the empty default.
	pub fn into_manifest(self) -> GroupManifest {
		match self {
			Self::Loaded(manifest) => manifest,
			Self::Absent | Self::Malformed { .. } => GroupManifest::default(),
		}
	}

	pub fn is_loaded(&self) -> bool {
		matches!(self, Self::Loaded(_))
	}

	/// Convert a malformed manifest into an error, keep everything else.
	pub fn into_strict(self) -> Result<GroupManifest, GroupStackError> {
		match self {
			Self::Malformed { path, reason } => {
				Err(GroupStackError::ManifestParse {
					path: path.display().to_string(),
					reason,
				})
			}
			other => Ok(other.into_manifest()),
		}
	}
}

impl GroupManifest {
	/// Read the manifest at `path`.
	pub fn load(path: &Path) -> ManifestOutcome {
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ManifestOutcome::Absent,
			Err(e) => {
				return ManifestOutcome::Malformed {
					path: path.to_path_buf(),
					reason: e.to_string(),
				};
			}
		};

		Self::parse(&content).map_or_else(
			|reason| {
				ManifestOutcome::Malformed {
					path: path.to_path_buf(),
					reason,
				}
			},
			ManifestOutcome::Loaded,
		)
	}

	/// Parse manifest content.
	pub fn parse(content: &str) -> Result<Self, String> {
		serde_json::from_str(content).map_err(|e| e.to_string())
	}
}

/// Shallow merge: keys from `overrides` replace keys in `base`.
pub fn merge_params(base: &Params, overrides: &Params) -> Params {
	let mut merged = base.clone();
	merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
	merged
}

fn deserialize_params<'de, D>(deserializer: D) -> Result<Params, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
	scalars_to_params(raw.unwrap_or_default()).map_err(<D::Error as serde::de::Error>::custom)
}

fn deserialize_include<'de, D>(deserializer: D) -> Result<IndexMap<String, Params>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<IndexMap<String, Option<BTreeMap<String, serde_json::Value>>>>::deserialize(
		deserializer,
	)?;
	let mut include = IndexMap::new();

	for (name, overrides) in raw.unwrap_or_default() {
		let params = scalars_to_params(overrides.unwrap_or_default())
			.map_err(<D::Error as serde::de::Error>::custom)?;
		include.insert(name, params);
	}

	Ok(include)
}

fn scalars_to_params(raw: BTreeMap<String, serde_json::Value>) -> Result<Params, String> {
	raw.into_iter()
		.map(|(key, value)| scalar_to_string(&key, value).map(|value| (key, value)))
		.collect()
}

fn scalar_to_string(key: &str, value: serde_json::Value) -> Result<String, String> {
	match value {
		serde_json::Value::String(s) => Ok(s),
		serde_json::Value::Number(n) => Ok(n.to_string()),
		serde_json::Value::Bool(b) => Ok(b.to_string()),
		serde_json::Value::Null => Ok(String::new()),
		serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
			Err(format!("parameter `{key}` must be a string, number or boolean"))
		}
	}
}
