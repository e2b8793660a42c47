//! Config directory discovery and the workspace config document

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};

/// Directory under the platform config root holding the store and logs
pub const CONFIG_DIR_NAME: &str = "tagexplorer";

/// Database file name inside the config directory
pub const DB_FILE_NAME: &str = "tagexplorer.db";

/// Extension of workspace config documents
pub const WORKSPACE_CONFIG_EXT: &str = "teworkplace";

const WORKSPACE_CONFIG_VERSION: &str = "1.0";

/// `${user_config_dir}/tagexplorer`
pub fn default_data_dir() -> Result<PathBuf> {
	let base = dirs::config_dir()
		.ok_or(CoreError::NotInitialized("no user config directory"))?;
	Ok(base.join(CONFIG_DIR_NAME))
}

/// The `.teworkplace` document: a named list of workspace folders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
	pub name: String,
	pub folders: Vec<String>,
	pub created_at: DateTime<Utc>,
	pub version: String,
	/// Where the document was loaded from; never serialized
	#[serde(skip)]
	pub file_path: Option<PathBuf>,
}

impl WorkspaceConfig {
	fn new(name: &str, folders: &[String], created_at: DateTime<Utc>) -> Self {
		Self {
			name: name.to_owned(),
			folders: folders.to_vec(),
			created_at,
			version: WORKSPACE_CONFIG_VERSION.to_owned(),
			file_path: None,
		}
	}
}

fn validate_inputs(name: &str, folders: &[String]) -> Result<()> {
	if name.is_empty() {
		return Err(CoreError::InvalidRequest("workspace name is empty".into()));
	}
	if folders.is_empty() {
		return Err(CoreError::InvalidRequest(
			"workspace needs at least one folder".into(),
		));
	}
	Ok(())
}

/// Append the document extension unless the path already carries it.
fn with_config_ext(path: &Path) -> PathBuf {
	match path.extension().and_then(|e| e.to_str()) {
		Some(ext) if ext.eq_ignore_ascii_case(WORKSPACE_CONFIG_EXT) => path.to_owned(),
		_ => {
			let mut os = path.as_os_str().to_owned();
			os.push(".");
			os.push(WORKSPACE_CONFIG_EXT);
			PathBuf::from(os)
		}
	}
}

/// Write a fresh workspace config document. Returns the path actually
/// written, which gains the `.teworkplace` extension when missing.
pub fn save_workspace_config(path: &Path, name: &str, folders: &[String]) -> Result<PathBuf> {
	validate_inputs(name, folders)?;
	let path = with_config_ext(path);
	let config = WorkspaceConfig::new(name, folders, Utc::now());
	write_atomic(&path, &config)?;
	Ok(path)
}

/// Rewrite an existing document in place, preserving its creation stamp
/// when the old file still parses.
pub fn update_workspace_config(path: &Path, name: &str, folders: &[String]) -> Result<()> {
	validate_inputs(name, folders)?;

	let created_at = fs::read(path)
		.ok()
		.and_then(|bytes| serde_json::from_slice::<WorkspaceConfig>(&bytes).ok())
		.map(|existing| existing.created_at)
		.unwrap_or_else(Utc::now);

	let config = WorkspaceConfig::new(name, folders, created_at);
	write_atomic(path, &config)
}

/// Load a workspace config document. Folders that no longer exist are
/// silently dropped (with a log line); a document whose folders all vanished
/// fails to load.
pub fn load_workspace_config(path: &Path) -> Result<WorkspaceConfig> {
	let bytes = fs::read(path)?;
	let mut config: WorkspaceConfig = serde_json::from_slice(&bytes)?;

	if config.name.is_empty() {
		return Err(CoreError::InvalidRequest(
			"workspace config has no name".into(),
		));
	}
	if config.folders.is_empty() {
		return Err(CoreError::InvalidRequest(
			"workspace config lists no folders".into(),
		));
	}

	config.folders.retain(|folder| {
		let exists = Path::new(folder).exists();
		if !exists {
			warn!(%folder, "dropping missing workspace folder");
		}
		exists
	});
	if config.folders.is_empty() {
		return Err(CoreError::InvalidRequest(
			"none of the configured workspace folders exist".into(),
		));
	}

	config.file_path = Some(path.to_owned());
	Ok(config)
}

/// Write-to-temp-sibling, fsync, rename. Readers either see the old
/// document or the complete new one.
fn write_atomic(path: &Path, config: &WorkspaceConfig) -> Result<()> {
	let data = serde_json::to_vec_pretty(config)?;

	let mut tmp = path.as_os_str().to_owned();
	tmp.push(".tmp");
	let tmp = PathBuf::from(tmp);

	{
		let mut file = fs::File::create(&tmp)?;
		file.write_all(&data)?;
		file.sync_all()?;
	}
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644))?;
	}
	fs::rename(&tmp, path)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn save_and_load_round_trip() {
		let dir = TempDir::new().unwrap();
		let folder = dir.path().join("media");
		fs::create_dir(&folder).unwrap();
		let doc = dir.path().join("home.teworkplace");

		let folders = vec![folder.to_string_lossy().into_owned()];
		save_workspace_config(&doc, "home", &folders).unwrap();

		let loaded = load_workspace_config(&doc).unwrap();
		assert_eq!(loaded.name, "home");
		assert_eq!(loaded.folders, folders);
		assert_eq!(loaded.version, "1.0");
		assert_eq!(loaded.file_path.as_deref(), Some(doc.as_path()));
	}

	#[test]
	fn load_drops_missing_folders() {
		let dir = TempDir::new().unwrap();
		let kept = dir.path().join("kept");
		fs::create_dir(&kept).unwrap();
		let doc = dir.path().join("mixed.teworkplace");

		let folders = vec![
			kept.to_string_lossy().into_owned(),
			dir.path().join("gone").to_string_lossy().into_owned(),
		];
		save_workspace_config(&doc, "mixed", &folders).unwrap();

		let loaded = load_workspace_config(&doc).unwrap();
		assert_eq!(loaded.folders.len(), 1);
		assert_eq!(loaded.folders[0], folders[0]);
	}

	#[test]
	fn load_fails_when_all_folders_are_gone() {
		let dir = TempDir::new().unwrap();
		let doc = dir.path().join("dead.teworkplace");
		let folders = vec![dir.path().join("a").to_string_lossy().into_owned()];
		save_workspace_config(&doc, "dead", &folders).unwrap();

		assert!(load_workspace_config(&doc).is_err());
	}

	#[test]
	fn update_preserves_created_at() {
		let dir = TempDir::new().unwrap();
		let folder = dir.path().join("f");
		fs::create_dir(&folder).unwrap();
		let doc = dir.path().join("ws.teworkplace");
		let folders = vec![folder.to_string_lossy().into_owned()];

		save_workspace_config(&doc, "ws", &folders).unwrap();
		let first = load_workspace_config(&doc).unwrap();

		update_workspace_config(&doc, "renamed", &folders).unwrap();
		let second = load_workspace_config(&doc).unwrap();

		assert_eq!(second.name, "renamed");
		assert_eq!(second.created_at, first.created_at);
	}

	#[test]
	fn save_appends_the_document_extension() {
		let dir = TempDir::new().unwrap();
		let folder = dir.path().join("f");
		fs::create_dir(&folder).unwrap();
		let folders = vec![folder.to_string_lossy().into_owned()];

		let written = save_workspace_config(&dir.path().join("plain"), "ws", &folders).unwrap();
		assert!(written.to_string_lossy().ends_with("plain.teworkplace"));
		assert!(written.exists());
	}

	#[test]
	fn save_rejects_empty_inputs() {
		let dir = TempDir::new().unwrap();
		let doc = dir.path().join("x.teworkplace");
		assert!(save_workspace_config(&doc, "", &["f".into()]).is_err());
		assert!(save_workspace_config(&doc, "x", &[]).is_err());
	}
}
