//! Workspace - a rooted directory the engine has been asked to index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rooted absolute directory on disk that has been scanned at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
	pub id: i64,
	/// Absolute path, case-sensitive per host
	pub path: String,
	/// Display name, defaults to the directory basename
	pub name: String,
	pub created_at: DateTime<Utc>,
}

/// Statistics returned by a completed scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
	pub workspace: Workspace,
	pub file_count: u64,
	pub directory_count: u64,
}
