//! File records and scan metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Kind of filesystem entry tracked in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
	File,
	Dir,
}

impl FileKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			FileKind::File => "file",
			FileKind::Dir => "dir",
		}
	}

	pub fn from_str(s: &str) -> Option<Self> {
		match s {
			"file" => Some(FileKind::File),
			"dir" => Some(FileKind::Dir),
			_ => None,
		}
	}
}

/// One row produced by the scanner for batch import
#[derive(Debug, Clone)]
pub struct FileMetadata {
	pub workspace_id: i64,
	/// Forward-slash normalized path relative to the workspace root
	pub path: String,
	pub name: String,
	/// Byte size, 0 for directories
	pub size: i64,
	pub kind: FileKind,
	pub mod_time: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
	/// Identity token `{relpath}_{size}_{mtime_nanos}`, empty for directories
	pub hash: String,
}

/// A file row decorated with its tag list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
	pub id: i64,
	pub workspace_id: i64,
	pub path: String,
	pub name: String,
	pub size: i64,
	pub kind: FileKind,
	pub mod_time: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
	pub hash: String,
	/// Ordered by tag name, case-insensitive
	pub tags: Vec<Tag>,
}

/// One page of file records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilePage {
	pub total: u64,
	pub records: Vec<FileRecord>,
}

/// Parameters for tag-driven file search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSearchParams {
	/// Files must carry ALL of these tags
	pub tag_ids: Vec<i64>,
	/// Restrict to this folder when non-empty
	#[serde(default)]
	pub folder_path: String,
	#[serde(default)]
	pub include_subfolders: bool,
	#[serde(default)]
	pub limit: u64,
	#[serde(default)]
	pub offset: u64,
}
