//! Recently opened workspaces and folders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentKind {
	Workspace,
	Folder,
}

impl RecentKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			RecentKind::Workspace => "workspace",
			RecentKind::Folder => "folder",
		}
	}

	pub fn from_str(s: &str) -> Option<Self> {
		match s {
			"workspace" => Some(RecentKind::Workspace),
			"folder" => Some(RecentKind::Folder),
			_ => None,
		}
	}
}

/// One entry in the recency list, deduplicated by path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentItem {
	pub id: i64,
	pub kind: RecentKind,
	pub path: String,
	pub name: String,
	pub opened_at: DateTime<Utc>,
}
