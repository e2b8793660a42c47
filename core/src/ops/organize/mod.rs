//! Tag-driven organization: move files into a tag-derived folder hierarchy
//!
//! The planner classifies every candidate file without touching the disk;
//! the executor replays the plan move by move, journals the result, and the
//! undo path replays the journal in reverse.

mod execute;
mod plan;
mod undo;

pub use execute::execute_organize;
pub use plan::build_plan;
pub use undo::undo_organize;

use serde::{Deserialize, Serialize};

/// One slot in the requested hierarchy; a file must carry ALL of its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeLevel {
	pub tag_ids: Vec<i64>,
}

/// An ordered, non-empty list of levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeRequest {
	pub levels: Vec<OrganizeLevel>,
}

/// Classification of one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
	Move,
	AlreadyInPlace,
	SkipMissingTags,
	Conflict,
}

/// One entry of the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeItem {
	pub file_id: i64,
	pub original_path: String,
	/// Empty for skipped items
	#[serde(default)]
	pub target_path: String,
	pub status: ItemStatus,
	/// The file's current tag names
	#[serde(default)]
	pub tags: Vec<String>,
	/// Tag names the file lacks, for [`ItemStatus::SkipMissingTags`]
	#[serde(default)]
	pub missing_tags: Vec<String>,
	#[serde(default)]
	pub message: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrganizeSummary {
	pub total: u64,
	pub move_count: u64,
	pub conflict_count: u64,
	pub skip_count: u64,
	pub already_in_place: u64,
}

/// The full plan, including skips and conflicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizePreview {
	pub items: Vec<OrganizeItem>,
	pub summary: OrganizeSummary,
	/// Workspace root the relpaths hang off
	pub base_path: String,
}

/// Result of a successful execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeResult {
	pub preview: OrganizePreview,
	/// Absent when nothing needed moving
	pub operation_id: Option<i64>,
}

/// One realized move, as journaled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
	pub file_id: i64,
	pub from: String,
	pub to: String,
}

/// Journal payload for an `organize` operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizePayload {
	pub workspace_id: i64,
	pub moves: Vec<MoveRecord>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrganizeUndoResult {
	pub restored: u64,
	pub failed: u64,
}
