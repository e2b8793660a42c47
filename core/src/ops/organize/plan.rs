//! Organize planner: classify candidate files without touching the disk

use std::collections::{HashMap, HashSet};

use tokio::fs;

use super::{ItemStatus, OrganizeItem, OrganizePreview, OrganizeRequest, OrganizeSummary};
use crate::domain::{FileKind, Workspace};
use crate::error::{CoreError, Result};
use crate::infra::db::Database;
use crate::ops::naming::sanitize_folder_segment;
use crate::ops::rename::abs_path;

/// Files enumerated per page
const PLAN_BATCH: u64 = 500;

/// Build the move plan for a leveled tag selection.
///
/// Files carrying none of the requested tags are implicitly excluded; every
/// other candidate lands in the plan as move, already-in-place, skip or
/// conflict.
pub async fn build_plan(
	db: &Database,
	workspace: &Workspace,
	request: &OrganizeRequest,
) -> Result<OrganizePreview> {
	if request.levels.is_empty() {
		return Err(CoreError::InvalidRequest(
			"at least one level is required".into(),
		));
	}

	let mut required: HashSet<i64> = HashSet::new();
	for (idx, level) in request.levels.iter().enumerate() {
		if level.tag_ids.is_empty() {
			return Err(CoreError::InvalidRequest(format!(
				"level {} selects no tags",
				idx + 1
			)));
		}
		for &tag_id in &level.tag_ids {
			if tag_id <= 0 {
				return Err(CoreError::InvalidRequest(format!(
					"level {} contains an invalid tag id",
					idx + 1
				)));
			}
			required.insert(tag_id);
		}
	}

	let tag_names: HashMap<i64, String> = db
		.list_tags()
		.await?
		.into_iter()
		.map(|t| (t.id, t.name))
		.collect();
	for tag_id in &required {
		if !tag_names.contains_key(tag_id) {
			return Err(CoreError::NotFound("tag"));
		}
	}

	let mut preview = OrganizePreview {
		items: Vec::new(),
		summary: OrganizeSummary::default(),
		base_path: workspace.path.clone(),
	};
	// Targets claimed by earlier plan entries
	let mut reserved: HashMap<String, i64> = HashMap::new();

	let mut offset = 0u64;
	loop {
		let page = db.list_files(workspace.id, PLAN_BATCH, offset).await?;
		if page.records.is_empty() {
			break;
		}
		let fetched = page.records.len() as u64;

		for file in page.records {
			if file.kind != FileKind::File {
				continue;
			}

			let carried: HashSet<i64> = file.tags.iter().map(|t| t.id).collect();
			if required.is_disjoint(&carried) {
				continue;
			}

			let mut item = OrganizeItem {
				file_id: file.id,
				original_path: file.path.clone(),
				target_path: String::new(),
				status: ItemStatus::Move,
				tags: file.tags.iter().map(|t| t.name.clone()).collect(),
				missing_tags: Vec::new(),
				message: String::new(),
			};

			let missing: Vec<String> = request
				.levels
				.iter()
				.flat_map(|level| level.tag_ids.iter())
				.filter(|tag_id| !carried.contains(tag_id))
				.filter_map(|tag_id| tag_names.get(tag_id).cloned())
				.collect();
			if !missing.is_empty() {
				item.status = ItemStatus::SkipMissingTags;
				item.missing_tags = missing;
				preview.summary.skip_count += 1;
				preview.summary.total += 1;
				preview.items.push(item);
				continue;
			}

			let segments: Vec<String> = request
				.levels
				.iter()
				.map(|level| {
					let names: Vec<String> = level
						.tag_ids
						.iter()
						.filter_map(|tag_id| tag_names.get(tag_id))
						.map(|name| sanitize_folder_segment(name))
						.collect();
					format!("[{}]", names.join("]["))
				})
				.collect();
			let target_rel = format!("{}/{}", segments.join("/"), file.name);
			item.target_path = target_rel.clone();

			if target_rel == item.original_path {
				item.status = ItemStatus::AlreadyInPlace;
				preview.summary.already_in_place += 1;
				preview.summary.total += 1;
				preview.items.push(item);
				continue;
			}

			if matches!(reserved.get(&target_rel), Some(owner) if *owner != file.id) {
				item.status = ItemStatus::Conflict;
				item.message = "target path collides with another planned move".into();
				preview.summary.conflict_count += 1;
				preview.summary.total += 1;
				preview.items.push(item);
				continue;
			}

			if fs::try_exists(abs_path(workspace, &target_rel)).await? {
				item.status = ItemStatus::Conflict;
				item.message = "an entry already exists at the target path".into();
				preview.summary.conflict_count += 1;
				preview.summary.total += 1;
				preview.items.push(item);
				continue;
			}

			reserved.insert(target_rel, file.id);
			preview.summary.move_count += 1;
			preview.summary.total += 1;
			preview.items.push(item);
		}

		if fetched < PLAN_BATCH {
			break;
		}
		offset += fetched;
	}

	Ok(preview)
}
