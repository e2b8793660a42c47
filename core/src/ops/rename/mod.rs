//! Tag-driven renaming
//!
//! A rename touches the disk first and the store second. When the store
//! update fails, a best-effort reverse rename restores the old name before
//! the original failure is reported; a failed reverse is logged and leaves
//! the operator a visible inconsistency rather than a silent one.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{FileKind, TagRule, Workspace};
use crate::error::{CoreError, Result};
use crate::infra::db::Database;
use crate::ops::naming;

/// Files processed per page during the grammar-change pass
const RENAME_BATCH: u64 = 100;

/// Parent portion of a forward-slash relpath, empty at the workspace root.
fn rel_parent(relpath: &str) -> &str {
	match relpath.rfind('/') {
		Some(idx) => &relpath[..idx],
		None => "",
	}
}

fn join_rel(parent: &str, name: &str) -> String {
	if parent.is_empty() {
		name.to_owned()
	} else {
		format!("{parent}/{name}")
	}
}

/// Absolute on-disk path for a workspace relpath.
pub fn abs_path(workspace: &Workspace, relpath: &str) -> PathBuf {
	let mut path = PathBuf::from(&workspace.path);
	for part in relpath.split('/').filter(|p| !p.is_empty()) {
		path.push(part);
	}
	path
}

/// Rename a file in place (same directory) and update its row.
pub async fn rename_file(
	db: &Database,
	workspace: &Workspace,
	file_id: i64,
	new_name: &str,
) -> Result<()> {
	if new_name.is_empty() {
		return Err(CoreError::InvalidRequest("new file name is empty".into()));
	}

	let file = db.get_file_by_id(file_id).await?;

	let old_abs = abs_path(workspace, &file.path);
	let new_abs = old_abs
		.parent()
		.unwrap_or_else(|| Path::new(&workspace.path))
		.join(new_name);

	if fs::try_exists(&new_abs).await? {
		return Err(CoreError::TargetExists(new_abs));
	}

	fs::rename(&old_abs, &new_abs).await?;

	let new_rel = join_rel(rel_parent(&file.path), new_name);
	if let Err(err) = db.update_file_name(file_id, new_name, &new_rel).await {
		// Put the on-disk name back so disk and store stay in agreement
		if let Err(revert_err) = fs::rename(&new_abs, &old_abs).await {
			warn!(
				file_id,
				from = %new_abs.display(),
				to = %old_abs.display(),
				%revert_err,
				"reverse rename failed after store update failure"
			);
		}
		return Err(err);
	}

	info!(file_id, old_name = %file.name, %new_name, "renamed file");
	Ok(())
}

/// Regenerate the basename from the file's stored tag set and rename when
/// the result differs from the current name.
pub async fn rename_file_with_tags(
	db: &Database,
	workspace: &Workspace,
	file_id: i64,
	rule: &TagRule,
) -> Result<()> {
	let file = db.get_file_by_id(file_id).await?;

	let tag_names: Vec<String> = file.tags.iter().map(|t| t.name.clone()).collect();
	let new_name = naming::compose(&file.name, &tag_names, rule);

	if new_name == file.name {
		debug!(file_id, name = %file.name, "name already matches tag set");
		return Ok(());
	}

	rename_file(db, workspace, file_id, &new_name).await
}

/// Re-render every tagged regular file under the current grammar. Used when
/// a settings change alters the tag rule. Per-file failures are logged and
/// skipped.
pub async fn rename_all_with_tags(
	db: &Database,
	workspace: &Workspace,
	rule: &TagRule,
	cancel: &CancellationToken,
) -> Result<u64> {
	let mut offset = 0u64;
	let mut updated = 0u64;

	loop {
		let page = db.list_files(workspace.id, RENAME_BATCH, offset).await?;
		if page.records.is_empty() {
			break;
		}
		let fetched = page.records.len() as u64;

		for file in page.records {
			if cancel.is_cancelled() {
				return Err(CoreError::Cancelled);
			}
			if file.kind != FileKind::File || file.tags.is_empty() {
				continue;
			}

			if let Err(err) = rename_file_with_tags(db, workspace, file.id, rule).await {
				warn!(file_id = file.id, name = %file.name, %err, "failed to re-render file name");
				continue;
			}
			updated += 1;
		}

		if fetched < RENAME_BATCH {
			break;
		}
		offset += fetched;
	}

	info!(workspace_id = workspace.id, updated, "grammar re-render pass finished");
	Ok(updated)
}
