//! Organize executor: replay the plan, journal the result, roll back on
//! any mid-flight failure

use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{
	plan::build_plan, ItemStatus, MoveRecord, OrganizeItem, OrganizePayload, OrganizeRequest,
	OrganizeResult,
};
use crate::domain::Workspace;
use crate::error::{CoreError, Result};
use crate::infra::db::{entities::operation::KIND_ORGANIZE, Database};
use crate::ops::rename::abs_path;

/// Rebuild the plan from the request and execute it. Rejected outright when
/// the rebuilt plan still contains conflicts; rolled back entirely when any
/// single move fails or the caller cancels mid-flight.
pub async fn execute_organize(
	db: &Database,
	workspace: &Workspace,
	request: &OrganizeRequest,
	cancel: &CancellationToken,
) -> Result<OrganizeResult> {
	let preview = build_plan(db, workspace, request).await?;

	if preview.summary.conflict_count > 0 {
		return Err(CoreError::ConflictInPlan(
			preview.summary.conflict_count as usize,
		));
	}
	if preview.summary.move_count == 0 {
		return Ok(OrganizeResult {
			preview,
			operation_id: None,
		});
	}

	let mut executed: Vec<MoveRecord> = Vec::with_capacity(preview.summary.move_count as usize);
	for item in &preview.items {
		if item.status != ItemStatus::Move {
			continue;
		}

		// Cancellation between moves is treated like a failure: everything
		// done so far is put back.
		if cancel.is_cancelled() {
			rollback_all(db, workspace, &executed).await;
			return Err(CoreError::Cancelled);
		}

		match perform_move(db, workspace, item).await {
			Ok(record) => executed.push(record),
			Err(err) => {
				rollback_all(db, workspace, &executed).await;
				return Err(err);
			}
		}
	}

	let payload = OrganizePayload {
		workspace_id: workspace.id,
		moves: executed,
	};
	let payload_text = serde_json::to_string(&payload)?;
	let operation_id = db.insert_operation(KIND_ORGANIZE, &payload_text).await?;

	info!(
		workspace_id = workspace.id,
		moved = payload.moves.len(),
		operation_id,
		"organize executed"
	);

	Ok(OrganizeResult {
		preview,
		operation_id: Some(operation_id),
	})
}

/// Move one file and update its row. The row is re-read so a file that
/// moved since the preview fails the whole execution as stale.
async fn perform_move(
	db: &Database,
	workspace: &Workspace,
	item: &OrganizeItem,
) -> Result<MoveRecord> {
	let file = db.get_file_by_id(item.file_id).await?;
	if file.path != item.original_path {
		return Err(CoreError::PlanStale(file.path));
	}

	let src = abs_path(workspace, &item.original_path);
	let dst = abs_path(workspace, &item.target_path);
	if let Some(parent) = dst.parent() {
		fs::create_dir_all(parent).await?;
	}

	fs::rename(&src, &dst).await?;

	let new_name = item
		.target_path
		.rsplit('/')
		.next()
		.unwrap_or(&item.target_path)
		.to_owned();
	if let Err(err) = db
		.update_file_name(file.id, &new_name, &item.target_path)
		.await
	{
		if let Err(revert_err) = fs::rename(&dst, &src).await {
			warn!(
				file_id = file.id,
				from = %dst.display(),
				to = %src.display(),
				%revert_err,
				"reverse rename failed after store update failure"
			);
		}
		return Err(err);
	}

	Ok(MoveRecord {
		file_id: file.id,
		from: item.original_path.clone(),
		to: item.target_path.clone(),
	})
}

/// Reverse already-executed moves in strict reverse order. Individual
/// failures are logged and do not stop the remaining restores.
async fn rollback_all(db: &Database, workspace: &Workspace, executed: &[MoveRecord]) {
	for record in executed.iter().rev() {
		if let Err(err) = rollback_move(db, workspace, record).await {
			warn!(file_id = record.file_id, %err, "rollback of organize move failed");
		}
	}
}

/// Put one journaled move back: rename on disk, then restore the row.
pub(super) async fn rollback_move(
	db: &Database,
	workspace: &Workspace,
	record: &MoveRecord,
) -> Result<()> {
	let src = abs_path(workspace, &record.to);
	let dst = abs_path(workspace, &record.from);
	if let Some(parent) = dst.parent() {
		fs::create_dir_all(parent).await?;
	}
	fs::rename(&src, &dst).await?;

	let name = record
		.from
		.rsplit('/')
		.next()
		.unwrap_or(&record.from)
		.to_owned();
	db.update_file_name(record.file_id, &name, &record.from).await
}
