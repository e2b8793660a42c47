//! Undo a journaled organize operation

use tracing::{info, warn};

use super::{execute::rollback_move, OrganizePayload, OrganizeUndoResult};
use crate::domain::Workspace;
use crate::error::{CoreError, Result};
use crate::infra::db::{entities::operation::KIND_ORGANIZE, Database};

/// Replay a journal entry in strict reverse order. The journal row is
/// deleted only when every move was restored; otherwise it stays for a
/// later retry.
pub async fn undo_organize(
	db: &Database,
	workspace: &Workspace,
	operation_id: i64,
) -> Result<OrganizeUndoResult> {
	let operation = db.get_operation(operation_id).await?;
	if operation.kind != KIND_ORGANIZE {
		return Err(CoreError::InvalidRequest(format!(
			"operation kind {:?} cannot be undone",
			operation.kind
		)));
	}

	let payload: OrganizePayload = serde_json::from_str(&operation.payload)?;
	if payload.workspace_id != workspace.id {
		return Err(CoreError::WorkspaceMismatch);
	}

	let mut result = OrganizeUndoResult::default();
	for record in payload.moves.iter().rev() {
		match rollback_move(db, workspace, record).await {
			Ok(()) => result.restored += 1,
			Err(err) => {
				result.failed += 1;
				warn!(file_id = record.file_id, %err, "undo of organize move failed");
			}
		}
	}

	if result.failed == 0 {
		db.delete_operation(operation_id).await?;
	}

	info!(
		operation_id,
		restored = result.restored,
		failed = result.failed,
		"organize undo finished"
	);
	Ok(result)
}
