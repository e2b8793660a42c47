//! Post-scan filename tag induction
//!
//! After a scan commits, every regular file whose basename carries a
//! recognizable tag block gets those tags attached, auto-creating missing
//! tag rows with the default color.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{FileKind, TagRule};
use crate::error::{CoreError, Result};
use crate::infra::db::Database;
use crate::ops::naming;

/// Files examined per page
const TAG_SCAN_BATCH: u64 = 1000;

/// Run the induction pass over a whole workspace. Per-file failures are
/// logged and skipped. Returns how many files received tags.
pub async fn run(
	db: &Database,
	workspace_id: i64,
	rule: &TagRule,
	cancel: &CancellationToken,
) -> Result<u64> {
	let mut offset = 0u64;
	let mut tagged = 0u64;

	loop {
		if cancel.is_cancelled() {
			return Err(CoreError::Cancelled);
		}

		let page = db.list_files(workspace_id, TAG_SCAN_BATCH, offset).await?;
		if page.records.is_empty() {
			break;
		}
		let fetched = page.records.len() as u64;

		for file in page.records {
			if cancel.is_cancelled() {
				return Err(CoreError::Cancelled);
			}
			if file.kind != FileKind::File {
				continue;
			}

			let tags = naming::parse(&file.name, rule);
			if tags.is_empty() {
				continue;
			}

			if let Err(err) = db.batch_add_tags_to_file(file.id, &tags).await {
				warn!(file_id = file.id, name = %file.name, %err, "failed to attach filename tags");
				continue;
			}
			debug!(file_id = file.id, name = %file.name, ?tags, "attached filename tags");
			tagged += 1;
		}

		if fetched < TAG_SCAN_BATCH {
			break;
		}
		offset += fetched;
	}

	info!(workspace_id, tagged, "filename tag pass finished");
	Ok(tagged)
}
