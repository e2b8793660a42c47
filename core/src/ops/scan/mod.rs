//! Workspace scanner
//!
//! Reconciles one workspace's file table with its on-disk contents using a
//! snapshot-replace import session: the table is cleared and re-populated
//! inside a single transaction, so a failed or cancelled scan leaves the
//! previous snapshot untouched.

mod filters;
pub mod implicit_tags;

pub use filters::is_excluded_dir;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{FileKind, FileMetadata, ScanResult, Workspace};
use crate::error::{CoreError, Result};
use crate::infra::db::Database;

/// Rows buffered between flushes to the import session
const IMPORT_BATCH: usize = 500;

/// Walk the workspace root and replace its file rows with the current
/// on-disk state. Unreadable entries are logged and skipped; cancellation
/// rolls the whole import back.
pub async fn scan_workspace(
	db: &Database,
	workspace: &Workspace,
	cancel: &CancellationToken,
) -> Result<ScanResult> {
	let mut session = db.import_session(workspace.id).await?;
	let root = PathBuf::from(&workspace.path);

	let mut batch: Vec<FileMetadata> = Vec::with_capacity(IMPORT_BATCH);
	let mut file_count = 0u64;
	let mut directory_count = 0u64;

	let mut pending = vec![root.clone()];
	while let Some(dir) = pending.pop() {
		if cancel.is_cancelled() {
			return Err(CoreError::Cancelled);
		}

		let mut reader = match fs::read_dir(&dir).await {
			Ok(reader) => reader,
			Err(err) => {
				warn!(path = %dir.display(), %err, "skipping unreadable directory");
				continue;
			}
		};

		let mut entries = Vec::new();
		loop {
			match reader.next_entry().await {
				Ok(Some(entry)) => entries.push(entry),
				Ok(None) => break,
				Err(err) => {
					warn!(path = %dir.display(), %err, "directory listing aborted early");
					break;
				}
			}
		}
		// Deterministic insertion order regardless of readdir order
		entries.sort_by_key(|e| e.file_name());

		for entry in entries {
			if cancel.is_cancelled() {
				return Err(CoreError::Cancelled);
			}

			let name = entry.file_name().to_string_lossy().into_owned();
			let path = entry.path();
			let meta = match entry.metadata().await {
				Ok(meta) => meta,
				Err(err) => {
					warn!(path = %path.display(), %err, "skipping unreadable entry");
					continue;
				}
			};

			let relpath = match relative_slash(&root, &path) {
				Some(rel) => rel,
				None => {
					warn!(path = %path.display(), "entry escaped the workspace root");
					continue;
				}
			};

			let mod_time: DateTime<Utc> = meta
				.modified()
				.map(DateTime::from)
				.unwrap_or_else(|_| Utc::now());

			let item = if meta.is_dir() {
				if is_excluded_dir(&name) {
					continue;
				}
				pending.push(path.clone());
				directory_count += 1;
				FileMetadata {
					workspace_id: workspace.id,
					path: relpath,
					name,
					size: 0,
					kind: FileKind::Dir,
					mod_time,
					created_at: Utc::now(),
					hash: String::new(),
				}
			} else {
				let size = meta.len() as i64;
				let nanos = mod_time.timestamp_nanos_opt().unwrap_or_default();
				let hash = format!("{relpath}_{size}_{nanos}");
				file_count += 1;
				FileMetadata {
					workspace_id: workspace.id,
					path: relpath,
					name,
					size,
					kind: FileKind::File,
					mod_time,
					created_at: Utc::now(),
					hash,
				}
			};

			batch.push(item);
			if batch.len() >= IMPORT_BATCH {
				session.insert(&batch).await?;
				batch.clear();
			}
		}
	}

	session.insert(&batch).await?;
	session.commit().await?;

	info!(
		workspace_id = workspace.id,
		files = file_count,
		directories = directory_count,
		"scan committed"
	);

	Ok(ScanResult {
		workspace: workspace.clone(),
		file_count,
		directory_count,
	})
}

/// Forward-slash relpath of `path` under `root`, or `None` when the entry
/// is not inside the root.
fn relative_slash(root: &Path, path: &Path) -> Option<String> {
	let rel = path.strip_prefix(root).ok()?;
	let parts: Vec<String> = rel
		.components()
		.map(|c| c.as_os_str().to_string_lossy().into_owned())
		.collect();
	if parts.is_empty() {
		return None;
	}
	Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn relative_slash_normalizes_separators() {
		let root = Path::new("/tmp/ws");
		let nested = root.join("a").join("b.txt");
		assert_eq!(relative_slash(root, &nested), Some("a/b.txt".to_owned()));
	}

	#[test]
	fn relative_slash_rejects_root_and_outsiders() {
		let root = Path::new("/tmp/ws");
		assert_eq!(relative_slash(root, root), None);
		assert_eq!(relative_slash(root, Path::new("/etc/passwd")), None);
	}
}
