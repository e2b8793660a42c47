//! TagExplorer engine
//!
//! Indexes user-selected directories into an embedded store, attaches tags
//! to the discovered files, and reshapes the filesystem to reflect those
//! tags: either by embedding the tag list in basenames or by moving files
//! into a tag-derived folder hierarchy with journaled, reversible moves.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ops;

pub use error::{CoreError, Result};
pub use tokio_util::sync::CancellationToken;

use std::path::Path;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::WorkspaceConfig;
use crate::domain::{
	AppSettings, FilePage, FileRecord, FileSearchParams, RecentItem, RecentKind, ScanResult, Tag,
	TagRule, Workspace,
};
use crate::infra::db::Database;
use crate::ops::organize::{OrganizePreview, OrganizeRequest, OrganizeResult, OrganizeUndoResult};
use crate::ops::{naming, organize, rename, scan};

/// Settings table key holding the serialized [`AppSettings`] document
const SETTINGS_KEY: &str = "app_settings";

/// Default page size for the recents list
const RECENTS_DEFAULT: u64 = 5;

/// The engine: one store connection, the process-wide tag grammar, and at
/// most one active workspace. Public operations are meant to be driven by a
/// single caller at a time.
pub struct Engine {
	db: Database,
	settings: RwLock<AppSettings>,
	active: RwLock<Option<Workspace>>,
}

impl Engine {
	/// Open the engine against the default platform config directory.
	pub async fn open() -> Result<Self> {
		Self::open_at(&config::default_data_dir()?).await
	}

	/// Open the engine against an explicit data directory.
	pub async fn open_at(data_dir: &Path) -> Result<Self> {
		let db = Database::open(&data_dir.join(config::DB_FILE_NAME)).await?;

		let settings = match db.get_setting(SETTINGS_KEY).await? {
			raw if raw.is_empty() => AppSettings::default(),
			raw => serde_json::from_str(&raw).unwrap_or_else(|err| {
				warn!(%err, "stored settings are unreadable, using defaults");
				AppSettings::default()
			}),
		};

		Ok(Self {
			db,
			settings: RwLock::new(settings),
			active: RwLock::new(None),
		})
	}

	/// Direct store access, mainly for tests
	pub fn db(&self) -> &Database {
		&self.db
	}

	async fn require_workspace(&self) -> Result<Workspace> {
		self.active
			.read()
			.await
			.clone()
			.ok_or(CoreError::NotInitialized("no active workspace"))
	}

	/// Snapshot of the grammar for one operation, immune to mid-flight
	/// settings changes.
	async fn rule_snapshot(&self) -> TagRule {
		self.settings.read().await.tag_rule.clone()
	}

	// ---- workspaces ----

	/// Upsert and scan a directory, make it the active workspace, then run
	/// the filename tag induction pass over the fresh snapshot.
	pub async fn scan(&self, root: &Path, cancel: &CancellationToken) -> Result<ScanResult> {
		let root = std::path::absolute(root)?;
		let meta = tokio::fs::metadata(&root).await?;
		if !meta.is_dir() {
			return Err(CoreError::InvalidRequest(format!(
				"{} is not a directory",
				root.display()
			)));
		}

		let name = root
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_else(|| root.to_string_lossy().into_owned());
		let workspace = self
			.db
			.upsert_workspace(&root.to_string_lossy(), &name)
			.await?;

		info!(workspace_id = workspace.id, path = %workspace.path, "scanning workspace");
		let result = scan::scan_workspace(&self.db, &workspace, cancel).await?;

		*self.active.write().await = Some(workspace.clone());

		let rule = self.rule_snapshot().await;
		match scan::implicit_tags::run(&self.db, workspace.id, &rule, cancel).await {
			Ok(_) => {}
			Err(CoreError::Cancelled) => return Err(CoreError::Cancelled),
			Err(err) => {
				warn!(workspace_id = workspace.id, %err, "filename tag pass failed")
			}
		}

		Ok(result)
	}

	pub async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
		self.db.list_workspaces().await
	}

	pub async fn active_workspace(&self) -> Option<Workspace> {
		self.active.read().await.clone()
	}

	pub async fn set_active_workspace(&self, workspace_id: i64) -> Result<Workspace> {
		let workspace = self.db.get_workspace(workspace_id).await?;
		info!(workspace_id, path = %workspace.path, "switched active workspace");
		*self.active.write().await = Some(workspace.clone());
		Ok(workspace)
	}

	/// Delete a workspace and everything hanging off it in the store. The
	/// on-disk files are untouched.
	pub async fn remove_workspace(&self, workspace_id: i64) -> Result<()> {
		self.db.remove_workspace(workspace_id).await?;
		let mut active = self.active.write().await;
		if matches!(active.as_ref(), Some(ws) if ws.id == workspace_id) {
			*active = None;
		}
		Ok(())
	}

	// ---- files ----

	pub async fn list_files(&self, limit: u64, offset: u64) -> Result<FilePage> {
		let workspace = self.require_workspace().await?;
		self.db.list_files(workspace.id, limit, offset).await
	}

	pub async fn search_files_by_tags(&self, params: &FileSearchParams) -> Result<FilePage> {
		let workspace = self.require_workspace().await?;
		self.db.search_files_by_tags(workspace.id, params).await
	}

	pub async fn get_file(&self, file_id: i64) -> Result<FileRecord> {
		self.db.get_file_by_id(file_id).await
	}

	pub async fn rename_file(&self, file_id: i64, new_name: &str) -> Result<()> {
		let workspace = self.require_workspace().await?;
		rename::rename_file(&self.db, &workspace, file_id, new_name).await
	}

	pub async fn rename_file_with_tags(&self, file_id: i64) -> Result<()> {
		let workspace = self.require_workspace().await?;
		let rule = self.rule_snapshot().await;
		rename::rename_file_with_tags(&self.db, &workspace, file_id, &rule).await
	}

	// ---- tags ----

	pub async fn list_tags(&self) -> Result<Vec<Tag>> {
		self.db.list_tags().await
	}

	pub async fn create_tag(&self, name: &str, color: &str, parent_id: Option<i64>) -> Result<Tag> {
		self.db.create_tag(name, color, parent_id).await
	}

	pub async fn delete_tag(&self, tag_id: i64) -> Result<()> {
		self.db.delete_tag(tag_id).await
	}

	pub async fn update_tag_color(&self, tag_id: i64, color: &str) -> Result<()> {
		self.db.update_tag_color(tag_id, color).await
	}

	/// Attach a tag, then re-render the basename. A rename failure does not
	/// undo the tag change; it is logged and the mutation stands.
	pub async fn add_tag_to_file(&self, file_id: i64, tag_id: i64) -> Result<()> {
		self.db.add_tag_to_file(file_id, tag_id).await?;
		self.rename_after_tag_change(file_id).await;
		Ok(())
	}

	pub async fn remove_tag_from_file(&self, file_id: i64, tag_id: i64) -> Result<()> {
		self.db.remove_tag_from_file(file_id, tag_id).await?;
		self.rename_after_tag_change(file_id).await;
		Ok(())
	}

	pub async fn clear_all_tags_from_file(&self, file_id: i64) -> Result<()> {
		self.db.clear_all_tags(file_id).await?;
		self.rename_after_tag_change(file_id).await;
		Ok(())
	}

	async fn rename_after_tag_change(&self, file_id: i64) {
		if let Err(err) = self.rename_file_with_tags(file_id).await {
			warn!(file_id, %err, "rename after tag change failed");
		}
	}

	// ---- settings ----

	pub async fn get_settings(&self) -> AppSettings {
		self.settings.read().await.clone()
	}

	/// Validate, persist and apply a settings document. When the tag rule
	/// changed and a workspace is active, every tagged file is re-rendered
	/// under the new grammar.
	pub async fn update_settings(
		&self,
		mut settings: AppSettings,
		cancel: &CancellationToken,
	) -> Result<()> {
		settings.validate()?;

		if let Some(custom) = &mut settings.tag_rule.custom_format {
			for (field, value) in [
				("prefix", &mut custom.prefix),
				("suffix", &mut custom.suffix),
				("separator", &mut custom.separator),
			] {
				let sanitized = naming::sanitize_component(value);
				if sanitized != *value {
					warn!(field, from = %value, to = %sanitized, "sanitized custom format component");
					*value = sanitized;
				}
			}
		}

		let changed = {
			let mut current = self.settings.write().await;
			let changed = current.rule_changed(&settings);
			*current = settings.clone();
			changed
		};

		let payload = serde_json::to_string(&settings)?;
		if let Err(err) = self.db.set_setting(SETTINGS_KEY, &payload).await {
			// The in-memory document already switched; the store copy will
			// catch up on the next successful update.
			error!(%err, "failed to persist settings");
		}

		info!(
			format = ?settings.tag_rule.format,
			position = ?settings.tag_rule.position,
			changed, "settings updated"
		);

		if changed {
			if let Some(workspace) = self.active_workspace().await {
				let rule = settings.tag_rule.clone();
				match rename::rename_all_with_tags(&self.db, &workspace, &rule, cancel).await {
					Ok(_) => {}
					Err(CoreError::Cancelled) => return Err(CoreError::Cancelled),
					Err(err) => {
						warn!(workspace_id = workspace.id, %err, "grammar re-render pass failed")
					}
				}
			}
		}

		Ok(())
	}

	// ---- organize ----

	pub async fn preview_organize(&self, request: &OrganizeRequest) -> Result<OrganizePreview> {
		let workspace = self.require_workspace().await?;
		organize::build_plan(&self.db, &workspace, request).await
	}

	pub async fn execute_organize(
		&self,
		request: &OrganizeRequest,
		cancel: &CancellationToken,
	) -> Result<OrganizeResult> {
		let workspace = self.require_workspace().await?;
		organize::execute_organize(&self.db, &workspace, request, cancel).await
	}

	pub async fn undo_organize(&self, operation_id: i64) -> Result<OrganizeUndoResult> {
		let workspace = self.require_workspace().await?;
		organize::undo_organize(&self.db, &workspace, operation_id).await
	}

	// ---- recents ----

	/// Most recently opened items. Entries whose path vanished from disk
	/// are dropped from the result and deleted from the store.
	pub async fn get_recent_items(&self, limit: u64) -> Result<Vec<RecentItem>> {
		let limit = if limit == 0 { RECENTS_DEFAULT } else { limit };
		let items = self.db.get_recent_items(limit).await?;

		let mut alive = Vec::with_capacity(items.len());
		for item in items {
			if tokio::fs::try_exists(&item.path).await.unwrap_or(false) {
				alive.push(item);
			} else {
				let _ = self.db.remove_recent_item(&item.path).await;
			}
		}
		Ok(alive)
	}

	pub async fn add_recent_item(&self, kind: RecentKind, path: &str, name: &str) -> Result<()> {
		self.db.add_recent_item(kind, path, name).await
	}

	pub async fn remove_recent_item(&self, path: &str) -> Result<()> {
		self.db.remove_recent_item(path).await
	}

	// ---- workspace config documents ----

	pub fn save_workspace_config(
		&self,
		path: &Path,
		name: &str,
		folders: &[String],
	) -> Result<std::path::PathBuf> {
		config::save_workspace_config(path, name, folders)
	}

	pub fn update_workspace_config(
		&self,
		path: &Path,
		name: &str,
		folders: &[String],
	) -> Result<()> {
		config::update_workspace_config(path, name, folders)
	}

	/// Load a `.teworkplace` document and record it in the recents list.
	pub async fn load_workspace_config(&self, path: &Path) -> Result<WorkspaceConfig> {
		let loaded = config::load_workspace_config(path)?;
		if let Err(err) = self
			.db
			.add_recent_item(RecentKind::Workspace, &path.to_string_lossy(), &loaded.name)
			.await
		{
			warn!(path = %path.display(), %err, "failed to record recent workspace");
		}
		Ok(loaded)
	}
}
