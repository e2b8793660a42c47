//! File rows: snapshot import sessions, paging and tag-driven search

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, ExprTrait, Query};
use sea_orm::{
	ActiveValue::Set, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
	QueryOrder, QuerySelect, TransactionTrait,
};

use super::entities::{file_entry, file_tag, tag};
use super::Database;
use crate::domain::{FileMetadata, FilePage, FileRecord, FileSearchParams, Tag};
use crate::error::{CoreError, Result};

/// Page size bounds for the list endpoints
const DEFAULT_PAGE: u64 = 200;
const MAX_PAGE: u64 = 2000;

fn clamp_page(limit: u64) -> u64 {
	if limit == 0 {
		DEFAULT_PAGE
	} else {
		limit.min(MAX_PAGE)
	}
}

/// A transactional snapshot-replace of one workspace's file table.
///
/// Rows are stamped with explicit ids: a path that already had a row keeps
/// its previous id and creation stamp, and only genuinely new paths receive
/// fresh ids. Rescanning an unchanged tree therefore reproduces the
/// workspace's rows exactly, regardless of what other workspaces hold.
///
/// Dropping the session without calling [`ImportSession::commit`] rolls the
/// whole import back, leaving the table at its pre-scan contents.
pub struct ImportSession {
	txn: DatabaseTransaction,
	workspace_id: i64,
	/// path -> (id, created_at) of the rows being replaced
	prior: HashMap<String, (i64, chrono::DateTime<chrono::Utc>)>,
	/// Highest id in the whole table when the session opened
	next_id: i64,
}

impl ImportSession {
	/// Insert one batch of scanned metadata rows.
	pub async fn insert(&mut self, batch: &[FileMetadata]) -> Result<()> {
		if batch.is_empty() {
			return Ok(());
		}

		let prior = &self.prior;
		let next_id = &mut self.next_id;
		let models: Vec<file_entry::ActiveModel> = batch
			.iter()
			.map(|item| {
				let (id, created_at) = match prior.get(&item.path) {
					Some(&(id, created_at)) => (id, created_at),
					None => {
						*next_id += 1;
						(*next_id, item.created_at)
					}
				};
				file_entry::ActiveModel {
					id: Set(id),
					workspace_id: Set(item.workspace_id),
					path: Set(item.path.clone()),
					name: Set(item.name.clone()),
					size: Set(item.size),
					kind: Set(item.kind.as_str().to_owned()),
					mod_time: Set(item.mod_time),
					created_at: Set(created_at),
					hash: Set(item.hash.clone()),
				}
			})
			.collect();

		file_entry::Entity::insert_many(models)
			.exec(&self.txn)
			.await?;
		Ok(())
	}

	/// Commit the snapshot.
	pub async fn commit(self) -> Result<()> {
		self.txn.commit().await?;
		Ok(())
	}

	pub fn workspace_id(&self) -> i64 {
		self.workspace_id
	}
}

impl Database {
	/// Open an import session: records the workspace's current `(path, id,
	/// created_at)` rows, clears them inside a transaction and lets the
	/// caller stream replacement batches.
	pub async fn import_session(&self, workspace_id: i64) -> Result<ImportSession> {
		if workspace_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid workspace id".into()));
		}

		let txn = self.conn().begin().await?;

		let prior: HashMap<String, (i64, chrono::DateTime<chrono::Utc>)> =
			file_entry::Entity::find()
				.select_only()
				.column(file_entry::Column::Path)
				.column(file_entry::Column::Id)
				.column(file_entry::Column::CreatedAt)
				.filter(file_entry::Column::WorkspaceId.eq(workspace_id))
				.into_tuple::<(String, i64, chrono::DateTime<chrono::Utc>)>()
				.all(&txn)
				.await?
				.into_iter()
				.map(|(path, id, created_at)| (path, (id, created_at)))
				.collect();

		let next_id = file_entry::Entity::find()
			.select_only()
			.column(file_entry::Column::Id)
			.order_by_desc(file_entry::Column::Id)
			.into_tuple::<i64>()
			.one(&txn)
			.await?
			.unwrap_or(0);

		file_entry::Entity::delete_many()
			.filter(file_entry::Column::WorkspaceId.eq(workspace_id))
			.exec(&txn)
			.await?;

		Ok(ImportSession {
			txn,
			workspace_id,
			prior,
			next_id,
		})
	}

	/// One page of a workspace's files ordered by id, each decorated with
	/// its tag list.
	pub async fn list_files(&self, workspace_id: i64, limit: u64, offset: u64) -> Result<FilePage> {
		if workspace_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid workspace id".into()));
		}
		let limit = clamp_page(limit);

		let base = file_entry::Entity::find()
			.filter(file_entry::Column::WorkspaceId.eq(workspace_id));

		let total = base.clone().count(self.conn()).await?;
		let rows = base
			.order_by_asc(file_entry::Column::Id)
			.limit(limit)
			.offset(offset)
			.all(self.conn())
			.await?;

		self.decorate(total, rows).await
	}

	/// Files of the workspace carrying ALL of the given tags, optionally
	/// restricted to a folder or folder subtree.
	pub async fn search_files_by_tags(
		&self,
		workspace_id: i64,
		params: &FileSearchParams,
	) -> Result<FilePage> {
		if workspace_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid workspace id".into()));
		}
		if params.tag_ids.is_empty() {
			return Err(CoreError::InvalidRequest(
				"at least one tag is required".into(),
			));
		}
		let limit = clamp_page(params.limit);

		// Intersection semantics: the file must appear once per requested tag.
		let mut carrying_all = Query::select();
		carrying_all
			.column(file_tag::Column::FileId)
			.from(file_tag::Entity)
			.and_where(file_tag::Column::TagId.is_in(params.tag_ids.iter().copied()))
			.group_by_col(file_tag::Column::FileId)
			.and_having(Expr::cust("COUNT(DISTINCT tag_id)").eq(params.tag_ids.len() as i64));

		let mut base = file_entry::Entity::find()
			.filter(file_entry::Column::WorkspaceId.eq(workspace_id))
			.filter(file_entry::Column::Id.in_subquery(carrying_all));

		if !params.folder_path.is_empty() {
			let folder = params.folder_path.trim_end_matches('/');
			base = base.filter(file_entry::Column::Path.like(format!("{folder}/%")));
			if !params.include_subfolders {
				base = base.filter(file_entry::Column::Path.not_like(format!("{folder}/%/%")));
			}
		}

		let total = base.clone().count(self.conn()).await?;
		let rows = base
			.order_by_asc(file_entry::Column::Id)
			.limit(limit)
			.offset(params.offset)
			.all(self.conn())
			.await?;

		self.decorate(total, rows).await
	}

	pub async fn get_file_by_id(&self, file_id: i64) -> Result<FileRecord> {
		if file_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid file id".into()));
		}
		let row = file_entry::Entity::find_by_id(file_id)
			.one(self.conn())
			.await?
			.ok_or(CoreError::NotFound("file"))?;

		let mut tag_map = self.tags_for_files(&[file_id]).await?;
		let tags = tag_map.remove(&file_id).unwrap_or_default();
		Ok(to_record(row, tags))
	}

	/// Update exactly one row's basename and relpath.
	pub async fn update_file_name(
		&self,
		file_id: i64,
		new_name: &str,
		new_path: &str,
	) -> Result<()> {
		if file_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid file id".into()));
		}
		if new_name.is_empty() {
			return Err(CoreError::InvalidRequest("new file name is empty".into()));
		}
		if new_path.is_empty() {
			return Err(CoreError::InvalidRequest("new file path is empty".into()));
		}

		let res = file_entry::Entity::update_many()
			.col_expr(file_entry::Column::Name, Expr::value(new_name))
			.col_expr(file_entry::Column::Path, Expr::value(new_path))
			.filter(file_entry::Column::Id.eq(file_id))
			.exec(self.conn())
			.await?;

		if res.rows_affected == 0 {
			return Err(CoreError::NotFound("file"));
		}
		Ok(())
	}

	/// Tag lists for a set of files, each ordered by name case-insensitively.
	pub(crate) async fn tags_for_files(
		&self,
		file_ids: &[i64],
	) -> Result<HashMap<i64, Vec<Tag>>> {
		let mut map: HashMap<i64, Vec<Tag>> = HashMap::with_capacity(file_ids.len());
		if file_ids.is_empty() {
			return Ok(map);
		}

		let rows = file_tag::Entity::find()
			.filter(file_tag::Column::FileId.is_in(file_ids.iter().copied()))
			.find_also_related(tag::Entity)
			.all(self.conn())
			.await?;

		for (edge, tag_model) in rows {
			if let Some(tag_model) = tag_model {
				map.entry(edge.file_id).or_default().push(tag_model.into());
			}
		}
		for tags in map.values_mut() {
			tags.sort_by_key(|t| t.name.to_lowercase());
		}
		Ok(map)
	}

	async fn decorate(&self, total: u64, rows: Vec<file_entry::Model>) -> Result<FilePage> {
		let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
		let mut tag_map = self.tags_for_files(&ids).await?;

		let records = rows
			.into_iter()
			.map(|row| {
				let tags = tag_map.remove(&row.id).unwrap_or_default();
				to_record(row, tags)
			})
			.collect();

		Ok(FilePage { total, records })
	}
}

fn to_record(model: file_entry::Model, tags: Vec<Tag>) -> FileRecord {
	let kind = model.file_kind();
	FileRecord {
		id: model.id,
		workspace_id: model.workspace_id,
		path: model.path,
		name: model.name,
		size: model.size,
		kind,
		mod_time: model.mod_time,
		created_at: model.created_at,
		hash: model.hash,
		tags,
	}
}
