//! Workspace rows

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::entities::workspace;
use super::Database;
use crate::domain::Workspace;
use crate::error::{CoreError, Result};

impl Database {
	/// Insert a workspace by path, or update its display name when the path
	/// already exists. Returns the canonical row.
	pub async fn upsert_workspace(&self, path: &str, name: &str) -> Result<Workspace> {
		if path.is_empty() {
			return Err(CoreError::InvalidRequest("workspace path is empty".into()));
		}
		if name.is_empty() {
			return Err(CoreError::InvalidRequest("workspace name is empty".into()));
		}

		let model = workspace::ActiveModel {
			path: Set(path.to_owned()),
			name: Set(name.to_owned()),
			created_at: Set(Utc::now()),
			..Default::default()
		};

		workspace::Entity::insert(model)
			.on_conflict(
				OnConflict::column(workspace::Column::Path)
					.update_column(workspace::Column::Name)
					.to_owned(),
			)
			.exec(self.conn())
			.await?;

		let row = workspace::Entity::find()
			.filter(workspace::Column::Path.eq(path))
			.one(self.conn())
			.await?
			.ok_or(CoreError::NotFound("workspace"))?;

		Ok(row.into())
	}

	pub async fn get_workspace(&self, id: i64) -> Result<Workspace> {
		if id <= 0 {
			return Err(CoreError::InvalidRequest("invalid workspace id".into()));
		}
		let row = workspace::Entity::find_by_id(id)
			.one(self.conn())
			.await?
			.ok_or(CoreError::NotFound("workspace"))?;
		Ok(row.into())
	}

	/// All workspaces, most recently created first
	pub async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
		let rows = workspace::Entity::find()
			.order_by_desc(workspace::Column::CreatedAt)
			.all(self.conn())
			.await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	/// Delete a workspace; its files and their tag edges go with it.
	pub async fn remove_workspace(&self, id: i64) -> Result<()> {
		if id <= 0 {
			return Err(CoreError::InvalidRequest("invalid workspace id".into()));
		}
		let res = workspace::Entity::delete_by_id(id).exec(self.conn()).await?;
		if res.rows_affected == 0 {
			return Err(CoreError::NotFound("workspace"));
		}
		Ok(())
	}
}
