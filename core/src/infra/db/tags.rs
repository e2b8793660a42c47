//! Tag rows and file<->tag edges

use sea_orm::sea_query::OnConflict;
use sea_orm::{
	ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
	TransactionTrait,
};

use super::entities::{file_tag, tag};
use super::Database;
use crate::domain::{tag::DEFAULT_TAG_COLOR, Tag};
use crate::error::{CoreError, Result};

impl Database {
	/// Create a tag. The name is trimmed; an empty color falls back to the
	/// default palette entry.
	pub async fn create_tag(
		&self,
		name: &str,
		color: &str,
		parent_id: Option<i64>,
	) -> Result<Tag> {
		let name = name.trim();
		let color = color.trim();
		if name.is_empty() {
			return Err(CoreError::InvalidRequest("tag name is empty".into()));
		}
		let color = if color.is_empty() {
			DEFAULT_TAG_COLOR
		} else {
			color
		};

		let model = tag::ActiveModel {
			name: Set(name.to_owned()),
			color: Set(color.to_owned()),
			parent_id: Set(parent_id),
			..Default::default()
		};
		let res = tag::Entity::insert(model).exec(self.conn()).await?;

		let row = tag::Entity::find_by_id(res.last_insert_id)
			.one(self.conn())
			.await?
			.ok_or(CoreError::NotFound("tag"))?;
		Ok(row.into())
	}

	/// Delete a tag; edges cascade, children keep living with a null parent.
	pub async fn delete_tag(&self, tag_id: i64) -> Result<()> {
		if tag_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid tag id".into()));
		}
		let res = tag::Entity::delete_by_id(tag_id).exec(self.conn()).await?;
		if res.rows_affected == 0 {
			return Err(CoreError::NotFound("tag"));
		}
		Ok(())
	}

	pub async fn update_tag_color(&self, tag_id: i64, color: &str) -> Result<()> {
		if tag_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid tag id".into()));
		}
		let color = color.trim();
		let color = if color.is_empty() {
			DEFAULT_TAG_COLOR
		} else {
			color
		};

		let res = tag::Entity::update_many()
			.col_expr(
				tag::Column::Color,
				sea_orm::sea_query::Expr::value(color),
			)
			.filter(tag::Column::Id.eq(tag_id))
			.exec(self.conn())
			.await?;
		if res.rows_affected == 0 {
			return Err(CoreError::NotFound("tag"));
		}
		Ok(())
	}

	/// All tags ordered by name, case-insensitively (column collation).
	pub async fn list_tags(&self) -> Result<Vec<Tag>> {
		let rows = tag::Entity::find()
			.order_by_asc(tag::Column::Name)
			.all(self.conn())
			.await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	/// Case-insensitive lookup; creates the tag with the default color and
	/// no parent when missing.
	pub async fn get_or_create_tag(&self, name: &str) -> Result<Tag> {
		let name = name.trim();
		if name.is_empty() {
			return Err(CoreError::InvalidRequest("tag name is empty".into()));
		}

		// The name column collates NOCASE, so plain equality folds case.
		let existing = tag::Entity::find()
			.filter(tag::Column::Name.eq(name))
			.one(self.conn())
			.await?;
		if let Some(row) = existing {
			return Ok(row.into());
		}

		self.create_tag(name, DEFAULT_TAG_COLOR, None).await
	}

	/// Attach a tag to a file. Re-attaching an existing pair is a no-op.
	pub async fn add_tag_to_file(&self, file_id: i64, tag_id: i64) -> Result<()> {
		if file_id <= 0 || tag_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid file or tag id".into()));
		}
		insert_edge(self.conn(), file_id, tag_id).await
	}

	pub async fn remove_tag_from_file(&self, file_id: i64, tag_id: i64) -> Result<()> {
		if file_id <= 0 || tag_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid file or tag id".into()));
		}
		file_tag::Entity::delete_many()
			.filter(file_tag::Column::FileId.eq(file_id))
			.filter(file_tag::Column::TagId.eq(tag_id))
			.exec(self.conn())
			.await?;
		Ok(())
	}

	pub async fn clear_all_tags(&self, file_id: i64) -> Result<()> {
		if file_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid file id".into()));
		}
		file_tag::Entity::delete_many()
			.filter(file_tag::Column::FileId.eq(file_id))
			.exec(self.conn())
			.await?;
		Ok(())
	}

	/// Get-or-create every named tag and attach it to the file, all inside
	/// one transaction. Duplicate pairs are skipped.
	pub async fn batch_add_tags_to_file(&self, file_id: i64, tag_names: &[String]) -> Result<()> {
		if file_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid file id".into()));
		}
		if tag_names.is_empty() {
			return Ok(());
		}

		let txn = self.conn().begin().await?;

		for raw in tag_names {
			let name = raw.trim();
			if name.is_empty() {
				continue;
			}

			let tag_id = match tag::Entity::find()
				.filter(tag::Column::Name.eq(name))
				.one(&txn)
				.await?
			{
				Some(row) => row.id,
				None => {
					let model = tag::ActiveModel {
						name: Set(name.to_owned()),
						color: Set(DEFAULT_TAG_COLOR.to_owned()),
						parent_id: Set(None),
						..Default::default()
					};
					tag::Entity::insert(model).exec(&txn).await?.last_insert_id
				}
			};

			insert_edge(&txn, file_id, tag_id).await?;
		}

		txn.commit().await?;
		Ok(())
	}
}

async fn insert_edge<C: ConnectionTrait>(conn: &C, file_id: i64, tag_id: i64) -> Result<()> {
	let model = file_tag::ActiveModel {
		file_id: Set(file_id),
		tag_id: Set(tag_id),
	};
	let res = file_tag::Entity::insert(model)
		.on_conflict(
			OnConflict::columns([file_tag::Column::FileId, file_tag::Column::TagId])
				.do_nothing()
				.to_owned(),
		)
		.exec(conn)
		.await;

	match res {
		Ok(_) => Ok(()),
		// Conflict skipped: the pair already existed
		Err(DbErr::RecordNotInserted) => Ok(()),
		Err(err) => Err(err.into()),
	}
}
