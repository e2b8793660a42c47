//! Recently opened items, deduplicated by path and bounded in count

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
	ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
	TransactionTrait,
};

use super::entities::recent_item;
use super::Database;
use crate::domain::{RecentItem, RecentKind};
use crate::error::{CoreError, Result};

/// Hard cap on stored recency rows
const RECENT_CAP: u64 = 20;

impl Database {
	/// Upsert by path and bump the open timestamp. Rows beyond the cap are
	/// pruned oldest-first in the same transaction.
	pub async fn add_recent_item(&self, kind: RecentKind, path: &str, name: &str) -> Result<()> {
		if path.is_empty() {
			return Err(CoreError::InvalidRequest("recent item path is empty".into()));
		}

		let txn = self.conn().begin().await?;

		let model = recent_item::ActiveModel {
			kind: Set(kind.as_str().to_owned()),
			path: Set(path.to_owned()),
			name: Set(name.to_owned()),
			opened_at: Set(Utc::now()),
			..Default::default()
		};
		recent_item::Entity::insert(model)
			.on_conflict(
				OnConflict::column(recent_item::Column::Path)
					.update_columns([
						recent_item::Column::Kind,
						recent_item::Column::Name,
						recent_item::Column::OpenedAt,
					])
					.to_owned(),
			)
			.exec(&txn)
			.await?;

		let stale: Vec<i64> = recent_item::Entity::find()
			.order_by_desc(recent_item::Column::OpenedAt)
			.all(&txn)
			.await?
			.into_iter()
			.skip(RECENT_CAP as usize)
			.map(|r| r.id)
			.collect();
		if !stale.is_empty() {
			recent_item::Entity::delete_many()
				.filter(recent_item::Column::Id.is_in(stale))
				.exec(&txn)
				.await?;
		}

		txn.commit().await?;
		Ok(())
	}

	/// Most recently opened first.
	pub async fn get_recent_items(&self, limit: u64) -> Result<Vec<RecentItem>> {
		let limit = if limit == 0 { RECENT_CAP } else { limit };
		let rows = recent_item::Entity::find()
			.order_by_desc(recent_item::Column::OpenedAt)
			.limit(limit)
			.all(self.conn())
			.await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	pub async fn remove_recent_item(&self, path: &str) -> Result<()> {
		recent_item::Entity::delete_many()
			.filter(recent_item::Column::Path.eq(path))
			.exec(self.conn())
			.await?;
		Ok(())
	}
}
