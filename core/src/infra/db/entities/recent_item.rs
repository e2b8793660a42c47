//! Recent item entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{RecentItem, RecentKind};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recent_items")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	/// `workspace` or `folder`
	pub kind: String,
	#[sea_orm(unique)]
	pub path: String,
	pub name: String,
	pub opened_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RecentItem {
	fn from(m: Model) -> Self {
		let kind = RecentKind::from_str(&m.kind).unwrap_or(RecentKind::Folder);
		Self {
			id: m.id,
			kind,
			path: m.path,
			name: m.name,
			opened_at: m.opened_at,
		}
	}
}
