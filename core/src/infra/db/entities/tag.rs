//! Tag entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	/// Unique under COLLATE NOCASE
	pub name: String,
	pub color: String,
	pub parent_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "Entity",
		from = "Column::ParentId",
		to = "Column::Id",
		on_delete = "SetNull"
	)]
	Parent,
	#[sea_orm(has_many = "super::file_tag::Entity")]
	FileTags,
}

impl Related<super::file_tag::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::FileTags.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Tag {
	fn from(m: Model) -> Self {
		Self {
			id: m.id,
			name: m.name,
			color: m.color,
			parent_id: m.parent_id,
		}
	}
}
