//! File <-> tag junction entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_tags")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = false)]
	pub file_id: i64,
	#[sea_orm(primary_key, auto_increment = false)]
	pub tag_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::file_entry::Entity",
		from = "Column::FileId",
		to = "super::file_entry::Column::Id",
		on_delete = "Cascade"
	)]
	FileEntry,
	#[sea_orm(
		belongs_to = "super::tag::Entity",
		from = "Column::TagId",
		to = "super::tag::Column::Id",
		on_delete = "Cascade"
	)]
	Tag,
}

impl Related<super::file_entry::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::FileEntry.def()
	}
}

impl Related<super::tag::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Tag.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
