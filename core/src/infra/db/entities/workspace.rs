//! Workspace entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workspaces")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	#[sea_orm(unique)]
	pub path: String,
	pub name: String,
	pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::file_entry::Entity")]
	FileEntries,
}

impl Related<super::file_entry::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::FileEntries.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Workspace {
	fn from(m: Model) -> Self {
		Self {
			id: m.id,
			path: m.path,
			name: m.name,
			created_at: m.created_at,
		}
	}
}
