//! File entry entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::FileKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	pub workspace_id: i64,
	/// Relpath, forward-slash normalized, unique per workspace
	pub path: String,
	pub name: String,
	pub size: i64,
	/// `file` or `dir`
	pub kind: String,
	pub mod_time: DateTimeUtc,
	pub created_at: DateTimeUtc,
	/// Identity token, empty for directories
	pub hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::workspace::Entity",
		from = "Column::WorkspaceId",
		to = "super::workspace::Column::Id",
		on_delete = "Cascade"
	)]
	Workspace,
	#[sea_orm(has_many = "super::file_tag::Entity")]
	FileTags,
}

impl Related<super::workspace::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Workspace.def()
	}
}

impl Related<super::file_tag::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::FileTags.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
	pub fn file_kind(&self) -> FileKind {
		FileKind::from_str(&self.kind).unwrap_or(FileKind::File)
	}
}
