//! Operation journal entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Journal kind for reversible bulk moves
pub const KIND_ORGANIZE: &str = "organize";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operations")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i64,
	/// `organize` today; `tag` is reserved as an extension point
	pub kind: String,
	pub payload: String,
	pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
