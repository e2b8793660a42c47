//! Operation journal rows

use chrono::Utc;
use sea_orm::{ActiveValue::Set, EntityTrait};

use super::entities::operation;
use super::Database;
use crate::error::{CoreError, Result};

impl Database {
	pub async fn insert_operation(&self, kind: &str, payload: &str) -> Result<i64> {
		let model = operation::ActiveModel {
			kind: Set(kind.to_owned()),
			payload: Set(payload.to_owned()),
			created_at: Set(Utc::now()),
			..Default::default()
		};
		let res = operation::Entity::insert(model).exec(self.conn()).await?;
		Ok(res.last_insert_id)
	}

	pub async fn get_operation(&self, operation_id: i64) -> Result<operation::Model> {
		if operation_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid operation id".into()));
		}
		operation::Entity::find_by_id(operation_id)
			.one(self.conn())
			.await?
			.ok_or(CoreError::NotFound("operation"))
	}

	pub async fn delete_operation(&self, operation_id: i64) -> Result<()> {
		if operation_id <= 0 {
			return Err(CoreError::InvalidRequest("invalid operation id".into()));
		}
		operation::Entity::delete_by_id(operation_id)
			.exec(self.conn())
			.await?;
		Ok(())
	}
}
