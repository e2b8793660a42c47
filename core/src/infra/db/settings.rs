//! Key/value settings rows

use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, EntityTrait};

use super::entities::setting;
use super::Database;
use crate::error::Result;

impl Database {
	/// Fetch a setting; absent keys read as an empty string.
	pub async fn get_setting(&self, key: &str) -> Result<String> {
		let row = setting::Entity::find_by_id(key.to_owned())
			.one(self.conn())
			.await?;
		Ok(row.map(|r| r.value).unwrap_or_default())
	}

	/// Upsert a setting value.
	pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
		let model = setting::ActiveModel {
			key: Set(key.to_owned()),
			value: Set(value.to_owned()),
		};
		setting::Entity::insert(model)
			.on_conflict(
				OnConflict::column(setting::Column::Key)
					.update_column(setting::Column::Value)
					.to_owned(),
			)
			.exec(self.conn())
			.await?;
		Ok(())
	}
}
