//! Metadata store built on SeaORM over embedded SQLite
//!
//! The store owns the single connection to the database file. It is not safe
//! to open the same file from two engine instances at once.

use sea_orm::{
	ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, Statement,
};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod entities;
pub mod migration;

mod files;
mod journal;
mod recents;
mod settings;
mod tags;
mod workspaces;

pub use files::ImportSession;

/// Wrapper around the single store connection
pub struct Database {
	conn: DatabaseConnection,
}

impl Database {
	/// Open (or create) the database file and run pending migrations.
	pub async fn open(path: &Path) -> crate::error::Result<Self> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		let db_url = format!("sqlite://{}?mode=rwc", path.display());

		// Single writer: the engine serializes every store operation
		// through this one connection.
		let mut opt = ConnectOptions::new(db_url);
		opt.max_connections(1)
			.min_connections(1)
			.connect_timeout(Duration::from_secs(8))
			.sqlx_logging(false); // we log through tracing instead

		let conn = SeaDatabase::connect(opt).await.map_err(crate::error::CoreError::from)?;

		for pragma in [
			"PRAGMA busy_timeout = 5000",
			"PRAGMA journal_mode = WAL",
			"PRAGMA foreign_keys = ON",
		] {
			conn.execute(Statement::from_string(
				sea_orm::DatabaseBackend::Sqlite,
				pragma,
			))
			.await
			.map_err(crate::error::CoreError::from)?;
		}

		migration::Migrator::up(&conn, None)
			.await
			.map_err(crate::error::CoreError::from)?;

		info!(path = %path.display(), "opened metadata store");

		Ok(Self { conn })
	}

	/// Get the underlying connection
	pub fn conn(&self) -> &DatabaseConnection {
		&self.conn
	}
}
