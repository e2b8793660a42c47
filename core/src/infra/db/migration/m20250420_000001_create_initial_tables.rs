//! Initial migration to create all tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Workspaces::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Workspaces::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Workspaces::Path).string().not_null().unique_key())
					.col(ColumnDef::new(Workspaces::Name).string().not_null())
					.col(
						ColumnDef::new(Workspaces::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Files::Table)
					.if_not_exists()
					.col(
						// Plain rowid pk, no AUTOINCREMENT: import
						// sessions stamp ids explicitly so a rescan of an
						// unchanged tree reproduces identical rows.
						ColumnDef::new(Files::Id)
							.integer()
							.not_null()
							.primary_key(),
					)
					.col(ColumnDef::new(Files::WorkspaceId).integer().not_null())
					.col(ColumnDef::new(Files::Path).string().not_null())
					.col(ColumnDef::new(Files::Name).string().not_null())
					.col(ColumnDef::new(Files::Size).big_integer().not_null().default(0))
					.col(
						ColumnDef::new(Files::Kind)
							.string()
							.not_null()
							.check(Expr::col(Files::Kind).is_in(["file", "dir"])),
					)
					.col(
						ColumnDef::new(Files::ModTime)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(Files::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(ColumnDef::new(Files::Hash).string().not_null().default(""))
					.foreign_key(
						ForeignKey::create()
							.from(Files::Table, Files::WorkspaceId)
							.to(Workspaces::Table, Workspaces::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_files_workspace_path")
					.table(Files::Table)
					.col(Files::WorkspaceId)
					.col(Files::Path)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_files_workspace_modtime")
					.table(Files::Table)
					.col(Files::WorkspaceId)
					.col(Files::ModTime)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Tags::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Tags::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						// Case-insensitive uniqueness lives on the column
						// collation so lookups inherit it too.
						ColumnDef::new(Tags::Name)
							.string()
							.not_null()
							.unique_key()
							.extra("COLLATE NOCASE"),
					)
					.col(ColumnDef::new(Tags::Color).string().not_null().default("#94a3b8"))
					.col(ColumnDef::new(Tags::ParentId).integer())
					.foreign_key(
						ForeignKey::create()
							.from(Tags::Table, Tags::ParentId)
							.to(Tags::Table, Tags::Id)
							.on_delete(ForeignKeyAction::SetNull),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_tags_parent")
					.table(Tags::Table)
					.col(Tags::ParentId)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(FileTags::Table)
					.if_not_exists()
					.col(ColumnDef::new(FileTags::FileId).integer().not_null())
					.col(ColumnDef::new(FileTags::TagId).integer().not_null())
					.primary_key(Index::create().col(FileTags::FileId).col(FileTags::TagId))
					.foreign_key(
						ForeignKey::create()
							.from(FileTags::Table, FileTags::FileId)
							.to(Files::Table, Files::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.foreign_key(
						ForeignKey::create()
							.from(FileTags::Table, FileTags::TagId)
							.to(Tags::Table, Tags::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Operations::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Operations::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Operations::Kind)
							.string()
							.not_null()
							.check(Expr::col(Operations::Kind).is_in(["organize", "tag"])),
					)
					.col(ColumnDef::new(Operations::Payload).text().not_null())
					.col(
						ColumnDef::new(Operations::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_operations_kind")
					.table(Operations::Table)
					.col(Operations::Kind)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Settings::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Settings::Key)
							.string()
							.not_null()
							.primary_key(),
					)
					.col(ColumnDef::new(Settings::Value).text().not_null())
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(RecentItems::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(RecentItems::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(RecentItems::Kind).string().not_null())
					.col(
						ColumnDef::new(RecentItems::Path)
							.string()
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(RecentItems::Name).string().not_null())
					.col(
						ColumnDef::new(RecentItems::OpenedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(RecentItems::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Settings::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Operations::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(FileTags::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Tags::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Files::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Workspaces::Table).to_owned())
			.await?;

		Ok(())
	}
}

#[derive(Iden)]
enum Workspaces {
	Table,
	Id,
	Path,
	Name,
	CreatedAt,
}

#[derive(Iden)]
enum Files {
	Table,
	Id,
	WorkspaceId,
	Path,
	Name,
	Size,
	Kind,
	ModTime,
	CreatedAt,
	Hash,
}

#[derive(Iden)]
enum Tags {
	Table,
	Id,
	Name,
	Color,
	ParentId,
}

#[derive(Iden)]
enum FileTags {
	Table,
	FileId,
	TagId,
}

#[derive(Iden)]
enum Operations {
	Table,
	Id,
	Kind,
	Payload,
	CreatedAt,
}

#[derive(Iden)]
enum Settings {
	Table,
	Key,
	Value,
}

#[derive(Iden)]
enum RecentItems {
	Table,
	Id,
	Kind,
	Path,
	Name,
	OpenedAt,
}
