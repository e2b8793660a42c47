use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use te_core::domain::RecentKind;
use te_core::CancellationToken;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum WorkspaceCmd {
	/// Scan a directory and make it the active workspace
	Scan { path: PathBuf },
	/// List known workspaces
	List,
	/// Make a workspace the active one
	Use { id: i64 },
	/// Delete a workspace and its indexed metadata
	Remove { id: i64 },
	/// Write a .teworkplace config document
	SaveConfig {
		path: PathBuf,
		#[arg(long)]
		name: String,
		#[arg(long = "folder", required = true)]
		folders: Vec<String>,
	},
	/// Load a .teworkplace config document and scan its first folder
	LoadConfig { path: PathBuf },
}

pub async fn run(ctx: &Context, cmd: WorkspaceCmd) -> Result<()> {
	match cmd {
		WorkspaceCmd::Scan { path } => {
			let cancel = CancellationToken::new();
			let result = ctx.engine.scan(&path, &cancel).await?;

			ctx.engine
				.add_recent_item(
					RecentKind::Folder,
					&result.workspace.path,
					&result.workspace.name,
				)
				.await?;

			ctx.print(&result, |r| {
				println!(
					"workspace {} ({}): {} files, {} directories",
					r.workspace.id, r.workspace.path, r.file_count, r.directory_count
				);
			})
		}
		WorkspaceCmd::List => {
			let workspaces = ctx.engine.list_workspaces().await?;
			ctx.print(&workspaces, |list| {
				if list.is_empty() {
					println!("no workspaces");
					return;
				}
				for ws in list {
					println!("{}\t{}\t{}", ws.id, ws.name, ws.path);
				}
			})
		}
		WorkspaceCmd::Use { id } => {
			let workspace = ctx.engine.set_active_workspace(id).await?;
			println!("using workspace {} ({})", workspace.id, workspace.path);
			Ok(())
		}
		WorkspaceCmd::Remove { id } => {
			ctx.engine.remove_workspace(id).await?;
			println!("removed workspace {id}");
			Ok(())
		}
		WorkspaceCmd::SaveConfig {
			path,
			name,
			folders,
		} => {
			let written = ctx.engine.save_workspace_config(&path, &name, &folders)?;
			println!("saved {}", written.display());
			Ok(())
		}
		WorkspaceCmd::LoadConfig { path } => {
			let config = ctx.engine.load_workspace_config(&path).await?;
			let first = PathBuf::from(&config.folders[0]);
			let cancel = CancellationToken::new();
			let result = ctx.engine.scan(&first, &cancel).await?;

			ctx.print(&result, |r| {
				println!(
					"loaded {:?}: scanned {} ({} files, {} directories)",
					config.name, r.workspace.path, r.file_count, r.directory_count
				);
			})
		}
	}
}
