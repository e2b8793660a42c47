//! TagExplorer CLI

mod context;
mod domains;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use te_core::Engine;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "te", version, about = "Tag-aware file indexing and organization")]
struct Cli {
	/// Data directory holding the metadata store (defaults to the platform
	/// config directory)
	#[arg(long, global = true)]
	data_dir: Option<PathBuf>,

	/// Activate this workspace before running the command
	#[arg(short, long, global = true)]
	workspace: Option<i64>,

	/// Print raw JSON instead of formatted output
	#[arg(long, global = true)]
	json: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Scan and manage workspaces
	#[command(subcommand)]
	Workspace(domains::workspace::WorkspaceCmd),
	/// List, search and rename indexed files
	#[command(subcommand)]
	Files(domains::files::FilesCmd),
	/// Manage tags and file/tag assignments
	#[command(subcommand)]
	Tag(domains::tag::TagCmd),
	/// Inspect and change the filename tag grammar
	#[command(subcommand)]
	Settings(domains::settings::SettingsCmd),
	/// Preview, run and undo tag-driven organization
	#[command(subcommand)]
	Organize(domains::organize::OrganizeCmd),
	/// Recently opened workspaces and folders
	#[command(subcommand)]
	Recent(domains::recent::RecentCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.with_target(false)
		.init();

	let cli = Cli::parse();

	let engine = match &cli.data_dir {
		Some(dir) => Engine::open_at(dir).await?,
		None => Engine::open().await?,
	};
	if let Some(workspace_id) = cli.workspace {
		engine.set_active_workspace(workspace_id).await?;
	}

	let ctx = context::Context {
		engine,
		json: cli.json,
	};

	match cli.command {
		Command::Workspace(cmd) => domains::workspace::run(&ctx, cmd).await,
		Command::Files(cmd) => domains::files::run(&ctx, cmd).await,
		Command::Tag(cmd) => domains::tag::run(&ctx, cmd).await,
		Command::Settings(cmd) => domains::settings::run(&ctx, cmd).await,
		Command::Organize(cmd) => domains::organize::run(&ctx, cmd).await,
		Command::Recent(cmd) => domains::recent::run(&ctx, cmd).await,
	}
}
