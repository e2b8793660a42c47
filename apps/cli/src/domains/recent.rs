use anyhow::Result;
use clap::Subcommand;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum RecentCmd {
	/// Most recently opened workspaces and folders
	List {
		#[arg(long, default_value_t = 5)]
		limit: u64,
	},
	/// Forget one entry
	Remove { path: String },
}

pub async fn run(ctx: &Context, cmd: RecentCmd) -> Result<()> {
	match cmd {
		RecentCmd::List { limit } => {
			let items = ctx.engine.get_recent_items(limit).await?;
			ctx.print(&items, |list| {
				if list.is_empty() {
					println!("no recent items");
					return;
				}
				for item in list {
					println!(
						"{}\t{}\t{}",
						item.opened_at.format("%Y-%m-%d %H:%M"),
						item.kind.as_str(),
						item.path
					);
				}
			})
		}
		RecentCmd::Remove { path } => {
			ctx.engine.remove_recent_item(&path).await?;
			println!("removed {path}");
			Ok(())
		}
	}
}
