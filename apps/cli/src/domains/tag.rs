use anyhow::Result;
use clap::Subcommand;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum TagCmd {
	/// List all tags
	List,
	/// Create a tag
	Create {
		name: String,
		#[arg(long, default_value = "")]
		color: String,
		#[arg(long)]
		parent: Option<i64>,
	},
	/// Delete a tag (detaches it from every file)
	Delete { id: i64 },
	/// Change a tag's display color
	Color { id: i64, color: String },
	/// Attach a tag to a file and re-render its name
	Add { file: i64, tag: i64 },
	/// Detach a tag from a file and re-render its name
	Remove { file: i64, tag: i64 },
	/// Clear every tag from a file
	Clear { file: i64 },
}

pub async fn run(ctx: &Context, cmd: TagCmd) -> Result<()> {
	match cmd {
		TagCmd::List => {
			let tags = ctx.engine.list_tags().await?;
			ctx.print(&tags, |list| {
				for tag in list {
					println!("{}\t{}\t{}", tag.id, tag.name, tag.color);
				}
			})
		}
		TagCmd::Create {
			name,
			color,
			parent,
		} => {
			let tag = ctx.engine.create_tag(&name, &color, parent).await?;
			ctx.print(&tag, |t| println!("{} (id: {})", t.name, t.id))
		}
		TagCmd::Delete { id } => {
			ctx.engine.delete_tag(id).await?;
			println!("deleted tag {id}");
			Ok(())
		}
		TagCmd::Color { id, color } => {
			ctx.engine.update_tag_color(id, &color).await?;
			println!("updated tag {id}");
			Ok(())
		}
		TagCmd::Add { file, tag } => {
			ctx.engine.add_tag_to_file(file, tag).await?;
			println!("tagged file {file}");
			Ok(())
		}
		TagCmd::Remove { file, tag } => {
			ctx.engine.remove_tag_from_file(file, tag).await?;
			println!("untagged file {file}");
			Ok(())
		}
		TagCmd::Clear { file } => {
			ctx.engine.clear_all_tags_from_file(file).await?;
			println!("cleared tags on file {file}");
			Ok(())
		}
	}
}
