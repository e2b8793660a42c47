use anyhow::Result;
use clap::Subcommand;
use te_core::domain::FileSearchParams;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum FilesCmd {
	/// Page through the active workspace's files
	List {
		#[arg(long, default_value_t = 200)]
		limit: u64,
		#[arg(long, default_value_t = 0)]
		offset: u64,
	},
	/// Files carrying ALL of the given tags
	Search {
		/// Tag ids, repeatable
		#[arg(long = "tag", required = true)]
		tags: Vec<i64>,
		/// Restrict to this folder relpath
		#[arg(long, default_value = "")]
		folder: String,
		#[arg(long)]
		include_subfolders: bool,
		#[arg(long, default_value_t = 200)]
		limit: u64,
		#[arg(long, default_value_t = 0)]
		offset: u64,
	},
	/// Show one file with its tags
	Show { id: i64 },
	/// Rename a file in place
	Rename { id: i64, name: String },
	/// Re-render a file's name from its tag set
	RenameWithTags { id: i64 },
}

pub async fn run(ctx: &Context, cmd: FilesCmd) -> Result<()> {
	match cmd {
		FilesCmd::List { limit, offset } => {
			let page = ctx.engine.list_files(limit, offset).await?;
			print_page(ctx, &page)
		}
		FilesCmd::Search {
			tags,
			folder,
			include_subfolders,
			limit,
			offset,
		} => {
			let params = FileSearchParams {
				tag_ids: tags,
				folder_path: folder,
				include_subfolders,
				limit,
				offset,
			};
			let page = ctx.engine.search_files_by_tags(&params).await?;
			print_page(ctx, &page)
		}
		FilesCmd::Show { id } => {
			let file = ctx.engine.get_file(id).await?;
			ctx.print(&file, |f| {
				println!("{}\t{}\t{} bytes", f.id, f.path, f.size);
				for tag in &f.tags {
					println!("  #{} {}", tag.id, tag.name);
				}
			})
		}
		FilesCmd::Rename { id, name } => {
			ctx.engine.rename_file(id, &name).await?;
			println!("renamed file {id}");
			Ok(())
		}
		FilesCmd::RenameWithTags { id } => {
			ctx.engine.rename_file_with_tags(id).await?;
			let file = ctx.engine.get_file(id).await?;
			println!("{}", file.name);
			Ok(())
		}
	}
}

fn print_page(ctx: &Context, page: &te_core::domain::FilePage) -> Result<()> {
	ctx.print(page, |p| {
		for record in &p.records {
			let tags: Vec<&str> = record.tags.iter().map(|t| t.name.as_str()).collect();
			println!(
				"{}\t{}\t[{}]",
				record.id,
				record.path,
				tags.join(", ")
			);
		}
		println!("{} of {} total", p.records.len(), p.total);
	})
}
