use anyhow::{Context as _, Result};
use clap::Subcommand;
use te_core::ops::organize::{ItemStatus, OrganizeLevel, OrganizePreview, OrganizeRequest};
use te_core::CancellationToken;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum OrganizeCmd {
	/// Compute the move plan without touching the disk
	Preview {
		/// One hierarchy level as comma-separated tag ids; repeatable
		#[arg(long = "level", required = true)]
		levels: Vec<String>,
	},
	/// Execute the plan and journal it for undo
	Run {
		#[arg(long = "level", required = true)]
		levels: Vec<String>,
	},
	/// Reverse a journaled organize operation
	Undo { operation_id: i64 },
}

fn parse_levels(raw: &[String]) -> Result<OrganizeRequest> {
	let mut levels = Vec::with_capacity(raw.len());
	for level in raw {
		let tag_ids = level
			.split(',')
			.map(|part| {
				part.trim()
					.parse::<i64>()
					.with_context(|| format!("invalid tag id {part:?}"))
			})
			.collect::<Result<Vec<i64>>>()?;
		levels.push(OrganizeLevel { tag_ids });
	}
	Ok(OrganizeRequest { levels })
}

fn print_preview(ctx: &Context, preview: &OrganizePreview) -> Result<()> {
	ctx.print(preview, |p| {
		for item in &p.items {
			match item.status {
				ItemStatus::Move => {
					println!("move\t{} -> {}", item.original_path, item.target_path)
				}
				ItemStatus::AlreadyInPlace => println!("ok\t{}", item.original_path),
				ItemStatus::SkipMissingTags => println!(
					"skip\t{} (missing: {})",
					item.original_path,
					item.missing_tags.join(", ")
				),
				ItemStatus::Conflict => {
					println!("conflict\t{} ({})", item.original_path, item.message)
				}
			}
		}
		let s = &p.summary;
		println!(
			"{} total: {} moves, {} in place, {} skipped, {} conflicts",
			s.total, s.move_count, s.already_in_place, s.skip_count, s.conflict_count
		);
	})
}

pub async fn run(ctx: &Context, cmd: OrganizeCmd) -> Result<()> {
	match cmd {
		OrganizeCmd::Preview { levels } => {
			let request = parse_levels(&levels)?;
			let preview = ctx.engine.preview_organize(&request).await?;
			print_preview(ctx, &preview)
		}
		OrganizeCmd::Run { levels } => {
			let request = parse_levels(&levels)?;
			let cancel = CancellationToken::new();
			let result = ctx.engine.execute_organize(&request, &cancel).await?;
			print_preview(ctx, &result.preview)?;
			match result.operation_id {
				Some(id) => println!("journaled as operation {id}"),
				None => println!("nothing to move"),
			}
			Ok(())
		}
		OrganizeCmd::Undo { operation_id } => {
			let result = ctx.engine.undo_organize(operation_id).await?;
			println!("restored {}, failed {}", result.restored, result.failed);
			Ok(())
		}
	}
}
