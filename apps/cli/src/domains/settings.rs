use anyhow::{bail, Result};
use clap::{Subcommand, ValueEnum};
use te_core::domain::{AppSettings, CustomFormat, TagFormat, TagGrouping, TagPosition, TagRule};
use te_core::CancellationToken;

use crate::context::Context;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
	SquareBrackets,
	Brackets,
	Parentheses,
	Custom,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PositionArg {
	Prefix,
	Suffix,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GroupingArg {
	Combined,
	Individual,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
	/// Print the current settings
	Show,
	/// Replace the tag grammar (triggers a workspace-wide re-render when
	/// the rule changed and a workspace is active)
	Set {
		#[arg(long, value_enum)]
		format: FormatArg,
		#[arg(long, value_enum)]
		position: PositionArg,
		#[arg(long, value_enum)]
		grouping: GroupingArg,
		#[arg(long)]
		spaces: bool,
		#[arg(long)]
		prefix: Option<String>,
		#[arg(long)]
		suffix: Option<String>,
		#[arg(long)]
		separator: Option<String>,
	},
}

pub async fn run(ctx: &Context, cmd: SettingsCmd) -> Result<()> {
	match cmd {
		SettingsCmd::Show => {
			let settings = ctx.engine.get_settings().await;
			ctx.print(&settings, |s| {
				println!(
					"format: {:?}, position: {:?}, grouping: {:?}, spaces: {}",
					s.tag_rule.format, s.tag_rule.position, s.tag_rule.grouping, s.tag_rule.add_spaces
				);
				if let Some(custom) = &s.tag_rule.custom_format {
					println!(
						"custom: {:?} / {:?} / {:?}",
						custom.prefix, custom.suffix, custom.separator
					);
				}
			})
		}
		SettingsCmd::Set {
			format,
			position,
			grouping,
			spaces,
			prefix,
			suffix,
			separator,
		} => {
			let format = match format {
				FormatArg::SquareBrackets => TagFormat::SquareBrackets,
				FormatArg::Brackets => TagFormat::Brackets,
				FormatArg::Parentheses => TagFormat::Parentheses,
				FormatArg::Custom => TagFormat::Custom,
			};
			let custom_format = if format == TagFormat::Custom {
				match (prefix, suffix, separator) {
					(Some(prefix), Some(suffix), Some(separator)) => Some(CustomFormat {
						prefix,
						suffix,
						separator,
					}),
					_ => bail!("--format custom requires --prefix, --suffix and --separator"),
				}
			} else {
				None
			};

			let settings = AppSettings {
				tag_rule: TagRule {
					format,
					custom_format,
					position: match position {
						PositionArg::Prefix => TagPosition::Prefix,
						PositionArg::Suffix => TagPosition::Suffix,
					},
					add_spaces: spaces,
					grouping: match grouping {
						GroupingArg::Combined => TagGrouping::Combined,
						GroupingArg::Individual => TagGrouping::Individual,
					},
				},
			};

			let cancel = CancellationToken::new();
			ctx.engine.update_settings(settings, &cancel).await?;
			println!("settings updated");
			Ok(())
		}
	}
}
