//! Filename tag grammar: encode, decode and strip tag blocks
//!
//! A basename can carry its tag list either as one separator-joined block
//! (`report [draft, 2025].pdf`) or as one block per tag
//! (`[draft][2025] report.pdf`), at either end of the stem. The decoder
//! recognizes every built-in bracket pair plus the configured custom one, so
//! files tagged under an older rule keep their tags when the rule changes.

use crate::domain::{CustomFormat, TagFormat, TagGrouping, TagPosition, TagRule};

/// Strip sweeps give up after this many full passes over the grammar set.
const MAX_STRIP_PASSES: usize = 20;

/// A resolved prefix/suffix/separator triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brackets {
	pub prefix: String,
	pub suffix: String,
	pub separator: String,
}

impl Brackets {
	fn new(prefix: &str, suffix: &str, separator: &str) -> Self {
		Self {
			prefix: prefix.to_owned(),
			suffix: suffix.to_owned(),
			separator: separator.to_owned(),
		}
	}

	fn usable(&self) -> bool {
		!self.prefix.is_empty() && !self.suffix.is_empty()
	}
}

fn builtin(format: TagFormat) -> Brackets {
	match format {
		TagFormat::SquareBrackets => Brackets::new("[", "]", ", "),
		TagFormat::Brackets => Brackets::new("<", ">", ", "),
		TagFormat::Parentheses => Brackets::new("(", ")", ", "),
		// Resolved separately; square brackets are the fallback when the
		// custom triple is absent.
		TagFormat::Custom => Brackets::new("[", "]", ", "),
	}
}

fn sanitize_custom(custom: &CustomFormat) -> Brackets {
	Brackets {
		prefix: sanitize_component(&custom.prefix),
		suffix: sanitize_component(&custom.suffix),
		separator: sanitize_component(&custom.separator),
	}
}

/// The bracket triple the encoder writes with under this rule
pub fn resolve(rule: &TagRule) -> Brackets {
	match (rule.format, &rule.custom_format) {
		(TagFormat::Custom, Some(custom)) => sanitize_custom(custom),
		(format, _) => builtin(format),
	}
}

/// Every grammar the decoder and stripper must recognize: the three
/// built-ins plus the configured custom triple, in that order.
pub fn candidate_grammars(rule: &TagRule) -> Vec<Brackets> {
	let mut grammars = vec![
		builtin(TagFormat::SquareBrackets),
		builtin(TagFormat::Brackets),
		builtin(TagFormat::Parentheses),
	];
	if rule.format == TagFormat::Custom {
		if let Some(custom) = &rule.custom_format {
			let resolved = sanitize_custom(custom);
			if resolved.usable() {
				grammars.push(resolved);
			}
		}
	}
	grammars
}

/// Replace characters a filename cannot carry with visually similar ones,
/// drop control characters and trim edge spaces and dots.
///
/// Empty input stays empty; non-empty input that sanitizes away entirely
/// becomes `_`.
pub fn sanitize_component(input: &str) -> String {
	if input.is_empty() {
		return String::new();
	}

	let mut out = String::with_capacity(input.len());
	for ch in input.chars() {
		match ch {
			'<' => out.push('＜'),
			'>' => out.push('＞'),
			':' => out.push('：'),
			'"' => out.push('\''),
			'|' => out.push('丨'),
			'?' => out.push('？'),
			'*' => out.push('＊'),
			c if (c as u32) < 32 && c != '\t' => {}
			c => out.push(c),
		}
	}

	let out = out.trim_matches([' ', '.']).to_string();
	if out.is_empty() {
		"_".to_owned()
	} else {
		out
	}
}

/// Sanitize a tag name for use as an organize folder segment. On top of the
/// filename rules, path separators become `_` and stray square brackets are
/// dropped so the segment cannot escape its level.
pub fn sanitize_folder_segment(name: &str) -> String {
	let cleaned = sanitize_component(name.trim())
		.replace(['/', '\\'], "_")
		.replace(['[', ']'], "");
	if cleaned.is_empty() {
		"未命名".to_owned()
	} else {
		cleaned
	}
}

/// Split a basename into stem and extension. The extension runs from the
/// last dot to the end, matching how desktop shells treat multi-dot names.
pub fn split_ext(name: &str) -> (&str, &str) {
	match name.rfind('.') {
		Some(idx) => name.split_at(idx),
		None => (name, ""),
	}
}

/// Regenerate a basename from its current name and an ordered tag list.
///
/// Any tag blocks already embedded in the stem are removed first, so the
/// encoder is safe to run repeatedly and across grammar changes.
pub fn compose(original_name: &str, tags: &[String], rule: &TagRule) -> String {
	let (stem, ext) = split_ext(original_name);
	let clean = strip_tags(stem, &candidate_grammars(rule));

	if tags.is_empty() {
		return format!("{clean}{ext}");
	}

	let brackets = resolve(rule);
	let names: Vec<String> = tags.iter().map(|t| sanitize_component(t)).collect();

	let block = match rule.grouping {
		TagGrouping::Individual => names
			.iter()
			.map(|n| format!("{}{}{}", brackets.prefix, n, brackets.suffix))
			.collect::<String>(),
		TagGrouping::Combined => format!(
			"{}{}{}",
			brackets.prefix,
			names.join(&brackets.separator),
			brackets.suffix
		),
	};

	let space = if rule.add_spaces { " " } else { "" };
	match rule.position {
		TagPosition::Prefix => format!("{block}{space}{clean}{ext}"),
		TagPosition::Suffix => format!("{clean}{space}{block}{ext}"),
	}
}

/// Extract the tag list embedded in a basename, or an empty list when no
/// known grammar matches.
pub fn parse(file_name: &str, rule: &TagRule) -> Vec<String> {
	let (stem, _ext) = split_ext(file_name);

	for brackets in candidate_grammars(rule) {
		if !brackets.usable() {
			continue;
		}

		let tags = parse_individual(stem, &brackets, rule.position);
		if !tags.is_empty() {
			return tags;
		}
		if let Some(tags) = parse_combined_suffix(stem, &brackets) {
			return tags;
		}
		if let Some(tags) = parse_combined_prefix(stem, &brackets) {
			return tags;
		}
	}

	Vec::new()
}

/// Peel `prefix…suffix` blocks off the configured end of the stem, one tag
/// per block. An interior holding a bracket character or the separator is
/// not a single tag, so peeling stops there.
fn parse_individual(stem: &str, b: &Brackets, position: TagPosition) -> Vec<String> {
	let mut tags: Vec<String> = Vec::new();

	match position {
		TagPosition::Suffix => {
			let mut rest = stem;
			loop {
				if !rest.ends_with(&b.suffix) {
					break;
				}
				let body = &rest[..rest.len() - b.suffix.len()];
				let Some(idx) = body.rfind(&b.prefix) else {
					break;
				};
				let interior = &body[idx + b.prefix.len()..];
				if !valid_single_tag(interior, b) {
					break;
				}
				let trimmed = interior.trim();
				if !trimmed.is_empty() {
					// Peeling right to left, so restore list order
					tags.insert(0, trimmed.to_owned());
				}
				rest = body[..idx].trim_end_matches(' ');
			}
		}
		TagPosition::Prefix => {
			let mut rest = stem;
			loop {
				if !rest.starts_with(&b.prefix) {
					break;
				}
				let body = &rest[b.prefix.len()..];
				let Some(idx) = body.find(&b.suffix) else {
					break;
				};
				let interior = &body[..idx];
				if !valid_single_tag(interior, b) {
					break;
				}
				let trimmed = interior.trim();
				if !trimmed.is_empty() {
					tags.push(trimmed.to_owned());
				}
				rest = body[idx + b.suffix.len()..].trim_start_matches(' ');
			}
		}
	}

	tags
}

fn valid_single_tag(interior: &str, b: &Brackets) -> bool {
	if interior.contains(&b.prefix) || interior.contains(&b.suffix) {
		return false;
	}
	// A separator inside means this is a combined block, not one tag
	if !b.separator.is_empty() && interior.contains(&b.separator) {
		return false;
	}
	true
}

fn parse_combined_suffix(stem: &str, b: &Brackets) -> Option<Vec<String>> {
	if !stem.ends_with(&b.suffix) {
		return None;
	}
	let idx = stem.rfind(&b.prefix)?;
	let end = stem.len() - b.suffix.len();
	let start = idx + b.prefix.len();
	if start > end {
		return None;
	}
	split_list(&stem[start..end], &b.separator)
}

fn parse_combined_prefix(stem: &str, b: &Brackets) -> Option<Vec<String>> {
	if !stem.starts_with(&b.prefix) {
		return None;
	}
	let body = &stem[b.prefix.len()..];
	let idx = body.find(&b.suffix)?;
	split_list(&body[..idx], &b.separator)
}

fn split_list(interior: &str, separator: &str) -> Option<Vec<String>> {
	if interior.is_empty() {
		return None;
	}
	let parts: Vec<String> = if separator.is_empty() {
		vec![interior.to_owned()]
	} else {
		interior.split(separator).map(str::to_owned).collect()
	};
	let tags: Vec<String> = parts
		.into_iter()
		.map(|p| p.trim().to_owned())
		.filter(|p| !p.is_empty())
		.collect();
	if tags.is_empty() {
		None
	} else {
		Some(tags)
	}
}

/// Remove every tag block any known grammar recognizes from a stem.
///
/// Sweeps the grammar set repeatedly until a pass removes nothing, bounded
/// by [`MAX_STRIP_PASSES`].
pub fn strip_tags(stem: &str, grammars: &[Brackets]) -> String {
	let mut result = stem.trim().to_owned();

	for _ in 0..MAX_STRIP_PASSES {
		let before = result.clone();
		for b in grammars {
			if !b.usable() {
				continue;
			}
			result = remove_suffix_blocks(&result, b);
			result = remove_prefix_blocks(&result, b);
		}
		if result == before {
			break;
		}
	}

	result.trim().to_owned()
}

fn remove_suffix_blocks(input: &str, b: &Brackets) -> String {
	let mut rest = input;
	loop {
		if !rest.ends_with(&b.suffix) {
			break;
		}
		let body = &rest[..rest.len() - b.suffix.len()];
		let Some(idx) = body.rfind(&b.prefix) else {
			break;
		};
		let interior = &body[idx + b.prefix.len()..];
		if interior.contains(&b.prefix) || interior.contains(&b.suffix) {
			break;
		}
		rest = body[..idx].trim_end_matches(' ');
	}
	rest.to_owned()
}

fn remove_prefix_blocks(input: &str, b: &Brackets) -> String {
	let mut rest = input;
	loop {
		if !rest.starts_with(&b.prefix) {
			break;
		}
		let body = &rest[b.prefix.len()..];
		let Some(idx) = body.find(&b.suffix) else {
			break;
		};
		let interior = &body[..idx];
		if interior.contains(&b.prefix) || interior.contains(&b.suffix) {
			break;
		}
		rest = body[idx + b.suffix.len()..].trim_start_matches(' ');
	}
	rest.to_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::TagRule;

	fn rule() -> TagRule {
		TagRule::default()
	}

	fn tags(names: &[&str]) -> Vec<String> {
		names.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn compose_default_combined_suffix() {
		let name = compose("photo.jpg", &tags(&["sunset"]), &rule());
		assert_eq!(name, "photo [sunset].jpg");

		let name = compose("report.pdf", &tags(&["draft", "2025"]), &rule());
		assert_eq!(name, "report [draft, 2025].pdf");
	}

	#[test]
	fn compose_replaces_existing_blocks() {
		let name = compose("photo [old].jpg", &tags(&["new"]), &rule());
		assert_eq!(name, "photo [new].jpg");
	}

	#[test]
	fn compose_empty_tags_strips_blocks() {
		let name = compose("photo [sunset].jpg", &[], &rule());
		assert_eq!(name, "photo.jpg");
	}

	#[test]
	fn compose_individual_prefix_parentheses() {
		let r = TagRule {
			format: TagFormat::Parentheses,
			position: TagPosition::Prefix,
			grouping: TagGrouping::Individual,
			add_spaces: true,
			custom_format: None,
		};
		let name = compose("photo [sunset].jpg", &tags(&["sunset"]), &r);
		assert_eq!(name, "(sunset) photo.jpg");

		let name = compose("photo.jpg", &tags(&["a", "b"]), &r);
		assert_eq!(name, "(a)(b) photo.jpg");
	}

	#[test]
	fn compose_without_spaces() {
		let r = TagRule {
			add_spaces: false,
			..rule()
		};
		assert_eq!(compose("photo.jpg", &tags(&["x"]), &r), "photo[x].jpg");
	}

	#[test]
	fn compose_sanitizes_tag_names() {
		let name = compose("doc.txt", &tags(&["a<b>c"]), &rule());
		assert_eq!(name, "doc [a＜b＞c].txt");
	}

	#[test]
	fn parse_combined_block_splits_on_separator() {
		let found = parse("report [draft, 2025].pdf", &rule());
		assert_eq!(found, tags(&["draft", "2025"]));
	}

	#[test]
	fn parse_individual_blocks_at_suffix() {
		let found = parse("report [draft][2025].pdf", &rule());
		assert_eq!(found, tags(&["draft", "2025"]));
	}

	#[test]
	fn parse_individual_blocks_at_prefix() {
		let r = TagRule {
			position: TagPosition::Prefix,
			..rule()
		};
		let found = parse("[a][b] report.pdf", &r);
		assert_eq!(found, tags(&["a", "b"]));
	}

	#[test]
	fn parse_combined_prefix_block() {
		let found = parse("[alpha, beta] report.pdf", &rule());
		assert_eq!(found, tags(&["alpha", "beta"]));
	}

	#[test]
	fn parse_recognizes_other_builtin_grammars() {
		assert_eq!(parse("x (a, b).txt", &rule()), tags(&["a", "b"]));
		assert_eq!(parse("x <a>.txt", &rule()), tags(&["a"]));
	}

	#[test]
	fn parse_plain_name_yields_nothing() {
		assert!(parse("plain-file.txt", &rule()).is_empty());
		assert!(parse("no extension", &rule()).is_empty());
	}

	#[test]
	fn parse_custom_grammar() {
		let r = TagRule {
			format: TagFormat::Custom,
			custom_format: Some(CustomFormat {
				prefix: "{".into(),
				suffix: "}".into(),
				separator: ";".into(),
			}),
			..rule()
		};
		assert_eq!(parse("doc {a;b}.txt", &r), tags(&["a", "b"]));
	}

	#[test]
	fn strip_removes_every_known_block() {
		let grammars = candidate_grammars(&rule());
		assert_eq!(strip_tags("report [draft, 2025]", &grammars), "report");
		assert_eq!(strip_tags("[a][b] report", &grammars), "report");
		assert_eq!(strip_tags("(x) report [y]", &grammars), "report");
		assert_eq!(strip_tags("report", &grammars), "report");
	}

	#[test]
	fn strip_leaves_unbalanced_brackets_alone() {
		let grammars = candidate_grammars(&rule());
		assert_eq!(strip_tags("report [draft", &grammars), "report [draft");
	}

	#[test]
	fn strip_is_idempotent() {
		let grammars = candidate_grammars(&rule());
		for input in ["x [a] ", " [a] x", "x [a][b]", "[a, b] x [c]"] {
			let once = strip_tags(input, &grammars);
			let twice = strip_tags(&once, &grammars);
			assert_eq!(once, twice, "strip not idempotent for {input:?}");
		}
	}

	#[test]
	fn sanitize_replaces_forbidden_characters() {
		assert_eq!(sanitize_component("a|b"), "a丨b");
		assert_eq!(sanitize_component("y:z?"), "y：z？");
		assert_eq!(sanitize_component("\"x\""), "'x'");
		assert_eq!(sanitize_component("a*b"), "a＊b");
	}

	#[test]
	fn sanitize_trims_and_falls_back() {
		assert_eq!(sanitize_component(" name. "), "name");
		assert_eq!(sanitize_component(" . "), "_");
		assert_eq!(sanitize_component(""), "");
	}

	#[test]
	fn sanitize_drops_control_characters_except_tab() {
		assert_eq!(sanitize_component("a\u{1}b\tc"), "ab\tc");
	}

	#[test]
	fn folder_segment_rules() {
		assert_eq!(sanitize_folder_segment("a/b"), "a_b");
		assert_eq!(sanitize_folder_segment("a\\b"), "a_b");
		assert_eq!(sanitize_folder_segment("[x]"), "x");
		assert_eq!(sanitize_folder_segment("[]"), "未命名");
		assert_eq!(sanitize_folder_segment(""), "未命名");
	}

	#[test]
	fn split_ext_takes_last_dot() {
		assert_eq!(split_ext("a.tar.gz"), ("a.tar", ".gz"));
		assert_eq!(split_ext("plain"), ("plain", ""));
		assert_eq!(split_ext(".bashrc"), ("", ".bashrc"));
	}

	#[test]
	fn round_trip_combined_and_individual() {
		for grouping in [TagGrouping::Combined, TagGrouping::Individual] {
			for position in [TagPosition::Prefix, TagPosition::Suffix] {
				let r = TagRule {
					grouping,
					position,
					..rule()
				};
				let list = tags(&["alpha", "beta"]);
				let name = compose("doc.txt", &list, &r);
				assert_eq!(parse(&name, &r), list, "grammar {grouping:?}/{position:?}");
			}
		}
	}
}
