//! Property tests for the filename tag grammar

use proptest::prelude::*;
use te_core::domain::{TagGrouping, TagPosition, TagRule};
use te_core::ops::naming::{candidate_grammars, compose, parse, sanitize_component, strip_tags};

/// Tag names without brackets, separators or trim-sensitive edges
fn safe_tag_name() -> impl Strategy<Value = String> {
	"[a-zA-Z0-9][a-zA-Z0-9_-]{0,11}"
}

fn any_rule() -> impl Strategy<Value = TagRule> {
	(
		prop_oneof![Just(TagPosition::Prefix), Just(TagPosition::Suffix)],
		prop_oneof![Just(TagGrouping::Combined), Just(TagGrouping::Individual)],
		any::<bool>(),
	)
		.prop_map(|(position, grouping, add_spaces)| TagRule {
			position,
			grouping,
			add_spaces,
			..TagRule::default()
		})
}

proptest! {
	#[test]
	fn encode_decode_round_trips(
		tags in proptest::collection::vec(safe_tag_name(), 1..4),
		rule in any_rule(),
	) {
		let name = compose("document.txt", &tags, &rule);
		let decoded = parse(&name, &rule);
		prop_assert_eq!(decoded, tags);
	}

	#[test]
	fn strip_is_idempotent(stem in "[ a-zA-Z0-9\\[\\]()<>,._-]{0,24}") {
		let rule = TagRule::default();
		let grammars = candidate_grammars(&rule);
		let once = strip_tags(&stem, &grammars);
		let twice = strip_tags(&once, &grammars);
		prop_assert_eq!(&once, &twice);
	}

	#[test]
	fn strip_then_encode_produces_parseable_names(
		stem in "[a-zA-Z0-9 ]{1,12}",
		tags in proptest::collection::vec(safe_tag_name(), 1..3),
	) {
		let rule = TagRule::default();
		let name = compose(&format!("{stem}.dat"), &tags, &rule);
		// Re-encoding the encoded name must not stack blocks
		let again = compose(&name, &tags, &rule);
		prop_assert_eq!(&name, &again);
	}

	#[test]
	fn sanitize_is_closed_and_clean(input in "\\PC{0,32}") {
		let once = sanitize_component(&input);
		let twice = sanitize_component(&once);
		prop_assert_eq!(&once, &twice);

		for ch in once.chars() {
			prop_assert!(!matches!(ch, '<' | '>' | ':' | '"' | '|' | '?' | '*'));
			prop_assert!((ch as u32) >= 32 || ch == '\t');
		}
	}
}
