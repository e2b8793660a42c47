//! Process-wide settings, currently the filename tag grammar

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Which bracket pair encloses tag blocks in a basename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagFormat {
	/// `[tag]`
	SquareBrackets,
	/// `<tag>`
	Brackets,
	/// `(tag)`
	Parentheses,
	/// User-supplied prefix/suffix/separator
	Custom,
}

/// Whether the tag block sits before or after the basename stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagPosition {
	Prefix,
	Suffix,
}

/// One block per tag, or one block holding the joined list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagGrouping {
	Combined,
	Individual,
}

/// Prefix/suffix/separator triple for [`TagFormat::Custom`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
	pub prefix: String,
	pub suffix: String,
	pub separator: String,
}

/// The configured filename tag grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRule {
	pub format: TagFormat,
	#[serde(default)]
	pub custom_format: Option<CustomFormat>,
	pub position: TagPosition,
	pub add_spaces: bool,
	pub grouping: TagGrouping,
}

impl Default for TagRule {
	fn default() -> Self {
		Self {
			format: TagFormat::SquareBrackets,
			custom_format: None,
			position: TagPosition::Suffix,
			add_spaces: true,
			grouping: TagGrouping::Combined,
		}
	}
}

/// Top-level settings document stored under the `app_settings` key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
	pub tag_rule: TagRule,
}

impl AppSettings {
	/// Validate an incoming settings document.
	///
	/// Unknown enum values are already rejected by deserialization; this
	/// checks the constraints serde cannot express.
	pub fn validate(&self) -> Result<()> {
		if self.tag_rule.format == TagFormat::Custom && self.tag_rule.custom_format.is_none() {
			return Err(CoreError::InvalidRequest(
				"custom tag format requires a customFormat object".into(),
			));
		}
		Ok(())
	}

	/// True when the two documents produce different filenames for the
	/// same tag list, i.e. a re-rename pass is warranted.
	pub fn rule_changed(&self, other: &AppSettings) -> bool {
		self.tag_rule != other.tag_rule
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_rule_is_square_suffix_combined() {
		let rule = TagRule::default();
		assert_eq!(rule.format, TagFormat::SquareBrackets);
		assert_eq!(rule.position, TagPosition::Suffix);
		assert!(rule.add_spaces);
		assert_eq!(rule.grouping, TagGrouping::Combined);
	}

	#[test]
	fn custom_format_is_required_when_selected() {
		let settings = AppSettings {
			tag_rule: TagRule {
				format: TagFormat::Custom,
				..TagRule::default()
			},
		};
		assert!(settings.validate().is_err());
	}

	#[test]
	fn settings_round_trip_through_json() {
		let settings = AppSettings {
			tag_rule: TagRule {
				format: TagFormat::Parentheses,
				custom_format: None,
				position: TagPosition::Prefix,
				add_spaces: false,
				grouping: TagGrouping::Individual,
			},
		};
		let json = serde_json::to_string(&settings).unwrap();
		assert!(json.contains("\"parentheses\""));
		assert!(json.contains("\"prefix\""));
		let back: AppSettings = serde_json::from_str(&json).unwrap();
		assert_eq!(back, settings);
	}

	#[test]
	fn unknown_enum_values_are_rejected() {
		let json = r#"{"tagRule":{"format":"curly","position":"suffix","addSpaces":true,"grouping":"combined"}}"#;
		assert!(serde_json::from_str::<AppSettings>(json).is_err());
	}
}
