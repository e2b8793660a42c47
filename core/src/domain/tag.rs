//! Tags - named labels with a display color forming an optional forest

use serde::{Deserialize, Serialize};

/// Default display color assigned to implicitly created tags
pub const DEFAULT_TAG_COLOR: &str = "#94a3b8";

/// A named label. Names are unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	pub id: i64,
	pub name: String,
	/// CSS-style hex string
	pub color: String,
	pub parent_id: Option<i64>,
}
