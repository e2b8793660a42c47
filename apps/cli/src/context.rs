//! Shared CLI state

use anyhow::Result;
use serde::Serialize;
use te_core::Engine;

pub struct Context {
	pub engine: Engine,
	pub json: bool,
}

impl Context {
	/// Print a value either as pretty JSON (`--json`) or through the
	/// supplied human formatter.
	pub fn print<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
		if self.json {
			println!("{}", serde_json::to_string_pretty(value)?);
		} else {
			human(value);
		}
		Ok(())
	}
}
