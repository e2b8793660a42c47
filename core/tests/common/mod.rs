//! Shared test harness: a throwaway engine over a throwaway workspace
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use te_core::domain::ScanResult;
use te_core::{CancellationToken, Engine};
use tempfile::TempDir;

pub struct Harness {
	pub engine: Engine,
	// Held for their Drop
	pub data_dir: TempDir,
	pub workspace_dir: TempDir,
}

pub async fn harness() -> Harness {
	let data_dir = TempDir::new().unwrap();
	let workspace_dir = TempDir::new().unwrap();
	let engine = Engine::open_at(data_dir.path()).await.unwrap();
	Harness {
		engine,
		data_dir,
		workspace_dir,
	}
}

impl Harness {
	pub fn root(&self) -> &Path {
		self.workspace_dir.path()
	}

	/// Create a file under the workspace, creating parent directories.
	pub fn write_file(&self, rel: &str, contents: &str) -> PathBuf {
		let path = self.root().join(rel);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		fs::write(&path, contents).unwrap();
		path
	}

	pub async fn scan(&self) -> ScanResult {
		self.engine
			.scan(self.root(), &CancellationToken::new())
			.await
			.unwrap()
	}

	/// Look up a file row id by relpath.
	pub async fn file_id(&self, rel: &str) -> i64 {
		let page = self.engine.list_files(2000, 0).await.unwrap();
		page.records
			.iter()
			.find(|r| r.path == rel)
			.unwrap_or_else(|| panic!("no file row for {rel:?}"))
			.id
	}

	/// Look up a tag id by name.
	pub async fn tag_id(&self, name: &str) -> i64 {
		let tags = self.engine.list_tags().await.unwrap();
		tags.iter()
			.find(|t| t.name.eq_ignore_ascii_case(name))
			.unwrap_or_else(|| panic!("no tag named {name:?}"))
			.id
	}
}
