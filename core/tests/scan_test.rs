//! Scanner behavior: snapshot reconciliation, exclusions, filename tag
//! induction and cancellation

mod common;

use common::harness;
use te_core::domain::FileKind;
use te_core::{CancellationToken, CoreError};

#[tokio::test]
async fn scan_indexes_plain_files_without_tags() {
	let h = harness().await;
	h.write_file("a.txt", "alpha");
	h.write_file("b.jpg", "beta");

	let result = h.scan().await;
	assert_eq!(result.file_count, 2);
	assert_eq!(result.directory_count, 0);

	let page = h.engine.list_files(200, 0).await.unwrap();
	assert_eq!(page.total, 2);
	let paths: Vec<&str> = page.records.iter().map(|r| r.path.as_str()).collect();
	assert_eq!(paths, vec!["a.txt", "b.jpg"]);
	assert!(page.records.iter().all(|r| r.tags.is_empty()));
}

#[tokio::test]
async fn scan_induces_tags_from_filenames() {
	let h = harness().await;
	h.write_file("report [draft, 2025].pdf", "pdf");

	h.scan().await;

	let tags = h.engine.list_tags().await.unwrap();
	let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
	assert_eq!(names, vec!["2025", "draft"]);

	let page = h.engine.list_files(200, 0).await.unwrap();
	let file = &page.records[0];
	assert_eq!(file.path, "report [draft, 2025].pdf");
	let carried: Vec<&str> = file.tags.iter().map(|t| t.name.as_str()).collect();
	assert_eq!(carried, vec!["2025", "draft"]);
}

#[tokio::test]
async fn scan_skips_noise_directories_and_dollar_prefixes() {
	let h = harness().await;
	h.write_file("keep/inner.txt", "x");
	h.write_file("node_modules/lib/index.js", "x");
	h.write_file(".git/config", "x");
	h.write_file("$RECYCLE.BIN/ghost", "x");

	let result = h.scan().await;
	assert_eq!(result.file_count, 1);
	assert_eq!(result.directory_count, 1);

	let page = h.engine.list_files(200, 0).await.unwrap();
	let paths: Vec<&str> = page.records.iter().map(|r| r.path.as_str()).collect();
	assert_eq!(paths, vec!["keep", "keep/inner.txt"]);
}

#[tokio::test]
async fn scan_records_directory_rows_with_zero_size() {
	let h = harness().await;
	h.write_file("photos/one.jpg", "data");

	h.scan().await;

	let page = h.engine.list_files(200, 0).await.unwrap();
	let dir = page.records.iter().find(|r| r.path == "photos").unwrap();
	assert_eq!(dir.kind, FileKind::Dir);
	assert_eq!(dir.size, 0);
	assert!(dir.hash.is_empty());

	let file = page
		.records
		.iter()
		.find(|r| r.path == "photos/one.jpg")
		.unwrap();
	assert_eq!(file.kind, FileKind::File);
	assert_eq!(file.size, 4);
	assert!(file.hash.starts_with("photos/one.jpg_4_"));
}

#[tokio::test]
async fn rescan_is_idempotent_on_quiescent_tree() {
	let h = harness().await;
	h.write_file("a.txt", "one");
	h.write_file("sub/b.txt", "two");

	h.scan().await;
	let first = h.engine.list_files(2000, 0).await.unwrap();

	h.scan().await;
	let second = h.engine.list_files(2000, 0).await.unwrap();

	assert_eq!(first.total, second.total);
	for (a, b) in first.records.iter().zip(second.records.iter()) {
		assert_eq!(a.id, b.id);
		assert_eq!(a.path, b.path);
		assert_eq!(a.name, b.name);
		assert_eq!(a.size, b.size);
		assert_eq!(a.kind, b.kind);
		assert_eq!(a.hash, b.hash);
		assert_eq!(a.mod_time, b.mod_time);
		assert_eq!(a.created_at, b.created_at);
	}
}

#[tokio::test]
async fn rescan_row_identity_survives_other_workspaces() {
	let h = harness().await;
	h.write_file("a.txt", "1");
	h.write_file("b.txt", "2");
	h.scan().await;
	let first = h.engine.list_files(2000, 0).await.unwrap();

	// Another workspace claims ids in the shared table
	let other = tempfile::TempDir::new().unwrap();
	std::fs::write(other.path().join("c.txt"), "3").unwrap();
	h.engine
		.scan(other.path(), &CancellationToken::new())
		.await
		.unwrap();

	// Back to the first workspace, unchanged on disk
	h.scan().await;
	let second = h.engine.list_files(2000, 0).await.unwrap();

	assert_eq!(first.total, second.total);
	for (a, b) in first.records.iter().zip(second.records.iter()) {
		assert_eq!(a.id, b.id);
		assert_eq!(a.path, b.path);
		assert_eq!(a.created_at, b.created_at);
	}
}

#[tokio::test]
async fn rescan_assigns_fresh_ids_only_to_new_paths() {
	let h = harness().await;
	h.write_file("kept.txt", "k");
	h.scan().await;
	let kept_id = h.file_id("kept.txt").await;

	h.write_file("added.txt", "a");
	h.scan().await;

	assert_eq!(h.file_id("kept.txt").await, kept_id);
	assert!(h.file_id("added.txt").await > kept_id);
}

#[tokio::test]
async fn rescan_drops_vanished_entries() {
	let h = harness().await;
	let victim = h.write_file("gone.txt", "x");
	h.write_file("stays.txt", "x");

	h.scan().await;
	assert_eq!(h.engine.list_files(200, 0).await.unwrap().total, 2);

	std::fs::remove_file(victim).unwrap();
	h.scan().await;

	let page = h.engine.list_files(200, 0).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.records[0].path, "stays.txt");
}

#[tokio::test]
async fn cancelled_scan_preserves_previous_snapshot() {
	let h = harness().await;
	h.write_file("a.txt", "x");
	h.scan().await;

	h.write_file("b.txt", "x");
	let cancel = CancellationToken::new();
	cancel.cancel();
	let err = h.engine.scan(h.root(), &cancel).await.unwrap_err();
	assert!(matches!(err, CoreError::Cancelled));

	// The import transaction rolled back: still only the first snapshot
	let page = h.engine.list_files(200, 0).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.records[0].path, "a.txt");
}

#[tokio::test]
async fn scan_of_missing_directory_fails() {
	let h = harness().await;
	let missing = h.root().join("does-not-exist");
	let err = h
		.engine
		.scan(&missing, &CancellationToken::new())
		.await
		.unwrap_err();
	assert!(matches!(err, CoreError::Io(_)));
}
