//! Store semantics: tag identity, search, paging, recents and workspaces

mod common;

use common::harness;
use te_core::domain::{FileSearchParams, RecentKind};
use te_core::CoreError;

#[tokio::test]
async fn tag_names_are_case_insensitive_identities() {
	let h = harness().await;

	let first = h.engine.db().get_or_create_tag("Draft").await.unwrap();
	let second = h.engine.db().get_or_create_tag("draft").await.unwrap();
	assert_eq!(first.id, second.id);

	let err = h.engine.create_tag("DRAFT", "", None).await.unwrap_err();
	assert!(matches!(err, CoreError::ConstraintViolation(_)));
}

#[tokio::test]
async fn create_tag_defaults_and_validation() {
	let h = harness().await;

	let tag = h.engine.create_tag("  spaced  ", "", None).await.unwrap();
	assert_eq!(tag.name, "spaced");
	assert_eq!(tag.color, "#94a3b8");

	let err = h.engine.create_tag("   ", "", None).await.unwrap_err();
	assert!(matches!(err, CoreError::InvalidRequest(_)));
}

#[tokio::test]
async fn deleting_a_parent_tag_orphans_children_and_drops_edges() {
	let h = harness().await;
	h.write_file("f.txt", "f");
	h.scan().await;
	let file_id = h.file_id("f.txt").await;

	let parent = h.engine.create_tag("parent", "", None).await.unwrap();
	let child = h
		.engine
		.create_tag("child", "", Some(parent.id))
		.await
		.unwrap();
	h.engine.db().add_tag_to_file(file_id, parent.id).await.unwrap();

	h.engine.delete_tag(parent.id).await.unwrap();

	let tags = h.engine.list_tags().await.unwrap();
	assert_eq!(tags.len(), 1);
	assert_eq!(tags[0].id, child.id);
	assert_eq!(tags[0].parent_id, None);

	let record = h.engine.get_file(file_id).await.unwrap();
	assert!(record.tags.is_empty());
}

#[tokio::test]
async fn adding_an_edge_twice_is_idempotent() {
	let h = harness().await;
	h.write_file("f.txt", "f");
	h.scan().await;
	let file_id = h.file_id("f.txt").await;
	let tag = h.engine.create_tag("t", "", None).await.unwrap();

	h.engine.db().add_tag_to_file(file_id, tag.id).await.unwrap();
	h.engine.db().add_tag_to_file(file_id, tag.id).await.unwrap();

	let record = h.engine.get_file(file_id).await.unwrap();
	assert_eq!(record.tags.len(), 1);
}

#[tokio::test]
async fn search_requires_every_listed_tag() {
	let h = harness().await;
	h.write_file("only-a.txt", "1");
	h.write_file("both.txt", "2");
	h.write_file("only-b.txt", "3");
	h.scan().await;

	for (rel, tags) in [
		("only-a.txt", vec!["a"]),
		("both.txt", vec!["a", "b"]),
		("only-b.txt", vec!["b"]),
	] {
		let id = h.file_id(rel).await;
		let names: Vec<String> = tags.iter().map(|s| s.to_string()).collect();
		h.engine.db().batch_add_tags_to_file(id, &names).await.unwrap();
	}

	let params = FileSearchParams {
		tag_ids: vec![h.tag_id("a").await, h.tag_id("b").await],
		folder_path: String::new(),
		include_subfolders: false,
		limit: 0,
		offset: 0,
	};
	let page = h.engine.search_files_by_tags(&params).await.unwrap();

	assert_eq!(page.total, 1);
	assert_eq!(page.records[0].path, "both.txt");
}

#[tokio::test]
async fn search_folder_scoping() {
	let h = harness().await;
	h.write_file("docs/top.txt", "1");
	h.write_file("docs/sub/deep.txt", "2");
	h.write_file("root.txt", "3");
	h.scan().await;

	for rel in ["docs/top.txt", "docs/sub/deep.txt", "root.txt"] {
		let id = h.file_id(rel).await;
		h.engine
			.db()
			.batch_add_tags_to_file(id, &["x".to_string()])
			.await
			.unwrap();
	}
	let tag_ids = vec![h.tag_id("x").await];

	// Direct children only
	let page = h
		.engine
		.search_files_by_tags(&FileSearchParams {
			tag_ids: tag_ids.clone(),
			folder_path: "docs".into(),
			include_subfolders: false,
			limit: 0,
			offset: 0,
		})
		.await
		.unwrap();
	let paths: Vec<&str> = page.records.iter().map(|r| r.path.as_str()).collect();
	assert_eq!(paths, vec!["docs/top.txt"]);

	// Whole subtree
	let page = h
		.engine
		.search_files_by_tags(&FileSearchParams {
			tag_ids: tag_ids.clone(),
			folder_path: "docs".into(),
			include_subfolders: true,
			limit: 0,
			offset: 0,
		})
		.await
		.unwrap();
	assert_eq!(page.total, 2);

	// No folder restriction
	let page = h
		.engine
		.search_files_by_tags(&FileSearchParams {
			tag_ids,
			folder_path: String::new(),
			include_subfolders: false,
			limit: 0,
			offset: 0,
		})
		.await
		.unwrap();
	assert_eq!(page.total, 3);
}

#[tokio::test]
async fn list_files_pages_by_id() {
	let h = harness().await;
	for i in 0..5 {
		h.write_file(&format!("f{i}.txt"), "x");
	}
	h.scan().await;

	let first = h.engine.list_files(2, 0).await.unwrap();
	assert_eq!(first.total, 5);
	assert_eq!(first.records.len(), 2);

	let second = h.engine.list_files(2, 2).await.unwrap();
	assert_eq!(second.records.len(), 2);
	assert!(first.records[1].id < second.records[0].id);
}

#[tokio::test]
async fn workspace_removal_cascades_and_clears_active() {
	let h = harness().await;
	h.write_file("f.txt", "f");
	let result = h.scan().await;
	let workspace_id = result.workspace.id;

	h.engine.remove_workspace(workspace_id).await.unwrap();

	assert!(h.engine.active_workspace().await.is_none());
	let err = h.engine.list_files(10, 0).await.unwrap_err();
	assert!(matches!(err, CoreError::NotInitialized(_)));

	let workspaces = h.engine.list_workspaces().await.unwrap();
	assert!(workspaces.is_empty());
}

#[tokio::test]
async fn rescan_keeps_one_workspace_row_per_path() {
	let h = harness().await;
	h.write_file("f.txt", "f");
	let first = h.scan().await;
	let second = h.scan().await;

	assert_eq!(first.workspace.id, second.workspace.id);
	assert_eq!(h.engine.list_workspaces().await.unwrap().len(), 1);
}

#[tokio::test]
async fn recents_deduplicate_by_path_and_drop_dead_entries() {
	let h = harness().await;
	let alive = h.write_file("alive.txt", "x");
	let dead = h.write_file("dead.txt", "x");

	let alive_str = alive.to_string_lossy().into_owned();
	let dead_str = dead.to_string_lossy().into_owned();

	h.engine
		.add_recent_item(RecentKind::Folder, &alive_str, "alive")
		.await
		.unwrap();
	h.engine
		.add_recent_item(RecentKind::Folder, &dead_str, "dead")
		.await
		.unwrap();
	// Re-opening the same path must not create a second row
	h.engine
		.add_recent_item(RecentKind::Folder, &alive_str, "alive again")
		.await
		.unwrap();

	std::fs::remove_file(&dead).unwrap();

	let items = h.engine.get_recent_items(10).await.unwrap();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0].path, alive_str);
	assert_eq!(items[0].name, "alive again");

	// The dead row was deleted as a side effect of the read
	let raw = h.engine.db().get_recent_items(10).await.unwrap();
	assert_eq!(raw.len(), 1);
}

#[tokio::test]
async fn operations_journal_round_trip() {
	let h = harness().await;

	let id = h
		.engine
		.db()
		.insert_operation("organize", r#"{"workspace_id":1,"moves":[]}"#)
		.await
		.unwrap();

	let row = h.engine.db().get_operation(id).await.unwrap();
	assert_eq!(row.kind, "organize");

	h.engine.db().delete_operation(id).await.unwrap();
	let err = h.engine.db().get_operation(id).await.unwrap_err();
	assert!(matches!(err, CoreError::NotFound(_)));
}
