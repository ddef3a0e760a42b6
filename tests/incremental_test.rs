mod helpers;

use cortex::index::updater::UpdateOptions;
use cortex::memory::repository::{MemoryRepository, MemoryUpdate, NewMemory};
use cortex::path::MemoryPath;
use helpers::{
    cat, index_snapshot, mem, memory_paths, record, subcategory_counts, test_store,
};
use tempfile::TempDir;

fn add(repo: &MemoryRepository, path: &str, content: &str) {
    repo.add(&mem(path), content, NewMemory::default()).unwrap();
}

#[test]
fn incremental_updates_match_full_reindex() {
    let (tmp, repo) = test_store();
    add(&repo, "project/cortex/arch", "Layered design with an index per category.");
    add(&repo, "project/cortex/paths", "Slash separated slugs.");
    add(&repo, "project/notes", "Loose notes.");
    add(&repo, "people/alice", "Reviews storage changes.");
    add(&repo, "scratch/tmp/one", "temporary");
    add(&repo, "top-level", "A memory in the root category.");
    add(&repo, "kebab-case/a--b", "Interior hyphen runs are kept by normalization.");

    // Names that a reindex would rewrite are refused up front.
    for raw in ["snake_case/note", "-lead/x_y", "trail-/note", "notes/x_y"] {
        let err = MemoryPath::parse(raw).unwrap_err();
        assert_eq!(err.code(), "INVALID_PATH", "{raw:?}");
    }

    repo.update(
        &mem("project/notes"),
        MemoryUpdate {
            content: Some("Much longer notes than before, which changes the estimate.".into()),
            ..MemoryUpdate::default()
        },
    )
    .unwrap();
    repo.remove(&mem("scratch/tmp/one")).unwrap();
    repo.move_memory(&mem("people/alice"), &mem("project/people/alice"))
        .unwrap();

    let incremental = index_snapshot(tmp.path());
    repo.reindex().unwrap();
    let full = index_snapshot(tmp.path());

    assert_eq!(incremental, full);
}

#[test]
fn move_between_unrelated_chains() {
    let (_tmp, repo) = test_store();
    add(&repo, "a/b/note", "moving soon");

    repo.move_memory(&mem("a/b/note"), &mem("x/y/note")).unwrap();

    assert!(repo.index().read(&cat("a/b")).unwrap().is_none());
    assert!(repo.index().read(&cat("a")).unwrap().is_none());

    let root = record(&repo, "");
    assert_eq!(subcategory_counts(&root), vec![("x".to_string(), 0)]);
    assert_eq!(
        subcategory_counts(&record(&repo, "x")),
        vec![("x/y".to_string(), 1)]
    );
    assert_eq!(memory_paths(&record(&repo, "x/y")), vec!["x/y/note"]);
    assert!(repo.get(&mem("x/y/note"), false).is_ok());
}

#[test]
fn move_within_shared_ancestor_updates_both_counts() {
    let (_tmp, repo) = test_store();
    add(&repo, "p/a/one", "1");
    add(&repo, "p/a/two", "2");
    add(&repo, "p/b/three", "3");

    repo.move_memory(&mem("p/a/two"), &mem("p/b/two")).unwrap();

    assert_eq!(
        subcategory_counts(&record(&repo, "p")),
        vec![("p/a".to_string(), 1), ("p/b".to_string(), 2)]
    );
}

#[test]
fn counts_track_direct_memories_through_every_change() {
    let (_tmp, repo) = test_store();
    add(&repo, "a/one", "1");
    add(&repo, "a/b/two", "2");
    add(&repo, "a/b/three", "3");
    assert_eq!(subcategory_counts(&record(&repo, "")), vec![("a".to_string(), 1)]);
    assert_eq!(subcategory_counts(&record(&repo, "a")), vec![("a/b".to_string(), 2)]);

    repo.remove(&mem("a/one")).unwrap();
    assert_eq!(subcategory_counts(&record(&repo, "")), vec![("a".to_string(), 0)]);
    assert!(record(&repo, "a").memories.is_empty());

    repo.remove(&mem("a/b/two")).unwrap();
    repo.remove(&mem("a/b/three")).unwrap();
    assert!(repo.index().read(&cat("a")).unwrap().is_none());
    assert!(record(&repo, "").is_empty());
}

#[test]
fn updating_content_refreshes_token_estimate() {
    let (_tmp, repo) = test_store();
    add(&repo, "notes/n", "1234");
    assert_eq!(record(&repo, "notes").memories[0].token_estimate, 1);

    repo.update(
        &mem("notes/n"),
        MemoryUpdate {
            content: Some("x".repeat(41)),
            ..MemoryUpdate::default()
        },
    )
    .unwrap();

    let rec = record(&repo, "notes");
    assert_eq!(rec.memories.len(), 1);
    assert_eq!(rec.memories[0].token_estimate, 11);
}

#[test]
fn missing_record_reads_as_none() {
    let (_tmp, repo) = test_store();
    assert!(repo.index().read(&cat("never/written")).unwrap().is_none());
    assert!(repo.index().read(&cat("")).unwrap().is_none());
}

#[test]
fn disabled_creation_reports_index_error_but_keeps_file() {
    let tmp = TempDir::new().unwrap();
    let repo = MemoryRepository::open(
        tmp.path(),
        UpdateOptions {
            create_when_missing: false,
        },
    );

    let err = repo
        .add(&mem("fresh/note"), "content", NewMemory::default())
        .unwrap_err();

    assert_eq!(err.code(), "INDEX_ERROR");
    assert!(tmp.path().join("fresh/note.md").exists());
    assert!(repo.index().read(&cat("fresh")).unwrap().is_none());

    // A full reindex brings the index back in line with the files.
    repo.reindex().unwrap();
    assert_eq!(memory_paths(&record(&repo, "fresh")), vec!["fresh/note"]);
}

#[test]
fn hand_written_names_index_beside_api_paths() {
    let (tmp, repo) = test_store();
    add(&repo, "kept/note", "written through the repository");
    helpers::write_raw_memory(tmp.path(), "snake_case/x_y.md", "written by hand");

    repo.reindex().unwrap();

    let listed = memory_paths(&record(&repo, "snake-case"));
    assert_eq!(listed, vec!["snake-case/x-y"]);
    assert_eq!(memory_paths(&record(&repo, "kept")), vec!["kept/note"]);
    assert!(repo.get(&mem("kept/note"), false).is_ok());
}
