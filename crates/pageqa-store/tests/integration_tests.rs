//! Integration tests for pageqa-store
//!
//! These tests verify the table lifecycle: create, list, rename, drop, and
//! persistence across reopening the database file.

use pageqa_domain::{Chunk, EmbeddedChunk};
use pageqa_store::{
    parse_stale_table_name, stale_table_name, IndexParams, SqliteVectorStore, StoreError,
    VectorStore,
};
use tempfile::TempDir;

fn rows(source: &str, count: u32) -> Vec<EmbeddedChunk> {
    (1..=count)
        .map(|page| {
            let mut vector = vec![0.0; 4];
            vector[(page as usize) % 4] = 1.0;
            EmbeddedChunk::new(Chunk::new(format!("text of page {}", page), source, page), vector)
        })
        .collect()
}

#[test]
fn test_store_initialization() {
    let store = SqliteVectorStore::connect(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert!(store.unwrap().list_tables().unwrap().is_empty());
}

#[test]
fn test_create_and_count() {
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("pdf_pages", 4, &rows("a.pdf", 3)).unwrap();

    assert!(store.table_exists("pdf_pages").unwrap());
    assert_eq!(store.row_count("pdf_pages").unwrap(), 3);

    let tables = store.list_tables().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "pdf_pages");
    assert_eq!(tables[0].dimension, 4);
    assert_eq!(tables[0].rows, 3);
    assert!(tables[0].created_at_ms > 0);
}

#[test]
fn test_missing_table_errors() {
    let store = SqliteVectorStore::connect(":memory:").unwrap();

    assert!(!store.table_exists("nope").unwrap());
    assert!(matches!(store.row_count("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.drop_table("nope"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.rename_table("nope", "other"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.search("nope", &[1.0], 3), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.build_index("nope", &IndexParams::default()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_drop_removes_rows_and_index() {
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("t", 4, &rows("a.pdf", 2)).unwrap();
    store.build_index("t", &IndexParams::default()).unwrap();
    assert!(store.has_index("t"));

    store.drop_table("t").unwrap();
    assert!(!store.table_exists("t").unwrap());
    assert!(!store.has_index("t"));

    // Name is free again and starts from zero rows
    store.create_table("t", 4, &[]).unwrap();
    assert_eq!(store.row_count("t").unwrap(), 0);
}

#[test]
fn test_rename_aside_frees_name() {
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("pdf_pages", 4, &rows("a.pdf", 2)).unwrap();
    store.build_index("pdf_pages", &IndexParams::default()).unwrap();

    let stale = stale_table_name("pdf_pages", 42);
    store.rename_table("pdf_pages", &stale).unwrap();

    assert!(!store.table_exists("pdf_pages").unwrap());
    assert!(!store.has_index("pdf_pages"));
    assert_eq!(store.row_count(&stale).unwrap(), 2);
    assert_eq!(parse_stale_table_name(&stale), Some(("pdf_pages", 42)));

    store.create_table("pdf_pages", 4, &rows("b.pdf", 1)).unwrap();
    assert_eq!(store.list_tables().unwrap().len(), 2);
}

#[test]
fn test_rename_onto_existing_fails() {
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("a", 4, &[]).unwrap();
    store.create_table("b", 4, &[]).unwrap();

    assert!(matches!(store.rename_table("a", "b"), Err(StoreError::TableExists(_))));
    assert!(store.table_exists("a").unwrap());
}

#[test]
fn test_tables_are_isolated() {
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("a", 4, &rows("a.pdf", 3)).unwrap();
    store.create_table("b", 4, &rows("b.pdf", 1)).unwrap();

    let hits = store.search("b", &[0.0, 1.0, 0.0, 0.0], 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits.iter().all(|hit| hit.chunk.source == "b.pdf"));
}

#[test]
fn test_rows_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.db");

    {
        let store = SqliteVectorStore::connect(&path).unwrap();
        store.create_table("pdf_pages", 4, &rows("a.pdf", 3)).unwrap();
        store.build_index("pdf_pages", &IndexParams::default()).unwrap();
    }

    let store = SqliteVectorStore::connect(&path).unwrap();
    assert_eq!(store.row_count("pdf_pages").unwrap(), 3);
    // Index is in-memory only
    assert!(!store.has_index("pdf_pages"));

    let hits = store.search("pdf_pages", &[0.0, 1.0, 0.0, 0.0], 1).unwrap();
    assert_eq!(hits[0].chunk.page, 1);
    assert_eq!(hits[0].chunk.text, "text of page 1");
}
