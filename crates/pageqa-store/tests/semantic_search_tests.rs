//! Semantic search tests over indexed and unindexed tables

use pageqa_domain::traits::EmbeddingModel;
use pageqa_domain::{Chunk, EmbeddedChunk};
use pageqa_store::{IndexParams, MockEmbeddingModel, SqliteVectorStore, VectorStore};

const DIM: usize = 256;

fn embedded(model: &MockEmbeddingModel, texts: &[(&str, u32)]) -> Vec<EmbeddedChunk> {
    texts
        .iter()
        .map(|(text, page)| {
            EmbeddedChunk::new(Chunk::new(*text, "guide.pdf", *page), model.embed(text).unwrap())
        })
        .collect()
}

fn corpus(model: &MockEmbeddingModel) -> Vec<EmbeddedChunk> {
    embedded(
        model,
        &[
            ("Photosynthesis converts sunlight into chemical energy in plants", 1),
            ("The French revolution began in 1789 with the storming of the Bastille", 2),
            ("Rust ownership rules prevent data races at compile time", 3),
            ("Chlorophyll absorbs sunlight for photosynthesis in leaves", 4),
        ],
    )
}

#[test]
fn test_indexed_search_finds_related_text() {
    let model = MockEmbeddingModel::new(DIM);
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("pages", DIM, &corpus(&model)).unwrap();
    store.build_index("pages", &IndexParams::default()).unwrap();

    let query = model.embed("how do plants use sunlight photosynthesis").unwrap();
    let hits = store.search("pages", &query, 2).unwrap();

    assert_eq!(hits.len(), 2);
    let pages: Vec<u32> = hits.iter().map(|hit| hit.chunk.page).collect();
    assert!(pages.contains(&1));
    assert!(pages.contains(&4));
    assert!(hits[0].score >= hits[1].score);
}

#[test]
fn test_indexed_and_linear_search_agree_on_best_match() {
    let model = MockEmbeddingModel::new(DIM);
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("linear", DIM, &corpus(&model)).unwrap();
    store.create_table("indexed", DIM, &corpus(&model)).unwrap();
    store.build_index("indexed", &IndexParams::default()).unwrap();

    let query = model.embed("ownership rules in Rust").unwrap();
    let linear = store.search("linear", &query, 1).unwrap();
    let indexed = store.search("indexed", &query, 1).unwrap();

    assert_eq!(linear[0].chunk.page, 3);
    assert_eq!(indexed[0].chunk.page, 3);
    assert!((linear[0].score - indexed[0].score).abs() < 1e-4);
}

#[test]
fn test_k_larger_than_table() {
    let model = MockEmbeddingModel::new(DIM);
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("pages", DIM, &corpus(&model)).unwrap();

    let query = model.embed("anything at all").unwrap();
    assert_eq!(store.search("pages", &query, 10).unwrap().len(), 4);
    assert!(store.search("pages", &query, 0).unwrap().is_empty());
}

#[test]
fn test_query_dimension_is_checked() {
    let model = MockEmbeddingModel::new(DIM);
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("pages", DIM, &corpus(&model)).unwrap();

    let result = store.search("pages", &[1.0, 0.0], 1);
    assert!(result.is_err());
}

#[test]
fn test_provenance_survives_search() {
    let model = MockEmbeddingModel::new(DIM);
    let store = SqliteVectorStore::connect(":memory:").unwrap();
    store.create_table("pages", DIM, &corpus(&model)).unwrap();
    store.build_index("pages", &IndexParams::default()).unwrap();

    let query = model.embed("Bastille 1789").unwrap();
    let hits = store.search("pages", &query, 1).unwrap();
    assert_eq!(hits[0].chunk.source, "guide.pdf");
    assert_eq!(hits[0].chunk.page, 2);
}
