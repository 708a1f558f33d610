//! PageQA Indexer
//!
//! Turns accepted pages into a searchable vector table and answers top-k
//! similarity queries against it.
//!
//! # Architecture
//!
//! ```text
//! PageRecord ──> TextChunker ──> Chunk ──> IndexBuilder ──> vector table
//!                                               │
//!                          query ──> Retriever ─┘──> RetrievedChunk
//! ```
//!
//! - **TextChunker**: Recursive, overlap-carrying character chunker
//! - **IndexBuilder**: Per-document embedding workers, idempotent table rebuild
//!   with drop retry, rename-aside fallback and index retry
//! - **Retriever**: Embeds a query and searches the current table
//!
//! # Example
//!
//! ```no_run
//! use pageqa_indexer::{ChunkerConfig, IndexBuilder, IndexerConfig, Retriever, TextChunker};
//! use pageqa_domain::PageRecord;
//! use pageqa_store::{MockEmbeddingModel, SqliteVectorStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let chunker = TextChunker::new(ChunkerConfig::default())?;
//! let chunks = chunker.chunk_pages(&[PageRecord::new("doc.pdf", 1, "Some page text.")]);
//!
//! let store = Arc::new(SqliteVectorStore::connect("pageqa.db")?);
//! let embedder = Arc::new(MockEmbeddingModel::new(384));
//! let handle = IndexBuilder::new(Arc::clone(&store), IndexerConfig::default())
//!     .build(&chunks, Arc::clone(&embedder))
//!     .await?;
//!
//! let retriever = Retriever::from_handle(store, embedder, &handle);
//! let hits = retriever.retrieve("page text", 3)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
mod chunking;
mod config;
mod error;
mod retriever;

pub use builder::{EmbeddedBatch, IndexBuilder, IndexHandle};
pub use chunking::TextChunker;
pub use config::{ChunkerConfig, IndexerConfig};
pub use error::IndexerError;
pub use retriever::Retriever;
