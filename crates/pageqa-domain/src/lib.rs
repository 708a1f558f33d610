//! PageQA Domain Layer
//!
//! This crate contains the record types and capability traits shared by every
//! stage of the PDF-to-QA pipeline. It depends only on `serde`, because the
//! record types double as the JSON contract of the pipeline outputs.
//!
//! ## Key Concepts
//!
//! - **PageRecord**: Text of one page that passed the minimum-length filter
//! - **GeneratedQuestion**: A question produced by the LLM for one page
//! - **Chunk**: An overlapping slice of page text sized for embedding
//! - **QAPair**: The terminal record, an answer plus the chunks that grounded it
//! - **Provenance**: The `(source, page)` pair carried by every derived record
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure implementations (LLM clients, vector store) live in other crates
//! - Both LLM generation profiles are plain values passed at call time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod failure;
pub mod page;
pub mod profile;
pub mod qa;
pub mod question;
pub mod traits;

// Re-exports for convenience
pub use chunk::{Chunk, ChunkMetadata, EmbeddedChunk, RetrievedChunk};
pub use failure::UnitFailure;
pub use page::{PageRecord, Provenance};
pub use profile::{GenerationProfile, LlmResponse, ProfileKind};
pub use qa::{QAPair, SourceDocument};
pub use question::GeneratedQuestion;
