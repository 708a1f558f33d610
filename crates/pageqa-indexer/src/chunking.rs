//! Recursive text chunking for embedding
//!
//! Text is split on the coarsest separator that occurs in it. Pieces that are
//! still over `chunk_size` are split again with the next finer separator, down
//! to single characters. Adjacent pieces are then merged greedily up to
//! `chunk_size`, carrying up to `chunk_overlap` trailing characters into the
//! next chunk. All lengths are counted in characters.

use crate::config::ChunkerConfig;
use crate::error::IndexerError;
use pageqa_domain::{Chunk, PageRecord};
use std::collections::VecDeque;

/// Separators in priority order; the empty separator splits into characters
const SEPARATORS: [&str; 7] = ["\n\n", "\n", ". ", "! ", "? ", " ", ""];

/// Splits page text into overlapping chunks that keep page provenance
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker; fails when `chunk_size == 0` or `chunk_overlap >= chunk_size`
    pub fn new(config: ChunkerConfig) -> Result<Self, IndexerError> {
        config.validate().map_err(IndexerError::Config)?;
        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    /// Chunk the given text into trimmed, non-empty pieces
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.split(text, &SEPARATORS)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    /// Chunk one page; every chunk inherits the page's `(source, page)`
    pub fn chunk_page(&self, page: &PageRecord) -> Vec<Chunk> {
        self.chunk(&page.text)
            .into_iter()
            .map(|text| Chunk::new(text, page.source.clone(), page.page))
            .collect()
    }

    /// Chunk every page, in page order
    pub fn chunk_pages(&self, pages: &[PageRecord]) -> Vec<Chunk> {
        pages.iter().flat_map(|page| self.chunk_page(page)).collect()
    }

    fn split(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(position).copied().unwrap_or("");
        let finer = separators.get(position + 1..).unwrap_or(&[]);

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split_inclusive(separator).collect()
        };

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) <= self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            if finer.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split(piece, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }
        chunks
    }

    /// Greedily merge pieces that each fit into chunks of at most `chunk_size`
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if window_len + len > self.chunk_size && !window.is_empty() {
                chunks.push(window.iter().copied().collect::<String>());

                // Keep at most `chunk_overlap` trailing characters, and leave room for `piece`
                while window_len > self.chunk_overlap
                    || (window_len + len > self.chunk_size && window_len > 0)
                {
                    match window.pop_front() {
                        Some(front) => window_len -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            window_len += len;
        }

        if !window.is_empty() {
            chunks.push(window.iter().copied().collect::<String>());
        }
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
