//! Page-level text extraction from documents

use crate::error::ExtractorError;
use pageqa_domain::{PageRecord, UnitFailure};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Capability that yields the raw text of every page of one document
///
/// Pages are returned as `(page_number, text)` in the document's own page
/// order, numbered from 1.
pub trait PageSource: Send + Sync {
    /// Read all pages of `document`
    fn pages(&self, document: &Path) -> Result<Vec<(u32, String)>, ExtractorError>;
}

/// PDF page source backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageSource;

impl PageSource for PdfPageSource {
    fn pages(&self, document: &Path) -> Result<Vec<(u32, String)>, ExtractorError> {
        let doc = lopdf::Document::load(document).map_err(|e| ExtractorError::Document {
            source_id: document_id(document),
            reason: e.to_string(),
        })?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys().copied() {
            match doc.extract_text(&[page_number]) {
                Ok(text) => pages.push((page_number, text)),
                Err(e) => {
                    // An unreadable page is kept as empty text so numbering stays stable
                    debug!(document = %document.display(), page = page_number, error = %e, "Page text extraction failed");
                    pages.push((page_number, String::new()));
                }
            }
        }

        Ok(pages)
    }
}

/// In-memory page source keyed by document file name
///
/// Used in tests and for feeding pre-extracted text through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageSource {
    documents: HashMap<String, Option<Vec<String>>>,
}

impl MemoryPageSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document; page numbers follow the order of `pages`
    pub fn add_document<I, T>(&mut self, name: impl Into<String>, pages: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.documents
            .insert(name.into(), Some(pages.into_iter().map(Into::into).collect()));
    }

    /// Register a document that fails to open
    pub fn add_unreadable(&mut self, name: impl Into<String>) {
        self.documents.insert(name.into(), None);
    }

    /// Paths of all registered documents in name order
    pub fn document_paths(&self) -> Vec<PathBuf> {
        let mut names: Vec<&String> = self.documents.keys().collect();
        names.sort();
        names.into_iter().map(PathBuf::from).collect()
    }
}

impl PageSource for MemoryPageSource {
    fn pages(&self, document: &Path) -> Result<Vec<(u32, String)>, ExtractorError> {
        let id = document_id(document);
        match self.documents.get(&id) {
            Some(Some(pages)) => Ok(pages
                .iter()
                .enumerate()
                .map(|(i, text)| (i as u32 + 1, text.clone()))
                .collect()),
            Some(None) => Err(ExtractorError::Document {
                source_id: id,
                reason: "document is unreadable".to_string(),
            }),
            None => Err(ExtractorError::Document {
                source_id: id,
                reason: "document not found".to_string(),
            }),
        }
    }
}

/// Document identifier: the file name of its path
pub fn document_id(document: &Path) -> String {
    document
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| document.display().to_string())
}

/// List the `*.pdf` files of a folder in name order
pub fn list_documents(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExtractorError> {
    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            documents.push(path);
        }
    }
    documents.sort_by_key(|path| document_id(path));
    Ok(documents)
}

/// Splits documents into page records, dropping pages below a minimum length
pub struct PageExtractor<S> {
    source: S,
    min_page_chars: usize,
}

impl<S: PageSource> PageExtractor<S> {
    /// Create an extractor over `source`
    pub fn new(source: S, min_page_chars: usize) -> Self {
        Self {
            source,
            min_page_chars,
        }
    }

    /// Minimum trimmed page length in characters
    pub fn min_page_chars(&self) -> usize {
        self.min_page_chars
    }

    /// Pages of `document` that meet the minimum length
    pub fn extract(&self, document: &Path) -> Result<Vec<PageRecord>, ExtractorError> {
        let source = document_id(document);
        let raw = self.source.pages(document)?;
        let total = raw.len();

        let pages: Vec<PageRecord> = raw
            .into_iter()
            .map(|(page, text)| PageRecord::new(source.clone(), page, text))
            .filter(|record| record.content_len() >= self.min_page_chars)
            .collect();

        debug!(
            document = %source,
            total,
            kept = pages.len(),
            min_chars = self.min_page_chars,
            "Extracted pages"
        );
        Ok(pages)
    }

    /// Extract every document, collecting failures instead of stopping
    pub fn extract_all(&self, documents: &[PathBuf]) -> (Vec<PageRecord>, Vec<UnitFailure>) {
        let mut pages = Vec::new();
        let mut failures = Vec::new();

        for document in documents {
            match self.extract(document) {
                Ok(records) => pages.extend(records),
                Err(e) => {
                    warn!(document = %document.display(), error = %e, "Skipping unreadable document");
                    failures.push(UnitFailure::document(document_id(document), e.to_string()));
                }
            }
        }

        (pages, failures)
    }
}
