//! SQLite-backed implementation of [`VectorStore`]

use crate::{
    cosine_similarity, now_millis, IndexParams, StoreError, TableInfo, VectorIndex, VectorStore,
};
use pageqa_domain::{Chunk, EmbeddedChunk, RetrievedChunk};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// How long a statement waits on a locked database file before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based implementation of VectorStore
///
/// Rows are persisted on disk; HNSW indexes live in memory and are rebuilt
/// with [`VectorStore::build_index`] after the store is reopened.
///
/// # Thread Safety
///
/// The connection is guarded by a mutex, so one store can be shared across
/// worker threads behind an `Arc`. Locks are always taken connection first,
/// index map second.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    indexes: Mutex<HashMap<String, VectorIndex>>,
}

/// One persisted row: position, chunk, embedding
type StoredRow = (usize, Chunk, Vec<f32>);

impl SqliteVectorStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pageqa_store::SqliteVectorStore;
    ///
    /// let store = SqliteVectorStore::connect("vectors.db").unwrap();
    /// ```
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        Ok(Self {
            conn: Mutex::new(conn),
            indexes: Mutex::new(HashMap::new()),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(format!("connection: {}", e)))
    }

    fn indexes(&self) -> Result<MutexGuard<'_, HashMap<String, VectorIndex>>, StoreError> {
        self.indexes
            .lock()
            .map_err(|e| StoreError::Lock(format!("index map: {}", e)))
    }

    fn forget_index(&self, name: &str) -> Result<(), StoreError> {
        self.indexes()?.remove(name);
        Ok(())
    }

    fn dimension_of(conn: &Connection, name: &str) -> Result<Option<usize>, StoreError> {
        let dimension = conn
            .query_row(
                "SELECT dimension FROM vector_tables WHERE name = ?1",
                params![name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(dimension.map(|d| d as usize))
    }

    fn require_dimension(conn: &Connection, name: &str) -> Result<usize, StoreError> {
        Self::dimension_of(conn, name)?.ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Convert an embedding to little-endian bytes for storage
    fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|x| x.to_le_bytes()).collect()
    }

    /// Convert stored bytes back to an embedding
    fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>, StoreError> {
        if bytes.len() % 4 != 0 {
            return Err(StoreError::InvalidData(format!(
                "Embedding blob of {} bytes is not a multiple of 4",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    fn load_rows(conn: &Connection, name: &str) -> Result<Vec<StoredRow>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT position, source, page, text, embedding
             FROM vector_rows WHERE table_name = ?1 ORDER BY position",
        )?;

        let raw = stmt
            .query_map(params![name], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Vec<u8>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(position, source, page, text, blob)| {
                let vector = Self::decode_embedding(&blob)?;
                Ok((position as usize, Chunk::new(text, source, page), vector))
            })
            .collect()
    }

    fn load_chunk(conn: &Connection, name: &str, position: usize) -> Result<Option<Chunk>, StoreError> {
        let chunk = conn
            .query_row(
                "SELECT source, page, text FROM vector_rows
                 WHERE table_name = ?1 AND position = ?2",
                params![name, position as i64],
                |row| {
                    Ok(Chunk::new(
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                    ))
                },
            )
            .optional()?;
        Ok(chunk)
    }

    fn linear_scan(
        conn: &Connection,
        name: &str,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, StoreError> {
        let mut scored: Vec<RetrievedChunk> = Self::load_rows(conn, name)?
            .into_iter()
            .map(|(_, chunk, vector)| RetrievedChunk {
                score: cosine_similarity(query, &vector),
                chunk,
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }
}

impl VectorStore for SqliteVectorStore {
    fn create_table(&self, name: &str, dimension: usize, rows: &[EmbeddedChunk]) -> Result<(), StoreError> {
        if dimension == 0 {
            return Err(StoreError::InvalidData("dimension must be greater than 0".to_string()));
        }
        if let Some(bad) = rows.iter().find(|row| row.vector.len() != dimension) {
            return Err(StoreError::DimensionMismatch {
                expected: dimension,
                actual: bad.vector.len(),
            });
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if Self::dimension_of(&tx, name)?.is_some() {
            return Err(StoreError::TableExists(name.to_string()));
        }

        tx.execute(
            "INSERT INTO vector_tables (name, dimension, created_at_ms) VALUES (?1, ?2, ?3)",
            params![name, dimension as i64, now_millis() as i64],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO vector_rows (table_name, position, source, page, text, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, row) in rows.iter().enumerate() {
                stmt.execute(params![
                    name,
                    position as i64,
                    &row.chunk.source,
                    row.chunk.page,
                    &row.chunk.text,
                    Self::encode_embedding(&row.vector),
                ])?;
            }
        }

        tx.commit()?;
        debug!(table = name, rows = rows.len(), dimension, "Created vector table");
        Ok(())
    }

    fn drop_table(&self, name: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM vector_rows WHERE table_name = ?1", params![name])?;
        let removed = tx.execute("DELETE FROM vector_tables WHERE name = ?1", params![name])?;
        if removed == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }

        tx.commit()?;
        self.forget_index(name)?;
        debug!(table = name, "Dropped vector table");
        Ok(())
    }

    fn rename_table(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        Self::require_dimension(&tx, from)?;
        if Self::dimension_of(&tx, to)?.is_some() {
            return Err(StoreError::TableExists(to.to_string()));
        }

        tx.execute(
            "UPDATE vector_tables SET name = ?2 WHERE name = ?1",
            params![from, to],
        )?;
        tx.execute(
            "UPDATE vector_rows SET table_name = ?2 WHERE table_name = ?1",
            params![from, to],
        )?;

        tx.commit()?;
        self.forget_index(from)?;
        debug!(from, to, "Renamed vector table");
        Ok(())
    }

    fn table_exists(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        Ok(Self::dimension_of(&conn, name)?.is_some())
    }

    fn list_tables(&self) -> Result<Vec<TableInfo>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.name, t.dimension, t.created_at_ms,
                    (SELECT COUNT(*) FROM vector_rows r WHERE r.table_name = t.name)
             FROM vector_tables t ORDER BY t.name",
        )?;

        let tables = stmt
            .query_map([], |row| {
                Ok(TableInfo {
                    name: row.get(0)?,
                    dimension: row.get::<_, i64>(1)? as usize,
                    created_at_ms: row.get::<_, i64>(2)? as u64,
                    rows: row.get::<_, i64>(3)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tables)
    }

    fn row_count(&self, name: &str) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        Self::require_dimension(&conn, name)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM vector_rows WHERE table_name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn build_index(&self, name: &str, params: &IndexParams) -> Result<(), StoreError> {
        let (dimension, rows) = {
            let conn = self.conn()?;
            let dimension = Self::require_dimension(&conn, name)?;
            (dimension, Self::load_rows(&conn, name)?)
        };

        if rows.is_empty() {
            return Err(StoreError::EmptyTable(name.to_string()));
        }

        let mut index = VectorIndex::new(dimension, rows.len(), params)?;
        for (position, _, vector) in &rows {
            index.add(*position, vector)?;
        }

        self.indexes()?.insert(name.to_string(), index);
        debug!(table = name, vectors = rows.len(), "Built HNSW index");
        Ok(())
    }

    fn has_index(&self, name: &str) -> bool {
        self.indexes
            .lock()
            .map(|indexes| indexes.contains_key(name))
            .unwrap_or(false)
    }

    fn search(&self, name: &str, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, StoreError> {
        let conn = self.conn()?;
        let dimension = Self::require_dimension(&conn, name)?;
        if query.len() != dimension {
            return Err(StoreError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let ranked = {
            let indexes = self.indexes()?;
            match indexes.get(name) {
                Some(index) => Some(index.search(query, k)?),
                None => None,
            }
        };

        let Some(ranked) = ranked else {
            return Self::linear_scan(&conn, name, query, k);
        };

        let mut results = Vec::with_capacity(ranked.len());
        for (position, score) in ranked {
            if let Some(chunk) = Self::load_chunk(&conn, name, position)? {
                results.push(RetrievedChunk { chunk, score });
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str, page: u32, vector: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk::new(Chunk::new(text, "doc.pdf", page), vector)
    }

    #[test]
    fn test_embedding_blob_round_trip() {
        let embedding = vec![0.25f32, -1.5, 3.125, f32::MIN_POSITIVE];
        let bytes = SqliteVectorStore::encode_embedding(&embedding);
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteVectorStore::decode_embedding(&bytes).unwrap(), embedding);
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        assert!(SqliteVectorStore::decode_embedding(&[0, 1, 2]).is_err());
    }

    #[test]
    fn test_create_rejects_dimension_mismatch() {
        let store = SqliteVectorStore::connect(":memory:").unwrap();
        let result = store.create_table("t", 3, &[row("a", 1, vec![1.0, 0.0])]);
        assert!(matches!(result, Err(StoreError::DimensionMismatch { expected: 3, actual: 2 })));
        assert!(!store.table_exists("t").unwrap());
    }

    #[test]
    fn test_create_twice_fails() {
        let store = SqliteVectorStore::connect(":memory:").unwrap();
        store.create_table("t", 2, &[]).unwrap();
        assert!(matches!(store.create_table("t", 2, &[]), Err(StoreError::TableExists(_))));
    }

    #[test]
    fn test_linear_scan_without_index() {
        let store = SqliteVectorStore::connect(":memory:").unwrap();
        store
            .create_table(
                "t",
                2,
                &[row("x", 1, vec![1.0, 0.0]), row("y", 2, vec![0.0, 1.0])],
            )
            .unwrap();

        assert!(!store.has_index("t"));
        let results = store.search("t", &[0.0, 1.0], 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, "y");
        assert_eq!(results[0].chunk.page, 2);
    }

    #[test]
    fn test_build_index_on_empty_table() {
        let store = SqliteVectorStore::connect(":memory:").unwrap();
        store.create_table("t", 2, &[]).unwrap();
        assert!(matches!(
            store.build_index("t", &IndexParams::default()),
            Err(StoreError::EmptyTable(_))
        ));
        assert!(store.search("t", &[1.0, 0.0], 3).unwrap().is_empty());
    }
}
