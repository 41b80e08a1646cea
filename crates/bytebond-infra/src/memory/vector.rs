//! In-process long-term memory index.
//!
//! Records are kept per user in a DashMap and ranked with cosine
//! similarity at query time. With a journal path, every upsert is also
//! appended to a JSON-lines file and the file is replayed on open, so
//! memory survives restarts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use bytebond_core::memory::similarity::rank_records;
use bytebond_core::memory::vector::LongTermMemoryIndex;
use bytebond_types::error::RepositoryError;
use bytebond_types::memory::{MemoryRecord, RetrievalResult};

/// Cosine-ranked long-term memory, namespaced by user id.
pub struct InMemoryMemoryIndex {
    records: DashMap<String, Vec<MemoryRecord>>,
    journal: Option<PathBuf>,
    // Serializes writers so the journal and the map change together.
    write_lock: Mutex<()>,
}

impl InMemoryMemoryIndex {
    /// An index that lives only in memory.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            journal: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Open an index backed by a JSON-lines journal at `path`.
    ///
    /// A missing file starts an empty index. Unparseable lines and repeated
    /// record ids are skipped with a warning; the first occurrence wins.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let records: DashMap<String, Vec<MemoryRecord>> = DashMap::new();
        let mut seen = HashSet::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                for (line_no, line) in content.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<MemoryRecord>(line) {
                        Ok(record) if !seen.insert(record.id) => warn!(
                            path = %path.display(),
                            line = line_no + 1,
                            memory_id = %record.id,
                            "skipping duplicate memory journal entry"
                        ),
                        Ok(record) => records
                            .entry(record.user_id.clone())
                            .or_default()
                            .push(record),
                        Err(e) => warn!(
                            path = %path.display(),
                            line = line_no + 1,
                            error = %e,
                            "skipping unreadable memory journal line"
                        ),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(RepositoryError::Query(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        }

        debug!(path = %path.display(), users = records.len(), "memory journal loaded");
        Ok(Self {
            records,
            journal: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    async fn append_journal(&self, record: &MemoryRecord) -> Result<(), RepositoryError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let mut line = serde_json::to_string(record)
            .map_err(|e| RepositoryError::Query(format!("failed to encode record: {e}")))?;
        line.push('\n');

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|_| RepositoryError::Connection)?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|_| RepositoryError::Connection)?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| RepositoryError::Query(format!("journal write failed: {e}")))?;
        file.flush()
            .await
            .map_err(|e| RepositoryError::Query(format!("journal flush failed: {e}")))
    }

    /// Replace the journal with every record except `user_id`'s.
    ///
    /// Writes a sibling temp file and renames it over the journal, so a
    /// failed or interrupted rewrite leaves the old journal intact.
    async fn rewrite_journal_without(&self, user_id: &str) -> Result<(), RepositoryError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let mut content = String::new();
        for entry in self.records.iter().filter(|e| e.key() != user_id) {
            for record in entry.value() {
                let line = serde_json::to_string(record)
                    .map_err(|e| RepositoryError::Query(format!("failed to encode record: {e}")))?;
                content.push_str(&line);
                content.push('\n');
            }
        }

        let tmp = temp_sibling(path);
        if let Err(e) = tokio::fs::write(&tmp, content).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RepositoryError::Query(format!("journal rewrite failed: {e}")));
        }
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| RepositoryError::Query(format!("journal replace failed: {e}")))
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Default for InMemoryMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LongTermMemoryIndex for InMemoryMemoryIndex {
    async fn upsert(&self, user_id: &str, record: &MemoryRecord) -> Result<(), RepositoryError> {
        if record.user_id != user_id {
            return Err(RepositoryError::Conflict(format!(
                "record {} belongs to '{}', not '{user_id}'",
                record.id, record.user_id
            )));
        }

        let _write = self.write_lock.lock().await;
        let exists = self
            .records
            .get(user_id)
            .is_some_and(|records| records.iter().any(|r| r.id == record.id));
        if exists {
            return Err(RepositoryError::Conflict(format!(
                "memory record {} already exists",
                record.id
            )));
        }

        // Journal first: a record is only visible once it is durable.
        self.append_journal(record).await?;
        self.records
            .entry(user_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn query(
        &self,
        user_id: &str,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<RetrievalResult>, RepositoryError> {
        Ok(match self.records.get(user_id) {
            Some(records) => rank_records(embedding, records.iter(), top_k, min_similarity),
            None => Vec::new(),
        })
    }

    async fn count(&self, user_id: &str) -> Result<u64, RepositoryError> {
        Ok(self
            .records
            .get(user_id)
            .map(|r| r.len() as u64)
            .unwrap_or(0))
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let _write = self.write_lock.lock().await;
        if !self.records.contains_key(user_id) {
            return Ok(0);
        }
        // Disk first: the map only forgets once the journal has.
        self.rewrite_journal_without(user_id).await?;
        Ok(self
            .records
            .remove(user_id)
            .map(|(_, r)| r.len() as u64)
            .unwrap_or(0))
    }
}
