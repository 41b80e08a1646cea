//! In-memory short-term store with FIFO eviction.

use std::collections::VecDeque;

use dashmap::DashMap;

use bytebond_core::memory::short_term::ShortTermStore;
use bytebond_types::conversation::ConversationTurn;
use bytebond_types::error::RepositoryError;

/// Per-user rolling window of recent turns.
///
/// Each user's window lives behind its own DashMap entry, so appends for
/// different users never contend and a pair append cannot interleave with
/// another writer for the same user.
pub struct InMemoryShortTermStore {
    windows: DashMap<String, VecDeque<ConversationTurn>>,
    capacity: usize,
}

impl InMemoryShortTermStore {
    /// Create a store keeping at most `capacity` turns per user (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            windows: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_all(&self, user_id: &str, turns: impl IntoIterator<Item = ConversationTurn>) {
        let mut window = self.windows.entry(user_id.to_string()).or_default();
        for turn in turns {
            window.push_back(turn);
        }
        while window.len() > self.capacity {
            window.pop_front();
        }
    }
}

impl ShortTermStore for InMemoryShortTermStore {
    async fn append(&self, user_id: &str, turn: ConversationTurn) -> Result<(), RepositoryError> {
        self.push_all(user_id, [turn]);
        Ok(())
    }

    async fn append_pair(
        &self,
        user_id: &str,
        first: ConversationTurn,
        second: ConversationTurn,
    ) -> Result<(), RepositoryError> {
        self.push_all(user_id, [first, second]);
        Ok(())
    }

    async fn read_recent(&self, user_id: &str, window: usize) -> Vec<ConversationTurn> {
        match self.windows.get(user_id) {
            Some(turns) => {
                let skip = turns.len().saturating_sub(window);
                turns.iter().skip(skip).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    async fn clear(&self, user_id: &str) -> Result<u64, RepositoryError> {
        Ok(self
            .windows
            .remove(user_id)
            .map(|(_, turns)| turns.len() as u64)
            .unwrap_or(0))
    }

    async fn len(&self, user_id: &str) -> usize {
        self.windows.get(user_id).map(|t| t.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use bytebond_types::conversation::Speaker;

    fn turn(text: &str) -> ConversationTurn {
        ConversationTurn::new("alex", Speaker::User, text)
    }

    #[tokio::test]
    async fn test_read_recent_empty_user() {
        let store = InMemoryShortTermStore::new(5);
        assert!(store.read_recent("nobody", 10).await.is_empty());
        assert_eq!(store.len("nobody").await, 0);
    }

    #[tokio::test]
    async fn test_window_bound_keeps_most_recent_in_order() {
        let store = InMemoryShortTermStore::new(3);
        for i in 0..7 {
            store.append("alex", turn(&format!("m{i}"))).await.unwrap();
        }
        let recent = store.read_recent("alex", 10).await;
        let texts: Vec<&str> = recent.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["m4", "m5", "m6"]);
        assert_eq!(store.len("alex").await, 3);
    }

    #[tokio::test]
    async fn test_read_recent_respects_window_size() {
        let store = InMemoryShortTermStore::new(10);
        for i in 0..5 {
            store.append("alex", turn(&format!("m{i}"))).await.unwrap();
        }
        let recent = store.read_recent("alex", 2).await;
        let texts: Vec<&str> = recent.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["m3", "m4"]);
        assert!(store.read_recent("alex", 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = InMemoryShortTermStore::new(2);
        store.append("alex", turn("a")).await.unwrap();
        store
            .append("sam", ConversationTurn::new("sam", Speaker::User, "s"))
            .await
            .unwrap();
        assert_eq!(store.read_recent("alex", 5).await[0].text, "a");
        assert_eq!(store.read_recent("sam", 5).await[0].text, "s");
    }

    #[tokio::test]
    async fn test_concurrent_pairs_never_interleave() {
        let store = Arc::new(InMemoryShortTermStore::new(1_000));
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_pair(
                        "alex",
                        ConversationTurn::new("alex", Speaker::User, format!("q{i}")),
                        ConversationTurn::new("alex", Speaker::Companion, format!("a{i}")),
                    )
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let turns = store.read_recent("alex", 1_000).await;
        assert_eq!(turns.len(), 100);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].speaker, Speaker::User);
            assert_eq!(pair[1].speaker, Speaker::Companion);
            assert_eq!(pair[0].text[1..], pair[1].text[1..]);
        }
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryShortTermStore::new(5);
        store.append("alex", turn("a")).await.unwrap();
        store.append("alex", turn("b")).await.unwrap();
        assert_eq!(store.clear("alex").await.unwrap(), 2);
        assert_eq!(store.clear("alex").await.unwrap(), 0);
        assert!(store.read_recent("alex", 5).await.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(InMemoryShortTermStore::new(0).capacity(), 1);
    }
}
