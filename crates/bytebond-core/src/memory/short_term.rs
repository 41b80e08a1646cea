//! Short-term memory store trait.
//!
//! The rolling window of recent turns for each user. Appends never fail
//! for capacity reasons; the oldest turns are evicted first once the
//! window is full.

use bytebond_types::conversation::ConversationTurn;
use bytebond_types::error::RepositoryError;

/// Trait for per-user recent-turn storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in bytebond-infra.
pub trait ShortTermStore: Send + Sync {
    /// Append one turn to the user's window.
    fn append(
        &self,
        user_id: &str,
        turn: ConversationTurn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append two turns in order, with no other writer for this user
    /// able to interleave between them.
    fn append_pair(
        &self,
        user_id: &str,
        first: ConversationTurn,
        second: ConversationTurn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Up to `window` most recent turns, oldest first. Empty if none.
    fn read_recent(
        &self,
        user_id: &str,
        window: usize,
    ) -> impl std::future::Future<Output = Vec<ConversationTurn>> + Send;

    /// Drop the user's window. Returns the number of turns removed.
    fn clear(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Number of turns currently held for the user.
    fn len(&self, user_id: &str) -> impl std::future::Future<Output = usize> + Send;
}
