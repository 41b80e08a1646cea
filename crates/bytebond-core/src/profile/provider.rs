//! ProfileProvider trait definition.
//!
//! Profiles are owned by an external system (account storage, onboarding
//! forms). The orchestrator only ever reads them, once per turn.

use bytebond_types::error::ProfileError;
use bytebond_types::profile::{Concern, PersonaProfile, UserProfile};

/// Trait for read-only user and persona profile lookup.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in bytebond-infra.
pub trait ProfileProvider: Send + Sync {
    /// The user's profile. `ProfileError::NotFound` if the user is unknown.
    fn get_user_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, ProfileError>> + Send;

    /// The companion persona configured for this user.
    fn get_persona_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<PersonaProfile, ProfileError>> + Send;

    /// The user's most recent concerns, newest first, at most `limit`.
    ///
    /// Providers without concern tracking return an empty list.
    fn recent_concerns(
        &self,
        _user_id: &str,
        _limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Concern>, ProfileError>> + Send {
        async { Ok(Vec::new()) }
    }
}
