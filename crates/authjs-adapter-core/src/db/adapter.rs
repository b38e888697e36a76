// Adapter trait — the storage contract the authentication framework calls.
//
// Fourteen operations over users, accounts, sessions and verification tokens.
// Lookups return `Ok(None)` when nothing matches; every other failure is a
// `ClientError` passed through from whatever store backs the adapter.

use std::fmt;

use async_trait::async_trait;

use crate::db::models::{
    AdapterAccount, AdapterSession, AdapterUser, IdentifierToken, NewUser, PartialSession,
    PartialUser, ProviderAccountId, SessionAndUser, VerificationToken,
};
use crate::error::ClientError;

/// Result type for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, ClientError>;

/// The pluggable storage adapter contract.
///
/// Implementations hold no state between calls; every operation is a single
/// round trip to the backing store.
#[async_trait]
pub trait Adapter: Send + Sync + fmt::Debug {
    // ─── Users ───────────────────────────────────────────────────

    async fn create_user(&self, user: NewUser) -> AdapterResult<AdapterUser>;

    async fn get_user(&self, id: &str) -> AdapterResult<Option<AdapterUser>>;

    async fn get_user_by_email(&self, email: &str) -> AdapterResult<Option<AdapterUser>>;

    /// The user owning the account with this provider key, never the account.
    async fn get_user_by_account(
        &self,
        provider_account_id: ProviderAccountId,
    ) -> AdapterResult<Option<AdapterUser>>;

    async fn update_user(&self, user: PartialUser) -> AdapterResult<AdapterUser>;

    async fn delete_user(&self, id: &str) -> AdapterResult<AdapterUser>;

    // ─── Accounts ────────────────────────────────────────────────

    async fn link_account(&self, account: AdapterAccount) -> AdapterResult<AdapterAccount>;

    /// Remove the account with this provider key and return what it held.
    async fn unlink_account(
        &self,
        provider_account_id: ProviderAccountId,
    ) -> AdapterResult<AdapterAccount>;

    // ─── Sessions ────────────────────────────────────────────────

    async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> AdapterResult<Option<SessionAndUser>>;

    async fn create_session(&self, session: AdapterSession) -> AdapterResult<AdapterSession>;

    async fn update_session(&self, session: PartialSession) -> AdapterResult<AdapterSession>;

    async fn delete_session(&self, session_token: &str) -> AdapterResult<AdapterSession>;

    // ─── Verification tokens ─────────────────────────────────────

    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> AdapterResult<VerificationToken>;

    /// Consume a token. A token that no longer exists yields `Ok(None)`.
    async fn use_verification_token(
        &self,
        identifier_token: IdentifierToken,
    ) -> AdapterResult<Option<VerificationToken>>;
}
