// PrismaAdapter — authjs adapter over a Prisma-shaped data client.
//
// Every operation is one delegate call plus a reshape of the result:
// - lookups by unique key return `None` when nothing matches
// - storage ids on accounts and verification tokens are projected away
// - a verification token delete that finds nothing (P2025) means the token
//   was already used, and yields `None`
// Every other client error propagates unchanged.

use async_trait::async_trait;

use authjs_adapter_core::db::adapter::{Adapter, AdapterResult};
use authjs_adapter_core::db::client::{
    AccountDelegate, DataClient, SessionDelegate, SessionWhereUniqueInput, SessionWithUserRecord,
    UserDelegate, UserWhereUniqueInput, VerificationTokenDelegate,
};
use authjs_adapter_core::db::models::{
    AdapterAccount, AdapterSession, AdapterUser, IdentifierToken, NewUser, PartialSession,
    PartialUser, ProviderAccountId, SessionAndUser, VerificationToken,
};
use authjs_adapter_core::env::env_flag;

/// Environment variable that turns on per-operation debug logs.
pub const DEBUG_LOGS_ENV: &str = "AUTH_PRISMA_DEBUG_LOGS";

/// Configuration for the Prisma adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrismaAdapterConfig {
    /// Enable debug logs for the adapter.
    ///
    /// Default: false
    pub debug_logs: bool,
}

impl PrismaAdapterConfig {
    /// Read the configuration from `AUTH_PRISMA_DEBUG_LOGS`.
    pub fn from_env() -> Self {
        Self {
            debug_logs: env_flag(DEBUG_LOGS_ENV),
        }
    }
}

/// Prisma adapter.
///
/// Holds the data client and nothing else; it is `Send + Sync` whenever the
/// client is, and can be shared across tasks behind an `Arc`.
///
/// # Usage
///
/// ```rust,ignore
/// use authjs_prisma::PrismaAdapter;
///
/// let adapter = PrismaAdapter::new(client);
/// let user = adapter.get_user_by_email("a@x.com").await?;
/// ```
#[derive(Debug, Clone)]
pub struct PrismaAdapter<C: DataClient> {
    client: C,
    config: PrismaAdapterConfig,
}

impl<C: DataClient> PrismaAdapter<C> {
    /// Create a new adapter with debug logging off.
    pub fn new(client: C) -> Self {
        Self::with_config(client, PrismaAdapterConfig::default())
    }

    pub fn with_config(client: C, config: PrismaAdapterConfig) -> Self {
        Self { client, config }
    }

    /// Get the adapter ID.
    pub fn adapter_id(&self) -> &str {
        "prisma"
    }

    /// Get the adapter name.
    pub fn adapter_name(&self) -> &str {
        "Prisma Adapter"
    }

    pub fn config(&self) -> &PrismaAdapterConfig {
        &self.config
    }

    /// Get a reference to the underlying data client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn debug(&self, action: &str, model: &str) {
        if self.config.debug_logs {
            tracing::debug!("[Prisma Adapter] {} on '{}'", action, model);
        }
    }
}

#[async_trait]
impl<C: DataClient> Adapter for PrismaAdapter<C> {
    async fn create_user(&self, user: NewUser) -> AdapterResult<AdapterUser> {
        self.debug("CREATE", "user");
        self.client.user().create(user).await
    }

    async fn get_user(&self, id: &str) -> AdapterResult<Option<AdapterUser>> {
        self.debug("FIND_UNIQUE", "user");
        self.client
            .user()
            .find_unique(UserWhereUniqueInput::Id(id.to_string()))
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> AdapterResult<Option<AdapterUser>> {
        self.debug("FIND_UNIQUE", "user");
        self.client
            .user()
            .find_unique(UserWhereUniqueInput::Email(email.to_string()))
            .await
    }

    async fn get_user_by_account(
        &self,
        provider_account_id: ProviderAccountId,
    ) -> AdapterResult<Option<AdapterUser>> {
        self.debug("FIND_UNIQUE", "account");
        let selection = self
            .client
            .account()
            .find_unique_select_user(provider_account_id.into())
            .await?;
        Ok(selection.map(|s| s.user))
    }

    async fn update_user(&self, user: PartialUser) -> AdapterResult<AdapterUser> {
        self.debug("UPDATE", "user");
        let (id, data) = user.into_parts();
        self.client
            .user()
            .update(UserWhereUniqueInput::Id(id), data)
            .await
    }

    async fn delete_user(&self, id: &str) -> AdapterResult<AdapterUser> {
        self.debug("DELETE", "user");
        self.client
            .user()
            .delete(UserWhereUniqueInput::Id(id.to_string()))
            .await
    }

    async fn link_account(&self, account: AdapterAccount) -> AdapterResult<AdapterAccount> {
        self.debug("CREATE", "account");
        let record = self.client.account().create(account).await?;
        Ok(record.into_account())
    }

    async fn unlink_account(
        &self,
        provider_account_id: ProviderAccountId,
    ) -> AdapterResult<AdapterAccount> {
        self.debug("DELETE", "account");
        let record = self
            .client
            .account()
            .delete(provider_account_id.into())
            .await?;
        Ok(record.into_account())
    }

    async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> AdapterResult<Option<SessionAndUser>> {
        self.debug("FIND_UNIQUE", "session");
        let found = self
            .client
            .session()
            .find_unique_include_user(SessionWhereUniqueInput::new(session_token))
            .await?;

        Ok(found.map(
            |SessionWithUserRecord {
                 session_token,
                 user_id,
                 expires,
                 user,
             }| SessionAndUser {
                session: AdapterSession {
                    session_token,
                    user_id,
                    expires,
                },
                user,
            },
        ))
    }

    async fn create_session(&self, session: AdapterSession) -> AdapterResult<AdapterSession> {
        self.debug("CREATE", "session");
        self.client.session().create(session).await
    }

    async fn update_session(&self, session: PartialSession) -> AdapterResult<AdapterSession> {
        self.debug("UPDATE", "session");
        let (session_token, data) = session.into_parts();
        self.client
            .session()
            .update(SessionWhereUniqueInput::new(session_token), data)
            .await
    }

    async fn delete_session(&self, session_token: &str) -> AdapterResult<AdapterSession> {
        self.debug("DELETE", "session");
        self.client
            .session()
            .delete(SessionWhereUniqueInput::new(session_token))
            .await
    }

    async fn create_verification_token(
        &self,
        token: VerificationToken,
    ) -> AdapterResult<VerificationToken> {
        self.debug("CREATE", "verificationToken");
        let record = self.client.verification_token().create(token).await?;
        Ok(record.into_token())
    }

    async fn use_verification_token(
        &self,
        identifier_token: IdentifierToken,
    ) -> AdapterResult<Option<VerificationToken>> {
        self.debug("DELETE", "verificationToken");
        match self
            .client
            .verification_token()
            .delete(identifier_token.into())
            .await
        {
            Ok(record) => Ok(Some(record.into_token())),
            // Already used or never issued.
            Err(e) if e.is_record_not_found() => {
                if self.config.debug_logs {
                    tracing::debug!("[Prisma Adapter] verification token not found, treating as used");
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authjs_adapter_core::ClientErrorKind;
    use authjs_memory::{MemoryClient, MemoryClientOptions};
    use chrono::{TimeDelta, Utc};

    fn adapter() -> PrismaAdapter<MemoryClient> {
        PrismaAdapter::new(MemoryClient::new())
    }

    #[test]
    fn test_default_config() {
        let config = PrismaAdapterConfig::default();
        assert!(!config.debug_logs);
    }

    #[test]
    fn test_identity() {
        let adapter = adapter();
        assert_eq!(adapter.adapter_id(), "prisma");
        assert_eq!(adapter.adapter_name(), "Prisma Adapter");
    }

    #[tokio::test]
    async fn test_get_user_by_account_returns_owner() {
        let adapter = adapter();
        let user = adapter.create_user(NewUser::new("a@x.com")).await.unwrap();
        adapter
            .link_account(AdapterAccount::oauth(&user.id, "github", "42"))
            .await
            .unwrap();

        let owner = adapter
            .get_user_by_account(ProviderAccountId::new("github", "42"))
            .await
            .unwrap();
        assert_eq!(owner, Some(user));
    }

    #[tokio::test]
    async fn test_get_session_and_user_splits_record() {
        let adapter = adapter();
        let user = adapter.create_user(NewUser::new("a@x.com")).await.unwrap();
        let session = AdapterSession {
            session_token: "tok".into(),
            user_id: user.id.clone(),
            expires: Utc::now() + TimeDelta::days(30),
        };
        adapter.create_session(session.clone()).await.unwrap();

        let pair = adapter.get_session_and_user("tok").await.unwrap().unwrap();
        assert_eq!(pair.session, session);
        assert_eq!(pair.user, user);
        assert!(adapter.get_session_and_user("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_session_keeps_token() {
        let adapter = adapter();
        let user = adapter.create_user(NewUser::new("a@x.com")).await.unwrap();
        let expires = Utc::now() + TimeDelta::days(1);
        adapter
            .create_session(AdapterSession {
                session_token: "tok".into(),
                user_id: user.id,
                expires,
            })
            .await
            .unwrap();

        let later = expires + TimeDelta::days(29);
        let updated = adapter
            .update_session(PartialSession::new("tok").with_expires(later))
            .await
            .unwrap();
        assert_eq!(updated.session_token, "tok");
        assert_eq!(updated.expires, later);
    }

    #[tokio::test]
    async fn test_token_ids_never_leak() {
        let adapter = PrismaAdapter::new(MemoryClient::with_options(MemoryClientOptions {
            assign_token_ids: true,
        }));
        let token = VerificationToken::new("a@x.com", "abc", Utc::now() + TimeDelta::hours(1));

        let created = adapter.create_verification_token(token.clone()).await.unwrap();
        assert_eq!(created, token);

        let used = adapter.use_verification_token(token.key()).await.unwrap();
        assert_eq!(used, Some(token));
    }

    #[tokio::test]
    async fn test_use_verification_token_missing_is_none() {
        let adapter = adapter();
        let used = adapter
            .use_verification_token(IdentifierToken::new("a@x.com", "never-issued"))
            .await
            .unwrap();
        assert!(used.is_none());
    }

    #[tokio::test]
    async fn test_use_verification_token_propagates_connection_error() {
        let adapter = adapter();
        let token = VerificationToken::new("a@x.com", "abc", Utc::now() + TimeDelta::hours(1));
        adapter.create_verification_token(token.clone()).await.unwrap();

        adapter.client().set_offline(true);
        let err = adapter
            .use_verification_token(token.key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ClientErrorKind::Connection);

        // The token survives the failed attempt.
        adapter.client().set_offline(false);
        let used = adapter.use_verification_token(token.key()).await.unwrap();
        assert_eq!(used, Some(token));
    }

    #[tokio::test]
    async fn test_delete_session_missing_propagates() {
        let adapter = adapter();
        let err = adapter.delete_session("nope").await.unwrap_err();
        assert!(err.is_record_not_found());
    }

    #[tokio::test]
    async fn test_unlink_missing_account_propagates() {
        let adapter = adapter();
        let err = adapter
            .unlink_account(ProviderAccountId::new("github", "42"))
            .await
            .unwrap_err();
        assert!(err.is_record_not_found());
    }

    #[tokio::test]
    async fn test_debug_logs_do_not_change_results() {
        let adapter = PrismaAdapter::with_config(
            MemoryClient::new(),
            PrismaAdapterConfig { debug_logs: true },
        );
        let used = adapter
            .use_verification_token(IdentifierToken::new("a@x.com", "abc"))
            .await
            .unwrap();
        assert!(used.is_none());
    }
}
