// In-memory data client — Vec-backed tables implementing the DataClient contract.
//
// All four collections share one `tokio::sync::RwLock`, so a relation lookup
// (account → user, session → user) sees a consistent snapshot and a delete is
// atomic with respect to concurrent deletes of the same record. Unique keys
// are enforced the way a relational schema would enforce them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use authjs_adapter_core::db::client::{
    AccountDelegate, AccountRecord, AccountUserSelection, AccountWhereUniqueInput, DataClient,
    SessionDelegate, SessionUpdateInput, SessionWhereUniqueInput, SessionWithUserRecord,
    UserDelegate, UserUpdateInput, UserWhereUniqueInput, VerificationTokenDelegate,
    VerificationTokenRecord, VerificationTokenWhereUniqueInput,
};
use authjs_adapter_core::db::models::{
    AdapterAccount, AdapterSession, AdapterUser, NewUser, VerificationToken,
};
use authjs_adapter_core::error::{ClientError, ClientResult};
use authjs_adapter_core::utils::generate_id;

/// Options for the in-memory client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryClientOptions {
    /// Give every stored verification token its own id, the way a document
    /// store does. Adapters must still never hand that id to the framework.
    ///
    /// Default: false
    pub assign_token_ids: bool,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<AdapterUser>,
    accounts: Vec<AccountRecord>,
    sessions: Vec<AdapterSession>,
    verification_tokens: Vec<VerificationTokenRecord>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: RwLock<Tables>,
    offline: AtomicBool,
    options: MemoryClientOptions,
}

impl Inner {
    fn ensure_online(&self) -> ClientResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::connection(
                "Can't reach database server: memory client is offline",
            ));
        }
        Ok(())
    }
}

fn not_found(model: &str, action: &str) -> ClientError {
    ClientError::record_not_found(format!("No {model} found. Record to {action} does not exist."))
}

/// In-memory data client.
///
/// Cloning is cheap; clones share the same tables. Data is lost when the last
/// clone is dropped.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    inner: Arc<Inner>,
    user: MemoryUsers,
    account: MemoryAccounts,
    session: MemorySessions,
    verification_token: MemoryVerificationTokens,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    /// Create a new empty client.
    pub fn new() -> Self {
        Self::with_options(MemoryClientOptions::default())
    }

    pub fn with_options(options: MemoryClientOptions) -> Self {
        let inner = Arc::new(Inner {
            options,
            ..Default::default()
        });
        Self {
            user: MemoryUsers {
                inner: inner.clone(),
            },
            account: MemoryAccounts {
                inner: inner.clone(),
            },
            session: MemorySessions {
                inner: inner.clone(),
            },
            verification_token: MemoryVerificationTokens {
                inner: inner.clone(),
            },
            inner,
        }
    }

    pub fn options(&self) -> MemoryClientOptions {
        self.inner.options
    }

    /// While offline, every operation fails with `ClientError::Connection`.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
        tracing::debug!(offline, "memory client connectivity changed");
    }

    pub fn is_offline(&self) -> bool {
        self.inner.offline.load(Ordering::SeqCst)
    }

    /// Number of stored records for a model
    /// (`user`, `account`, `session`, `verificationToken`).
    pub async fn model_count(&self, model: &str) -> usize {
        let tables = self.inner.tables.read().await;
        match model {
            "user" => tables.users.len(),
            "account" => tables.accounts.len(),
            "session" => tables.sessions.len(),
            "verificationToken" => tables.verification_tokens.len(),
            _ => 0,
        }
    }

    /// Remove every record.
    pub async fn clear(&self) {
        *self.inner.tables.write().await = Tables::default();
    }
}

impl DataClient for MemoryClient {
    type User = MemoryUsers;
    type Account = MemoryAccounts;
    type Session = MemorySessions;
    type VerificationToken = MemoryVerificationTokens;

    fn user(&self) -> &MemoryUsers {
        &self.user
    }

    fn account(&self) -> &MemoryAccounts {
        &self.account
    }

    fn session(&self) -> &MemorySessions {
        &self.session
    }

    fn verification_token(&self) -> &MemoryVerificationTokens {
        &self.verification_token
    }
}

// ─── Users ───────────────────────────────────────────────────────

/// The user collection of a [`MemoryClient`].
#[derive(Debug, Clone)]
pub struct MemoryUsers {
    inner: Arc<Inner>,
}

#[async_trait]
impl UserDelegate for MemoryUsers {
    async fn create(&self, data: NewUser) -> ClientResult<AdapterUser> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(ClientError::constraint_violation(
                "email",
                "Unique constraint failed on the fields: (`email`)",
            ));
        }
        let user = AdapterUser::from_new(generate_id(), data);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_unique(
        &self,
        where_unique: UserWhereUniqueInput,
    ) -> ClientResult<Option<AdapterUser>> {
        self.inner.ensure_online()?;
        let tables = self.inner.tables.read().await;
        Ok(tables.users.iter().find(|u| where_unique.matches(u)).cloned())
    }

    async fn update(
        &self,
        where_unique: UserWhereUniqueInput,
        data: UserUpdateInput,
    ) -> ClientResult<AdapterUser> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let pos = tables
            .users
            .iter()
            .position(|u| where_unique.matches(u))
            .ok_or_else(|| not_found("User", "update"))?;

        if let Some(ref email) = data.email {
            let taken = tables
                .users
                .iter()
                .enumerate()
                .any(|(i, u)| i != pos && &u.email == email);
            if taken {
                return Err(ClientError::constraint_violation(
                    "email",
                    "Unique constraint failed on the fields: (`email`)",
                ));
            }
        }

        let user = &mut tables.users[pos];
        data.apply_to(user);
        Ok(user.clone())
    }

    async fn delete(&self, where_unique: UserWhereUniqueInput) -> ClientResult<AdapterUser> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let pos = tables
            .users
            .iter()
            .position(|u| where_unique.matches(u))
            .ok_or_else(|| not_found("User", "delete"))?;
        let user = tables.users.remove(pos);

        // Sessions and accounts cascade with their owner.
        tables.sessions.retain(|s| s.user_id != user.id);
        tables.accounts.retain(|a| a.user_id != user.id);
        Ok(user)
    }
}

// ─── Accounts ────────────────────────────────────────────────────

/// The account collection of a [`MemoryClient`].
#[derive(Debug, Clone)]
pub struct MemoryAccounts {
    inner: Arc<Inner>,
}

#[async_trait]
impl AccountDelegate for MemoryAccounts {
    async fn create(&self, data: AdapterAccount) -> ClientResult<AccountRecord> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let key = data.key();
        if tables.accounts.iter().any(|a| a.matches(&key)) {
            return Err(ClientError::constraint_violation(
                "provider_providerAccountId",
                "Unique constraint failed on the fields: (`provider`,`providerAccountId`)",
            ));
        }
        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(ClientError::constraint_violation(
                "userId",
                "Foreign key constraint failed on the field: `userId`",
            ));
        }
        let record = AccountRecord::from_account(Some(generate_id()), data);
        tables.accounts.push(record.clone());
        Ok(record)
    }

    async fn find_unique_select_user(
        &self,
        where_unique: AccountWhereUniqueInput,
    ) -> ClientResult<Option<AccountUserSelection>> {
        self.inner.ensure_online()?;
        let tables = self.inner.tables.read().await;
        let key = &where_unique.provider_provider_account_id;
        let selection = tables
            .accounts
            .iter()
            .find(|a| a.matches(key))
            .and_then(|a| tables.users.iter().find(|u| u.id == a.user_id))
            .map(|user| AccountUserSelection { user: user.clone() });
        Ok(selection)
    }

    async fn delete(&self, where_unique: AccountWhereUniqueInput) -> ClientResult<AccountRecord> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let key = &where_unique.provider_provider_account_id;
        let pos = tables
            .accounts
            .iter()
            .position(|a| a.matches(key))
            .ok_or_else(|| not_found("Account", "delete"))?;
        Ok(tables.accounts.remove(pos))
    }
}

// ─── Sessions ────────────────────────────────────────────────────

/// The session collection of a [`MemoryClient`].
#[derive(Debug, Clone)]
pub struct MemorySessions {
    inner: Arc<Inner>,
}

#[async_trait]
impl SessionDelegate for MemorySessions {
    async fn create(&self, data: AdapterSession) -> ClientResult<AdapterSession> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        if tables
            .sessions
            .iter()
            .any(|s| s.session_token == data.session_token)
        {
            return Err(ClientError::constraint_violation(
                "sessionToken",
                "Unique constraint failed on the fields: (`sessionToken`)",
            ));
        }
        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(ClientError::constraint_violation(
                "userId",
                "Foreign key constraint failed on the field: `userId`",
            ));
        }
        tables.sessions.push(data.clone());
        Ok(data)
    }

    async fn find_unique_include_user(
        &self,
        where_unique: SessionWhereUniqueInput,
    ) -> ClientResult<Option<SessionWithUserRecord>> {
        self.inner.ensure_online()?;
        let tables = self.inner.tables.read().await;
        let Some(session) = tables
            .sessions
            .iter()
            .find(|s| s.session_token == where_unique.session_token)
        else {
            return Ok(None);
        };
        let Some(user) = tables.users.iter().find(|u| u.id == session.user_id) else {
            return Ok(None);
        };
        Ok(Some(SessionWithUserRecord {
            session_token: session.session_token.clone(),
            user_id: session.user_id.clone(),
            expires: session.expires,
            user: user.clone(),
        }))
    }

    async fn update(
        &self,
        where_unique: SessionWhereUniqueInput,
        data: SessionUpdateInput,
    ) -> ClientResult<AdapterSession> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        if let Some(ref user_id) = data.user_id {
            if !tables.users.iter().any(|u| &u.id == user_id) {
                return Err(ClientError::constraint_violation(
                    "userId",
                    "Foreign key constraint failed on the field: `userId`",
                ));
            }
        }
        let session = tables
            .sessions
            .iter_mut()
            .find(|s| s.session_token == where_unique.session_token)
            .ok_or_else(|| not_found("Session", "update"))?;
        data.apply_to(session);
        Ok(session.clone())
    }

    async fn delete(&self, where_unique: SessionWhereUniqueInput) -> ClientResult<AdapterSession> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let pos = tables
            .sessions
            .iter()
            .position(|s| s.session_token == where_unique.session_token)
            .ok_or_else(|| not_found("Session", "delete"))?;
        Ok(tables.sessions.remove(pos))
    }
}

// ─── Verification tokens ─────────────────────────────────────────

/// The verification token collection of a [`MemoryClient`].
#[derive(Debug, Clone)]
pub struct MemoryVerificationTokens {
    inner: Arc<Inner>,
}

#[async_trait]
impl VerificationTokenDelegate for MemoryVerificationTokens {
    async fn create(&self, data: VerificationToken) -> ClientResult<VerificationTokenRecord> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let key = data.key();
        if tables.verification_tokens.iter().any(|t| t.matches(&key)) {
            return Err(ClientError::constraint_violation(
                "identifier_token",
                "Unique constraint failed on the fields: (`identifier`,`token`)",
            ));
        }
        let id = self.inner.options.assign_token_ids.then(generate_id);
        let record = VerificationTokenRecord::from_token(id, data);
        tables.verification_tokens.push(record.clone());
        Ok(record)
    }

    async fn delete(
        &self,
        where_unique: VerificationTokenWhereUniqueInput,
    ) -> ClientResult<VerificationTokenRecord> {
        self.inner.ensure_online()?;
        let mut tables = self.inner.tables.write().await;
        let pos = tables
            .verification_tokens
            .iter()
            .position(|t| t.matches(&where_unique.identifier_token))
            .ok_or_else(|| not_found("VerificationToken", "delete"))?;
        Ok(tables.verification_tokens.remove(pos))
    }
}
