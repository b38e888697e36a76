// Data-client contract — the delegate an adapter translates into.
//
// A client exposes four record collections (user, account, session,
// verification token). Every `where` argument is one of the unique-key shapes
// below, so a lookup can never match more than one record. Storage records
// (`AccountRecord`, `VerificationTokenRecord`) may carry identifiers the
// framework must never see; adapters project them into the framework models.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{
    AccountType, AdapterAccount, AdapterSession, AdapterUser, IdentifierToken, NewUser,
    ProviderAccountId, VerificationToken,
};
use crate::error::ClientResult;

// ─── Unique-key inputs ───────────────────────────────────────────

/// Unique lookup for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserWhereUniqueInput {
    Id(String),
    Email(String),
}

impl UserWhereUniqueInput {
    pub fn matches(&self, user: &AdapterUser) -> bool {
        match self {
            Self::Id(id) => &user.id == id,
            Self::Email(email) => &user.email == email,
        }
    }
}

impl fmt::Display for UserWhereUniqueInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id = {id}"),
            Self::Email(email) => write!(f, "email = {email}"),
        }
    }
}

/// Unique lookup for an account, by its composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountWhereUniqueInput {
    pub provider_provider_account_id: ProviderAccountId,
}

impl From<ProviderAccountId> for AccountWhereUniqueInput {
    fn from(key: ProviderAccountId) -> Self {
        Self {
            provider_provider_account_id: key,
        }
    }
}

/// Unique lookup for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionWhereUniqueInput {
    pub session_token: String,
}

impl SessionWhereUniqueInput {
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
        }
    }
}

/// Unique lookup for a verification token, by its composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationTokenWhereUniqueInput {
    pub identifier_token: IdentifierToken,
}

impl From<IdentifierToken> for VerificationTokenWhereUniqueInput {
    fn from(key: IdentifierToken) -> Self {
        Self {
            identifier_token: key,
        }
    }
}

// ─── Update inputs ───────────────────────────────────────────────

/// Fields to change on a user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdateInput {
    pub name: Option<Option<String>>,
    pub email: Option<String>,
    pub email_verified: Option<Option<DateTime<Utc>>>,
    pub image: Option<Option<String>>,
}

impl UserUpdateInput {
    pub fn apply_to(self, user: &mut AdapterUser) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(email_verified) = self.email_verified {
            user.email_verified = email_verified;
        }
        if let Some(image) = self.image {
            user.image = image;
        }
    }
}

/// Fields to change on a session. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdateInput {
    pub user_id: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

impl SessionUpdateInput {
    pub fn apply_to(self, session: &mut AdapterSession) {
        if let Some(user_id) = self.user_id {
            session.user_id = user_id;
        }
        if let Some(expires) = self.expires {
            session.expires = expires;
        }
    }
}

// ─── Storage records ─────────────────────────────────────────────

/// An account as the store holds it: optional storage id, kind as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "expires_at", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(rename = "token_type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(rename = "id_token", default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(rename = "session_state", default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<String>,
}

impl AccountRecord {
    pub fn from_account(id: Option<String>, account: AdapterAccount) -> Self {
        Self {
            id,
            user_id: account.user_id,
            account_type: account.account_type.into(),
            provider: account.provider,
            provider_account_id: account.provider_account_id,
            refresh_token: account.refresh_token,
            access_token: account.access_token,
            expires_at: account.expires_at,
            token_type: account.token_type,
            scope: account.scope,
            id_token: account.id_token,
            session_state: account.session_state,
        }
    }

    /// Project into the framework's account type, dropping the storage id.
    pub fn into_account(self) -> AdapterAccount {
        AdapterAccount {
            user_id: self.user_id,
            account_type: AccountType::from(self.account_type),
            provider: self.provider,
            provider_account_id: self.provider_account_id,
            refresh_token: self.refresh_token,
            access_token: self.access_token,
            expires_at: self.expires_at,
            token_type: self.token_type,
            scope: self.scope,
            id_token: self.id_token,
            session_state: self.session_state,
        }
    }

    pub fn matches(&self, key: &ProviderAccountId) -> bool {
        self.provider == key.provider && self.provider_account_id == key.provider_account_id
    }
}

/// Result of an account lookup that selects only the owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUserSelection {
    pub user: AdapterUser,
}

/// A session row with its owning user included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWithUserRecord {
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
    pub user: AdapterUser,
}

/// A verification token as the store holds it.
///
/// Document stores need a primary key on every record, so `id` may be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTokenRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub identifier: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

impl VerificationTokenRecord {
    pub fn from_token(id: Option<String>, token: VerificationToken) -> Self {
        Self {
            id,
            identifier: token.identifier,
            token: token.token,
            expires: token.expires,
        }
    }

    /// Project into the framework's token type, dropping the storage id.
    pub fn into_token(self) -> VerificationToken {
        VerificationToken {
            identifier: self.identifier,
            token: self.token,
            expires: self.expires,
        }
    }

    pub fn matches(&self, key: &IdentifierToken) -> bool {
        self.identifier == key.identifier && self.token == key.token
    }
}

// ─── Delegate traits ─────────────────────────────────────────────

/// Operations on the user collection.
#[async_trait]
pub trait UserDelegate: Send + Sync {
    async fn create(&self, data: NewUser) -> ClientResult<AdapterUser>;

    /// Returns `None` when nothing matches.
    async fn find_unique(&self, where_unique: UserWhereUniqueInput) -> ClientResult<Option<AdapterUser>>;

    /// Fails with `RecordNotFound` when nothing matches.
    async fn update(
        &self,
        where_unique: UserWhereUniqueInput,
        data: UserUpdateInput,
    ) -> ClientResult<AdapterUser>;

    /// Fails with `RecordNotFound` when nothing matches.
    async fn delete(&self, where_unique: UserWhereUniqueInput) -> ClientResult<AdapterUser>;
}

/// Operations on the account collection.
#[async_trait]
pub trait AccountDelegate: Send + Sync {
    async fn create(&self, data: AdapterAccount) -> ClientResult<AccountRecord>;

    /// Look up an account, selecting only its owning user.
    async fn find_unique_select_user(
        &self,
        where_unique: AccountWhereUniqueInput,
    ) -> ClientResult<Option<AccountUserSelection>>;

    async fn delete(&self, where_unique: AccountWhereUniqueInput) -> ClientResult<AccountRecord>;
}

/// Operations on the session collection.
#[async_trait]
pub trait SessionDelegate: Send + Sync {
    async fn create(&self, data: AdapterSession) -> ClientResult<AdapterSession>;

    /// Look up a session, including its owning user.
    async fn find_unique_include_user(
        &self,
        where_unique: SessionWhereUniqueInput,
    ) -> ClientResult<Option<SessionWithUserRecord>>;

    async fn update(
        &self,
        where_unique: SessionWhereUniqueInput,
        data: SessionUpdateInput,
    ) -> ClientResult<AdapterSession>;

    async fn delete(&self, where_unique: SessionWhereUniqueInput) -> ClientResult<AdapterSession>;
}

/// Operations on the verification token collection.
#[async_trait]
pub trait VerificationTokenDelegate: Send + Sync {
    async fn create(&self, data: VerificationToken) -> ClientResult<VerificationTokenRecord>;

    /// Delete and return the token. Fails with `RecordNotFound` when the token
    /// does not exist (already used or never issued).
    async fn delete(
        &self,
        where_unique: VerificationTokenWhereUniqueInput,
    ) -> ClientResult<VerificationTokenRecord>;
}

/// A data client: the four collections an adapter delegates to.
///
/// Any store implementing this can back an adapter; connection handling and
/// query execution stay inside the client.
pub trait DataClient: Send + Sync + fmt::Debug {
    type User: UserDelegate;
    type Account: AccountDelegate;
    type Session: SessionDelegate;
    type VerificationToken: VerificationTokenDelegate;

    fn user(&self) -> &Self::User;
    fn account(&self) -> &Self::Account;
    fn session(&self) -> &Self::Session;
    fn verification_token(&self) -> &Self::VerificationToken;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> AdapterUser {
        AdapterUser::from_new("u1", NewUser::new("a@x.com").with_name("Ada"))
    }

    #[test]
    fn test_user_where_matches() {
        let user = user();
        assert!(UserWhereUniqueInput::Id("u1".into()).matches(&user));
        assert!(UserWhereUniqueInput::Email("a@x.com".into()).matches(&user));
        assert!(!UserWhereUniqueInput::Email("b@x.com".into()).matches(&user));
    }

    #[test]
    fn test_user_update_apply() {
        let mut user = user();
        UserUpdateInput {
            name: Some(None),
            email: Some("new@x.com".into()),
            ..Default::default()
        }
        .apply_to(&mut user);
        assert_eq!(user.name, None);
        assert_eq!(user.email, "new@x.com");
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_account_record_projection_drops_id() {
        let account = AdapterAccount::oauth("u1", "github", "42");
        let record = AccountRecord::from_account(Some("acc_1".into()), account.clone());
        assert_eq!(record.account_type, "oauth");
        assert!(record.matches(&ProviderAccountId::new("github", "42")));
        assert!(!record.matches(&ProviderAccountId::new("github", "43")));
        assert_eq!(record.into_account(), account);
    }

    #[test]
    fn test_verification_token_record_projection() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let token = VerificationToken::new("a@x.com", "abc", expires);
        let record = VerificationTokenRecord::from_token(Some("vt_1".into()), token.clone());
        assert!(record.matches(&token.key()));
        assert_eq!(record.into_token(), token);
    }
}
