// Framework-facing record models.
//
// These are the shapes the authentication framework sees. None of them carry
// storage-assigned identifiers other than the user id; the storage-side
// counterparts live in `db::client`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::client::{SessionUpdateInput, UserUpdateInput};

// ─── User ────────────────────────────────────────────────────────

/// A user as seen by the framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    /// When the email address was verified, `None` while unverified.
    #[serde(default)]
    pub email_verified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl AdapterUser {
    /// Build a stored user from creation data and a store-assigned id.
    pub fn from_new(id: impl Into<String>, user: NewUser) -> Self {
        Self {
            id: id.into(),
            name: user.name,
            email: user.email,
            email_verified: user.email_verified,
            image: user.image,
        }
    }
}

/// User creation data: every user field except the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A user id plus the fields to change.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialUser {
    pub id: String,
    pub name: Option<Option<String>>,
    pub email: Option<String>,
    pub email_verified: Option<Option<DateTime<Utc>>>,
    pub image: Option<Option<String>>,
}

impl PartialUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Split into the key and the remaining fields.
    pub fn into_parts(self) -> (String, UserUpdateInput) {
        let data = UserUpdateInput {
            name: self.name,
            email: self.email,
            email_verified: self.email_verified,
            image: self.image,
        };
        (self.id, data)
    }
}

// ─── Account ─────────────────────────────────────────────────────

/// The kind of provider an account was linked through.
///
/// Kinds the framework does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Oauth,
    Oidc,
    Email,
    Credentials,
    Other(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Oauth => "oauth",
            Self::Oidc => "oidc",
            Self::Email => "email",
            Self::Credentials => "credentials",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for AccountType {
    fn from(s: &str) -> Self {
        match s {
            "oauth" => Self::Oauth,
            "oidc" => Self::Oidc,
            "email" => Self::Email,
            "credentials" => Self::Credentials,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for AccountType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<AccountType> for String {
    fn from(kind: AccountType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A linked external identity.
///
/// Token fields keep the provider's snake_case names on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterAccount {
    pub user_id: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub provider: String,
    pub provider_account_id: String,
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Access token expiry, in seconds since the epoch.
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

impl AdapterAccount {
    /// An OAuth account with no tokens attached.
    pub fn oauth(
        user_id: impl Into<String>,
        provider: impl Into<String>,
        provider_account_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_type: AccountType::Oauth,
            provider: provider.into(),
            provider_account_id: provider_account_id.into(),
            refresh_token: None,
            access_token: None,
            expires_at: None,
            token_type: None,
            scope: None,
            id_token: None,
            session_state: None,
        }
    }

    /// The composite key this account is unique on.
    pub fn key(&self) -> ProviderAccountId {
        ProviderAccountId::new(&self.provider, &self.provider_account_id)
    }
}

/// Composite unique key of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccountId {
    pub provider: String,
    pub provider_account_id: String,
}

impl ProviderAccountId {
    pub fn new(provider: impl Into<String>, provider_account_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            provider_account_id: provider_account_id.into(),
        }
    }
}

// ─── Session ─────────────────────────────────────────────────────

/// An active login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterSession {
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}

/// A session token plus the fields to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSession {
    pub session_token: String,
    pub user_id: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

impl PartialSession {
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            user_id: None,
            expires: None,
        }
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Split into the key and the remaining fields.
    pub fn into_parts(self) -> (String, SessionUpdateInput) {
        let data = SessionUpdateInput {
            user_id: self.user_id,
            expires: self.expires,
        };
        (self.session_token, data)
    }
}

/// Result of a session lookup: the session and its owner, side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAndUser {
    pub session: AdapterSession,
    pub user: AdapterUser,
}

// ─── Verification token ──────────────────────────────────────────

/// A one-time sign-in token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub identifier: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

impl VerificationToken {
    pub fn new(
        identifier: impl Into<String>,
        token: impl Into<String>,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            token: token.into(),
            expires,
        }
    }

    /// The composite key this token is unique on.
    pub fn key(&self) -> IdentifierToken {
        IdentifierToken::new(&self.identifier, &self.token)
    }
}

/// Composite unique key of a verification token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifierToken {
    pub identifier: String,
    pub token: String,
}

impl IdentifierToken {
    pub fn new(identifier: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            token: token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_serializes_camel_case() {
        let user = AdapterUser {
            id: "u1".into(),
            name: Some("Ada".into()),
            email: "a@x.com".into(),
            email_verified: None,
            image: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["email"], "a@x.com");
        assert!(json["emailVerified"].is_null());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_account_type_roundtrips_unknown_kinds() {
        assert_eq!(AccountType::from("oauth"), AccountType::Oauth);
        assert_eq!(AccountType::from("webauthn"), AccountType::Other("webauthn".into()));
        assert_eq!(AccountType::Other("webauthn".into()).as_str(), "webauthn");
    }

    #[test]
    fn test_account_wire_names() {
        let mut account = AdapterAccount::oauth("u1", "github", "42");
        account.access_token = Some("gho_abc".into());
        account.expires_at = Some(1_700_000_000);

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["type"], "oauth");
        assert_eq!(json["providerAccountId"], "42");
        assert_eq!(json["access_token"], "gho_abc");
        assert_eq!(json["expires_at"], 1_700_000_000);
        assert!(json.get("refresh_token").is_none());
    }

    #[test]
    fn test_partial_user_into_parts() {
        let mut partial = PartialUser::new("u1");
        partial.name = Some(Some("New".into()));
        partial.image = Some(None);

        let (id, data) = partial.into_parts();
        assert_eq!(id, "u1");
        assert_eq!(data.name, Some(Some("New".into())));
        assert_eq!(data.image, Some(None));
        assert_eq!(data.email, None);
    }

    #[test]
    fn test_partial_session_into_parts() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let (token, data) = PartialSession::new("tok").with_expires(expires).into_parts();
        assert_eq!(token, "tok");
        assert_eq!(data.expires, Some(expires));
        assert_eq!(data.user_id, None);
    }

    #[test]
    fn test_verification_token_has_no_id_on_the_wire() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let token = VerificationToken::new("a@x.com", "abc", expires);
        let json = serde_json::to_value(&token).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("id"));
        assert_eq!(token.key(), IdentifierToken::new("a@x.com", "abc"));
    }
}
