// Model generators — randomized framework records for adapter tests.
//
// Every generated record uses fresh uuids for its unique keys, so generators
// can be called repeatedly against one store without colliding.

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use authjs_adapter_core::{AccountType, AdapterAccount, AdapterSession, NewUser, VerificationToken};

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Generate user creation data with a unique email.
pub fn generate_test_user() -> NewUser {
    let id = short_id();
    NewUser {
        name: Some(format!("user-{id}")),
        email: format!("user-{id}@email.com"),
        email_verified: None,
        image: None,
    }
}

/// Generate an OAuth account linked to `user_id`, with tokens attached.
pub fn generate_test_account(user_id: &str) -> AdapterAccount {
    let expires_at = Utc::now() + TimeDelta::seconds(3600);
    AdapterAccount {
        user_id: user_id.to_string(),
        account_type: AccountType::Oauth,
        provider: "test".to_string(),
        provider_account_id: Uuid::new_v4().to_string(),
        refresh_token: Some(Uuid::new_v4().to_string()),
        access_token: Some(Uuid::new_v4().to_string()),
        expires_at: Some(expires_at.timestamp()),
        token_type: Some("bearer".to_string()),
        scope: Some("test".to_string()),
        id_token: Some(Uuid::new_v4().to_string()),
        session_state: None,
    }
}

/// Generate a session for `user_id` that expires in a week.
pub fn generate_test_session(user_id: &str) -> AdapterSession {
    AdapterSession {
        session_token: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        expires: Utc::now() + TimeDelta::days(7),
    }
}

/// Generate a verification token that expires in an hour.
pub fn generate_test_verification_token() -> VerificationToken {
    VerificationToken::new(
        format!("test:{}", Uuid::new_v4()),
        Uuid::new_v4().to_string(),
        Utc::now() + TimeDelta::hours(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_test_user() {
        let user = generate_test_user();
        assert!(user.email.starts_with("user-"));
        assert!(user.email.ends_with("@email.com"));
        assert!(user.name.is_some());
        assert_ne!(generate_test_user().email, user.email);
    }

    #[test]
    fn test_generate_test_account() {
        let account = generate_test_account("user-456");
        assert_eq!(account.user_id, "user-456");
        assert_eq!(account.provider, "test");
        assert_eq!(account.account_type, AccountType::Oauth);
        assert!(account.expires_at.unwrap() > Utc::now().timestamp());
    }

    #[test]
    fn test_generate_test_session() {
        let session = generate_test_session("user-123");
        assert_eq!(session.user_id, "user-123");
        assert!(session.expires > Utc::now());
    }

    #[test]
    fn test_generate_test_verification_token() {
        let token = generate_test_verification_token();
        assert!(token.identifier.starts_with("test:"));
        assert_ne!(generate_test_verification_token().key(), token.key());
    }
}
