// Adapter conformance suite.
//
// A `TestSuite` runs a fixed list of named checks against any `Adapter` and
// tracks statistics (checks run, passed, failed, duration). Checks only use
// the adapter's own operations, so the same suite works for every backing
// store. Each check creates its own records with fresh keys and never
// depends on another check having run.

use std::time::Instant;

use chrono::TimeDelta;

use authjs_adapter_core::{Adapter, AdapterResult, PartialSession, PartialUser};

use crate::generators::{
    generate_test_account, generate_test_session, generate_test_user,
    generate_test_verification_token,
};

/// Names of the checks, in the order `TestSuite::run` executes them.
pub const CHECKS: &[&str] = &[
    "create_user_then_get_user",
    "get_user_by_email",
    "get_user_by_account",
    "update_user",
    "delete_user",
    "link_and_unlink_account",
    "session_lifecycle",
    "create_verification_token_hides_storage_id",
    "use_verification_token_once",
];

/// A failed check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{check}: {message}")]
pub struct CheckFailure {
    pub check: String,
    pub message: String,
}

/// Statistics for a completed test suite.
#[derive(Debug, Clone)]
pub struct TestSuiteStats {
    pub suite_name: String,
    pub check_count: usize,
    pub passed: usize,
    pub failed: usize,
    pub suite_start_time: Instant,
    pub suite_duration_ms: f64,
}

/// Simple test logger.
pub struct TestLogger {
    pub adapter_name: String,
}

impl TestLogger {
    pub fn new(adapter_name: &str) -> Self {
        Self {
            adapter_name: adapter_name.to_string(),
        }
    }

    pub fn info(&self, msg: &str) {
        tracing::info!("[{}] {}", self.adapter_name, msg);
    }

    pub fn success(&self, msg: &str) {
        tracing::info!("[{}] ✓ {}", self.adapter_name, msg);
    }

    pub fn error(&self, msg: &str) {
        tracing::error!("[{}] {}", self.adapter_name, msg);
    }
}

/// A conformance suite for one adapter.
pub struct TestSuite {
    pub stats: TestSuiteStats,
    failures: Vec<CheckFailure>,
    log: TestLogger,
}

impl TestSuite {
    /// Create a new test suite.
    pub fn new(name: &str, adapter_display_name: &str) -> Self {
        let stats = TestSuiteStats {
            suite_name: name.to_string(),
            check_count: 0,
            passed: 0,
            failed: 0,
            suite_start_time: Instant::now(),
            suite_duration_ms: 0.0,
        };

        Self {
            stats,
            failures: Vec::new(),
            log: TestLogger::new(adapter_display_name),
        }
    }

    /// Run every check against `adapter`. Failing checks are recorded, not
    /// raised, so one failure never hides the others.
    pub async fn run<A: Adapter + ?Sized>(&mut self, adapter: &A) -> &TestSuiteStats {
        self.log
            .info(&format!("Running suite: {}", self.stats.suite_name));
        self.stats.suite_start_time = Instant::now();

        self.record(CHECKS[0], create_user_then_get_user(adapter).await);
        self.record(CHECKS[1], get_user_by_email(adapter).await);
        self.record(CHECKS[2], get_user_by_account(adapter).await);
        self.record(CHECKS[3], update_user(adapter).await);
        self.record(CHECKS[4], delete_user(adapter).await);
        self.record(CHECKS[5], link_and_unlink_account(adapter).await);
        self.record(CHECKS[6], session_lifecycle(adapter).await);
        self.record(
            CHECKS[7],
            create_verification_token_hides_storage_id(adapter).await,
        );
        self.record(CHECKS[8], use_verification_token_once(adapter).await);

        self.finalize_stats();
        &self.stats
    }

    fn record(&mut self, check: &str, result: CheckResult) {
        self.stats.check_count += 1;
        match result {
            Ok(()) => {
                self.stats.passed += 1;
                self.log.success(check);
            }
            Err(message) => {
                self.stats.failed += 1;
                self.log.error(&format!("✗ {check}: {message}"));
                self.failures.push(CheckFailure {
                    check: check.to_string(),
                    message,
                });
            }
        }
    }

    /// Failures recorded by the last run.
    pub fn failures(&self) -> &[CheckFailure] {
        &self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Finalize stats.
    pub fn finalize_stats(&mut self) {
        self.stats.suite_duration_ms = self.stats.suite_start_time.elapsed().as_secs_f64() * 1000.0;
    }

    /// Print a statistics summary.
    pub fn print_stats(&self) {
        let dash = "─".repeat(80);
        println!("\n{dash}");
        println!("TEST SUITE STATISTICS: {}", self.stats.suite_name);
        println!("{dash}");
        println!("  Checks: {}", self.stats.check_count);
        println!("  Passed: {}", self.stats.passed);
        println!("  Failed: {}", self.stats.failed);
        println!("  Suite Duration: {:.2}ms", self.stats.suite_duration_ms);

        for failure in &self.failures {
            println!("    ✗ {failure}");
        }

        println!("{dash}\n");
    }
}

// ─── Checks ─────────────────────────────────────────────────────────

type CheckResult = Result<(), String>;

fn step<T>(result: AdapterResult<T>, operation: &str) -> Result<T, String> {
    result.map_err(|e| format!("{operation} failed: {e}"))
}

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(format!($($arg)+));
        }
    };
}

async fn create_user_then_get_user<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let data = generate_test_user();
    let created = step(adapter.create_user(data.clone()).await, "create_user")?;
    ensure!(
        created.email == data.email && created.name == data.name,
        "create_user returned {created:?} for {data:?}"
    );

    let fetched = step(adapter.get_user(&created.id).await, "get_user")?;
    ensure!(
        fetched.as_ref() == Some(&created),
        "get_user returned {fetched:?}, expected {created:?}"
    );
    Ok(())
}

async fn get_user_by_email<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let unknown = generate_test_user().email;
    let missing = step(adapter.get_user_by_email(&unknown).await, "get_user_by_email")?;
    ensure!(missing.is_none(), "unknown email returned {missing:?}");

    let created = step(adapter.create_user(generate_test_user()).await, "create_user")?;
    let found = step(
        adapter.get_user_by_email(&created.email).await,
        "get_user_by_email",
    )?;
    ensure!(
        found.as_ref() == Some(&created),
        "get_user_by_email returned {found:?}, expected {created:?}"
    );
    Ok(())
}

async fn get_user_by_account<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let user = step(adapter.create_user(generate_test_user()).await, "create_user")?;
    let account = generate_test_account(&user.id);
    let key = account.key();

    let before = step(
        adapter.get_user_by_account(key.clone()).await,
        "get_user_by_account",
    )?;
    ensure!(before.is_none(), "unlinked account resolved to {before:?}");

    step(adapter.link_account(account).await, "link_account")?;
    let after = step(adapter.get_user_by_account(key).await, "get_user_by_account")?;
    ensure!(
        after.as_ref() == Some(&user),
        "get_user_by_account returned {after:?}, expected owner {user:?}"
    );
    Ok(())
}

async fn update_user<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let user = step(adapter.create_user(generate_test_user()).await, "create_user")?;

    let mut partial = PartialUser::new(&user.id);
    partial.name = Some(Some("renamed".to_string()));
    partial.image = Some(Some("https://example.com/avatar.png".to_string()));
    let updated = step(adapter.update_user(partial).await, "update_user")?;

    ensure!(
        updated.id == user.id && updated.email == user.email,
        "update_user touched fields it was not given: {updated:?}"
    );
    ensure!(
        updated.name.as_deref() == Some("renamed")
            && updated.image.as_deref() == Some("https://example.com/avatar.png"),
        "update_user did not apply changes: {updated:?}"
    );

    let fetched = step(adapter.get_user(&user.id).await, "get_user")?;
    ensure!(
        fetched.as_ref() == Some(&updated),
        "get_user after update returned {fetched:?}"
    );
    Ok(())
}

async fn delete_user<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let user = step(adapter.create_user(generate_test_user()).await, "create_user")?;
    let deleted = step(adapter.delete_user(&user.id).await, "delete_user")?;
    ensure!(deleted == user, "delete_user returned {deleted:?}, expected {user:?}");

    let fetched = step(adapter.get_user(&user.id).await, "get_user")?;
    ensure!(fetched.is_none(), "deleted user still found: {fetched:?}");
    Ok(())
}

async fn link_and_unlink_account<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let user = step(adapter.create_user(generate_test_user()).await, "create_user")?;
    let kept = generate_test_account(&user.id);
    let removed = generate_test_account(&user.id);

    let linked = step(adapter.link_account(removed.clone()).await, "link_account")?;
    ensure!(
        linked == removed,
        "link_account returned {linked:?}, expected {removed:?}"
    );
    step(adapter.link_account(kept.clone()).await, "link_account")?;

    let unlinked = step(adapter.unlink_account(removed.key()).await, "unlink_account")?;
    ensure!(
        unlinked == removed,
        "unlink_account returned {unlinked:?}, expected {removed:?}"
    );

    let gone = step(
        adapter.get_user_by_account(removed.key()).await,
        "get_user_by_account",
    )?;
    ensure!(gone.is_none(), "unlinked account still resolves to {gone:?}");

    let still = step(
        adapter.get_user_by_account(kept.key()).await,
        "get_user_by_account",
    )?;
    ensure!(
        still.as_ref() == Some(&user),
        "unlink_account removed the wrong account"
    );
    Ok(())
}

async fn session_lifecycle<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let unknown = generate_test_session("nobody").session_token;
    let missing = step(
        adapter.get_session_and_user(&unknown).await,
        "get_session_and_user",
    )?;
    ensure!(missing.is_none(), "unknown session token returned {missing:?}");

    let user = step(adapter.create_user(generate_test_user()).await, "create_user")?;
    let session = generate_test_session(&user.id);
    let created = step(adapter.create_session(session.clone()).await, "create_session")?;
    ensure!(
        created == session,
        "create_session returned {created:?}, expected {session:?}"
    );

    let pair = step(
        adapter.get_session_and_user(&session.session_token).await,
        "get_session_and_user",
    )?
    .ok_or_else(|| "get_session_and_user returned None for a live session".to_string())?;
    ensure!(pair.session == session, "session half was {:?}", pair.session);
    ensure!(pair.user == user, "user half was {:?}, expected {user:?}", pair.user);

    let expires = session.expires + TimeDelta::days(1);
    let updated = step(
        adapter
            .update_session(PartialSession::new(&session.session_token).with_expires(expires))
            .await,
        "update_session",
    )?;
    ensure!(
        updated.expires == expires && updated.user_id == user.id,
        "update_session returned {updated:?}"
    );

    let deleted = step(
        adapter.delete_session(&session.session_token).await,
        "delete_session",
    )?;
    ensure!(
        deleted == updated,
        "delete_session returned {deleted:?}, expected {updated:?}"
    );

    let after = step(
        adapter.get_session_and_user(&session.session_token).await,
        "get_session_and_user",
    )?;
    ensure!(after.is_none(), "deleted session still found: {after:?}");
    Ok(())
}

async fn create_verification_token_hides_storage_id<A: Adapter + ?Sized>(
    adapter: &A,
) -> CheckResult {
    let token = generate_test_verification_token();
    let created = step(
        adapter.create_verification_token(token.clone()).await,
        "create_verification_token",
    )?;
    ensure!(
        created == token,
        "create_verification_token returned {created:?}, expected {token:?}"
    );

    let json = serde_json::to_value(&created).map_err(|e| e.to_string())?;
    let fields: Vec<&str> = json
        .as_object()
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default();
    ensure!(
        !fields.contains(&"id") && fields.len() == 3,
        "created token exposes fields {fields:?}"
    );
    Ok(())
}

async fn use_verification_token_once<A: Adapter + ?Sized>(adapter: &A) -> CheckResult {
    let token = generate_test_verification_token();
    step(
        adapter.create_verification_token(token.clone()).await,
        "create_verification_token",
    )?;

    let first = step(
        adapter.use_verification_token(token.key()).await,
        "use_verification_token",
    )?;
    ensure!(
        first.as_ref() == Some(&token),
        "first use returned {first:?}, expected {token:?}"
    );

    let second = step(
        adapter.use_verification_token(token.key()).await,
        "use_verification_token",
    )?;
    ensure!(second.is_none(), "second use returned {second:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use authjs_adapter_core::{
        AdapterAccount, AdapterSession, AdapterUser, ClientError, IdentifierToken, NewUser,
        ProviderAccountId, SessionAndUser, VerificationToken,
    };

    /// An adapter whose store is always unreachable.
    #[derive(Debug)]
    struct UnreachableAdapter;

    fn down<T>() -> AdapterResult<T> {
        Err(ClientError::connection("store unreachable"))
    }

    #[async_trait]
    impl Adapter for UnreachableAdapter {
        async fn create_user(&self, _: NewUser) -> AdapterResult<AdapterUser> {
            down()
        }
        async fn get_user(&self, _: &str) -> AdapterResult<Option<AdapterUser>> {
            down()
        }
        async fn get_user_by_email(&self, _: &str) -> AdapterResult<Option<AdapterUser>> {
            down()
        }
        async fn get_user_by_account(
            &self,
            _: ProviderAccountId,
        ) -> AdapterResult<Option<AdapterUser>> {
            down()
        }
        async fn update_user(&self, _: PartialUser) -> AdapterResult<AdapterUser> {
            down()
        }
        async fn delete_user(&self, _: &str) -> AdapterResult<AdapterUser> {
            down()
        }
        async fn link_account(&self, _: AdapterAccount) -> AdapterResult<AdapterAccount> {
            down()
        }
        async fn unlink_account(&self, _: ProviderAccountId) -> AdapterResult<AdapterAccount> {
            down()
        }
        async fn get_session_and_user(&self, _: &str) -> AdapterResult<Option<SessionAndUser>> {
            down()
        }
        async fn create_session(&self, _: AdapterSession) -> AdapterResult<AdapterSession> {
            down()
        }
        async fn update_session(&self, _: PartialSession) -> AdapterResult<AdapterSession> {
            down()
        }
        async fn delete_session(&self, _: &str) -> AdapterResult<AdapterSession> {
            down()
        }
        async fn create_verification_token(
            &self,
            _: VerificationToken,
        ) -> AdapterResult<VerificationToken> {
            down()
        }
        async fn use_verification_token(
            &self,
            _: IdentifierToken,
        ) -> AdapterResult<Option<VerificationToken>> {
            down()
        }
    }

    #[test]
    fn test_suite_creation() {
        let suite = TestSuite::new("test-suite", "Test Adapter");
        assert_eq!(suite.stats.suite_name, "test-suite");
        assert_eq!(suite.stats.check_count, 0);
        assert!(suite.is_success());
    }

    #[test]
    fn test_suite_stats() {
        let mut suite = TestSuite::new("stats-test", "Test Adapter");
        suite.finalize_stats();
        assert!(suite.stats.suite_duration_ms >= 0.0);
    }

    #[test]
    fn test_check_failure_display() {
        let failure = CheckFailure {
            check: "delete_user".into(),
            message: "still found".into(),
        };
        assert_eq!(failure.to_string(), "delete_user: still found");
    }

    #[tokio::test]
    async fn test_every_check_fails_against_unreachable_store() {
        let mut suite = TestSuite::new("unreachable", "Unreachable Adapter");
        let stats = suite.run(&UnreachableAdapter).await.clone();

        assert_eq!(stats.check_count, CHECKS.len());
        assert_eq!(stats.passed, 0);
        assert_eq!(stats.failed, CHECKS.len());
        assert!(!suite.is_success());

        let names: Vec<&str> = suite.failures().iter().map(|f| f.check.as_str()).collect();
        assert_eq!(names, CHECKS);
        assert!(suite.failures()[0].message.contains("store unreachable"));
    }
}
