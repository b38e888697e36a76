// authjs-test-utils — adapter testing infrastructure.
//
// - `TestSuite` runs the adapter conformance checks against any `Adapter`
// - Model generators for user, account, session and verification token
// - Statistics tracking and reporting

pub mod generators;
pub mod test_suite;

pub use generators::{
    generate_test_account, generate_test_session, generate_test_user,
    generate_test_verification_token,
};
pub use test_suite::{CheckFailure, TestLogger, TestSuite, TestSuiteStats};
