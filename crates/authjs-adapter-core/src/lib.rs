//! Storage contract for authjs adapters.
//!
//! - [`db::Adapter`]: the operations the authentication framework calls.
//! - [`db::DataClient`]: the record collections an adapter delegates to.
//! - [`error::ClientError`]: typed failures shared by both sides.

pub mod db;
pub mod env;
pub mod error;
pub mod utils;

// Re-exports for convenience
pub use db::adapter::{Adapter, AdapterResult};
pub use db::client::DataClient;
pub use db::models::{
    AccountType, AdapterAccount, AdapterSession, AdapterUser, IdentifierToken, NewUser,
    PartialSession, PartialUser, ProviderAccountId, SessionAndUser, VerificationToken,
};
pub use error::{ClientError, ClientErrorKind, ClientResult};
