pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{Adapter, AdapterResult};
pub use client::DataClient;
pub use models::{
    AccountType, AdapterAccount, AdapterSession, AdapterUser, IdentifierToken, NewUser,
    PartialSession, PartialUser, ProviderAccountId, SessionAndUser, VerificationToken,
};
