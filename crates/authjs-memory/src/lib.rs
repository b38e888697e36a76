// authjs-memory — In-memory data client for authjs adapters.
//
// Stores users, accounts, sessions and verification tokens in process memory
// behind a single lock. Suitable for tests and development; nothing survives
// a restart.

pub mod client;

pub use client::{MemoryClient, MemoryClientOptions};
