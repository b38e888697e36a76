// authjs-prisma — Prisma adapter for authjs.
//
// Wraps any client that exposes Prisma's `user`, `account`, `session` and
// `verificationToken` delegates (the `DataClient` contract) and presents it
// as an authjs storage `Adapter`.

pub mod adapter;

pub use adapter::{PrismaAdapter, PrismaAdapterConfig};
