//! Remote-procedure contract consumed by the Kaizen dashboard stores.
//!
//! The dashboard never talks to the database directly. Everything it needs
//! from the backend goes through a PostgREST-style RPC endpoint; this crate
//! owns the wire types for those calls and a small HTTP client for them.

mod client;
mod config;
mod error;
mod notebook;

pub use client::RpcClient;
pub use config::RpcConfig;
pub use error::{ConfigError, RpcError};
pub use notebook::{NotebookCounts, NotebookRpc, NotebookSnapshot, ENSURE_DEFAULT_AND_COUNTS};
