//! Foundational error type for crates with no richer taxonomy of their own.
//!
//! `ConfigError` follows the shape every crate's own `{Domain}Error` uses: a
//! message plus the call site that raised it, captured automatically via
//! `#[track_caller]` so error logs point at the offending line without manual
//! annotation. Crates whose failures split into real categories (HTTP,
//! transport, session, chat) define their own `{Domain}ErrorKind` instead of
//! reaching for this one.

mod config;

pub use config::ConfigError;
