//! Command implementations for the `dirsnap` binary.

/// `dirsnap config`
pub mod config;
/// `dirsnap list`
pub mod list;
/// `dirsnap watch`
pub mod watch;
