//! Scriptrealm library exports.
//!
//! Authenticates users by delegating the credential check to an
//! operator-supplied command: a login succeeds iff the command, run with the
//! candidate username and password injected into its environment, exits
//! zero. The binary and the integration tests both build on these modules.

pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod process;
pub mod realm;
pub mod resolver;
pub mod tokenizer;
