//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `check` - Validate configuration and resolve the configured executables
//! - `login` - Run one authentication attempt
//! - `groups` - Look up roles for an already-trusted username
//! - `show` - Display information

mod check;
mod groups;
mod login;
mod show;

pub use check::cmd_check;
pub use groups::cmd_groups;
pub use login::cmd_login;
pub use show::cmd_show_config;
