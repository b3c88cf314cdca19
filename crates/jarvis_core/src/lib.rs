pub mod actions;
pub mod config;
pub mod dispatcher;
pub mod types;

pub use actions::Action;
pub use config::{Config, ConfigError};
pub use dispatcher::{CommandRouter, Dispatcher, MatchMode};
pub use types::{Arguments, CommandRequest, CommandResult, LogEntry, Outcome, Selector};
