pub mod code_updater;
pub mod interaction_log;
pub mod redeploy;

pub use code_updater::CodeUpdater;
pub use interaction_log::{InteractionLog, LogError};
pub use redeploy::{RailwayRedeployTrigger, RedeployError, RedeployTrigger};
