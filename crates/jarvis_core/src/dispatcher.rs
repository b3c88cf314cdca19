//! Maps a selector to exactly one action, or to an "unknown" result.
//!
//! Routes are an ordered list and the first match wins. For free-text
//! commands this means a message containing two trigger phrases always goes
//! to whichever trigger is listed first.

use crate::actions::Action;
use crate::types::{Arguments, CommandRequest, CommandResult, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Selector must equal the trigger exactly.
    Exact,
    /// Trigger must appear anywhere in the selector, ignoring case.
    Contains,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub trigger: &'static str,
    pub action: Action,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: MatchMode,
    routes: Vec<Route>,
}

impl Dispatcher {
    pub fn new(mode: MatchMode, routes: Vec<Route>) -> Self {
        Self { mode, routes }
    }

    /// Structured intents: `create_airtable_base`, `send_email`, `launch_blog`.
    pub fn intents() -> Self {
        Self::new(
            MatchMode::Exact,
            vec![
                Route {
                    trigger: "create_airtable_base",
                    action: Action::CreateCrmRecord,
                },
                Route {
                    trigger: "send_email",
                    action: Action::SendEmail,
                },
                Route {
                    trigger: "launch_blog",
                    action: Action::LaunchBlog,
                },
            ],
        )
    }

    /// Free-text commands matched by phrase.
    pub fn commands() -> Self {
        Self::new(
            MatchMode::Contains,
            vec![
                Route {
                    trigger: "create crm",
                    action: Action::CreateCrmRecord,
                },
                Route {
                    trigger: "send email",
                    action: Action::SendEmail,
                },
                Route {
                    trigger: "launch blog",
                    action: Action::LaunchBlog,
                },
            ],
        )
    }

    pub fn route(&self, selector: &str) -> Option<Action> {
        let lowered;
        let haystack = match self.mode {
            MatchMode::Exact => selector,
            MatchMode::Contains => {
                lowered = selector.to_lowercase();
                lowered.as_str()
            }
        };

        self.routes
            .iter()
            .find(|route| match self.mode {
                MatchMode::Exact => route.trigger == haystack,
                MatchMode::Contains => haystack.contains(route.trigger),
            })
            .map(|route| route.action)
    }

    /// Never fails: an unmatched selector is reported as an `unknown` result.
    pub fn dispatch(&self, selector: &str, args: &Arguments) -> CommandResult {
        match self.route(selector) {
            Some(action) => {
                tracing::debug!(selector, action = action.name(), "dispatching");
                match self.mode {
                    MatchMode::Exact => action.execute(args),
                    MatchMode::Contains => action.acknowledge(),
                }
            }
            None => {
                tracing::debug!(selector, "no route matched");
                CommandResult::unknown(match self.mode {
                    MatchMode::Exact => format!("Unknown intent: {}", selector),
                    MatchMode::Contains => format!("Unknown command: {}", selector),
                })
            }
        }
    }
}

/// The intent and command tables side by side, so a parsed request can be
/// routed to whichever one its selector names.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    pub intents: Dispatcher,
    pub commands: Dispatcher,
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self {
            intents: Dispatcher::intents(),
            commands: Dispatcher::commands(),
        }
    }
}

impl CommandRouter {
    pub fn dispatch_request(&self, request: &CommandRequest) -> CommandResult {
        match &request.selector {
            Selector::Intent(name) => self.intents.dispatch(name, &request.args),
            Selector::Command(text) => self.commands.dispatch(text, &request.args),
        }
    }
}
