//! Placeholder action handlers.
//!
//! Each handler reads only its argument mapping, fills in defaults for missing
//! keys and returns a [`CommandResult`]. None of them touch shared state.

use serde_json::Value;

use crate::types::{Arguments, CommandResult};

const DEFAULT_BASE_NAME: &str = "Default Base";
const DEFAULT_BASE_FIELDS: [&str; 3] = ["Name", "Email", "Status"];
const DEFAULT_SUBJECT: &str = "(no subject)";
const DEFAULT_BLOG_NAME: &str = "New Blog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateCrmRecord,
    SendEmail,
    LaunchBlog,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateCrmRecord => "create_airtable_base",
            Action::SendEmail => "send_email",
            Action::LaunchBlog => "launch_blog",
        }
    }

    /// Run the handler against structured arguments.
    pub fn execute(&self, args: &Arguments) -> CommandResult {
        match self {
            Action::CreateCrmRecord => create_airtable_base(args),
            Action::SendEmail => send_email(args),
            Action::LaunchBlog => launch_blog(args),
        }
    }

    /// Fixed acknowledgement used when the action was selected from free text.
    pub fn acknowledge(&self) -> CommandResult {
        CommandResult::succeeded(match self {
            Action::CreateCrmRecord => "CRM created successfully.",
            Action::SendEmail => "Email sent successfully.",
            Action::LaunchBlog => "Blog launched successfully.",
        })
    }
}

/// Render an argument for a status line. Strings are shown bare, everything
/// else as JSON text.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `None` only when the key is absent or null; blank strings are kept.
fn string_arg(args: &Arguments, key: &str) -> Option<String> {
    args.get(key).filter(|v| !v.is_null()).map(render)
}

pub fn create_airtable_base(args: &Arguments) -> CommandResult {
    let name = string_arg(args, "name").unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());
    let fields: Vec<String> = match args.get("fields") {
        Some(Value::Array(items)) => items.iter().map(render).collect(),
        Some(Value::Null) | None => DEFAULT_BASE_FIELDS
            .iter()
            .map(|f| f.to_string())
            .collect(),
        Some(other) => vec![render(other)],
    };
    CommandResult::succeeded(format!(
        "Created Airtable base '{}' with fields [{}]",
        name,
        fields.join(", ")
    ))
}

pub fn send_email(args: &Arguments) -> CommandResult {
    let Some(to) = string_arg(args, "to").filter(|to| !to.trim().is_empty()) else {
        return CommandResult::failed("Cannot send email: missing recipient");
    };
    let subject = string_arg(args, "subject").unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
    CommandResult::succeeded(format!("Sent email to {} with subject '{}'", to, subject))
}

pub fn launch_blog(args: &Arguments) -> CommandResult {
    let name = string_arg(args, "name").unwrap_or_else(|| DEFAULT_BLOG_NAME.to_string());
    CommandResult::succeeded(format!("Launched blog site: {}", name))
}
