//! Form intents: which operation a submitted form asks for.
//!
//! # Design
//! Browsers submit the operation in a single `intent` field whose value
//! packs the operation and target id together (`delete-12`, `edit--1` for
//! "stop editing"). `Intent` is the tagged form of the same thing. Both the
//! packed field and the two-field form (`op` + `target`) parse into it, so
//! handlers only ever match on the enum.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::TodoId;

/// Target id that the packed encoding uses for "no todo".
pub const NO_TARGET: TodoId = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Add,
    Delete(TodoId),
    Edit(TodoId),
    CancelEdit,
    Update(TodoId),
    Toggle(TodoId),
    Color,
    SignIn,
    SignUp,
    SignOut,
    Forgot,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("unknown intent `{0}`")]
    Unknown(String),

    #[error("intent `{op}` needs a todo id, got `{target}`")]
    BadTarget { op: String, target: String },
}

impl Intent {
    /// Parse the tagged two-field form: an operation name plus an optional
    /// target id.
    pub fn from_parts(op: &str, target: Option<&str>) -> Result<Self, IntentError> {
        let op = op.trim();
        let target = target.map(str::trim).filter(|t| !t.is_empty());
        let id = || parse_target(op, target.unwrap_or_default());

        match op {
            "add" => Ok(Intent::Add),
            "color" => Ok(Intent::Color),
            "sign-in" => Ok(Intent::SignIn),
            "sign-up" => Ok(Intent::SignUp),
            "sign-out" => Ok(Intent::SignOut),
            "forgot" => Ok(Intent::Forgot),
            "cancel" => Ok(Intent::CancelEdit),
            "delete" => id().map(Intent::Delete),
            "update" => id().map(Intent::Update),
            "toggle" => id().map(Intent::Toggle),
            "edit" => match id()? {
                NO_TARGET => Ok(Intent::CancelEdit),
                id => Ok(Intent::Edit(id)),
            },
            other => Err(IntentError::Unknown(other.to_string())),
        }
    }

    /// Operation name used by the two-field form.
    pub fn op(&self) -> &'static str {
        match self {
            Intent::Add => "add",
            Intent::Delete(_) => "delete",
            Intent::Edit(_) => "edit",
            Intent::CancelEdit => "cancel",
            Intent::Update(_) => "update",
            Intent::Toggle(_) => "toggle",
            Intent::Color => "color",
            Intent::SignIn => "sign-in",
            Intent::SignUp => "sign-up",
            Intent::SignOut => "sign-out",
            Intent::Forgot => "forgot",
        }
    }

    pub fn target(&self) -> Option<TodoId> {
        match *self {
            Intent::Delete(id) | Intent::Edit(id) | Intent::Update(id) | Intent::Toggle(id) => {
                Some(id)
            }
            _ => None,
        }
    }
}

impl FromStr for Intent {
    type Err = IntentError;

    /// Parse the packed `intent` field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        for op in ["delete", "edit", "update", "toggle"] {
            if let Some(target) = s.strip_prefix(op).and_then(|rest| rest.strip_prefix('-')) {
                return Intent::from_parts(op, Some(target));
            }
        }
        match s {
            "delete" | "edit" | "update" | "toggle" => Err(IntentError::BadTarget {
                op: s.to_string(),
                target: String::new(),
            }),
            "cancel" => Err(IntentError::Unknown(s.to_string())),
            _ => Intent::from_parts(s, None),
        }
    }
}

impl fmt::Display for Intent {
    /// Render the packed encoding, e.g. `delete-12` or `edit--1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::CancelEdit => write!(f, "edit-{NO_TARGET}"),
            other => match other.target() {
                Some(id) => write!(f, "{}-{id}", other.op()),
                None => f.write_str(other.op()),
            },
        }
    }
}

fn parse_target(op: &str, target: &str) -> Result<TodoId, IntentError> {
    let bad = || IntentError::BadTarget {
        op: op.to_string(),
        target: target.to_string(),
    };
    let id: TodoId = target.parse().map_err(|_| bad())?;
    if id < 0 && !(op == "edit" && id == NO_TARGET) {
        return Err(bad());
    }
    Ok(id)
}
