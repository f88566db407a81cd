//! Domain core for the todos & login service.
//!
//! # Overview
//! Everything here is pure: no sockets, no files, no clock. Callers pass in
//! the current time where it matters and persist the results themselves,
//! which keeps these rules deterministic and shared by every storage
//! backend.
//!
//! # Design
//! - `TodoList` owns the CRUD rules (validation, id assignment, not-found).
//! - `Intent` turns a submitted form into a tagged operation.
//! - `auth::sign_in` validates the login form and checks the credential pair.
//! - `SessionData` is the cookie payload, including the per-visitor edit
//!   cursor.

pub mod auth;
pub mod error;
pub mod intent;
pub mod list;
pub mod session;
pub mod types;

pub use auth::{sign_in, Credentials, FieldErrors, SignInError};
pub use error::TodoError;
pub use intent::{Intent, IntentError};
pub use list::TodoList;
pub use session::SessionData;
pub use types::{sort_by_text, validate_text, Todo, TodoId, TodoPatch};
