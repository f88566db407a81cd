//! Sign-in form validation and credential check.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum length for both username and password.
pub const MIN_CREDENTIAL_LEN: usize = 8;

pub const INVALID_SIGN_IN_DATA: &str = "Invalid sign in data.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const SIGN_UP_NOT_IMPLEMENTED: &str = "Sign up is not implemented yet.";
pub const FORGOT_NOT_IMPLEMENTED: &str = "Forgot is not implemented yet.";

/// The single accepted username/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "username".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Per-field messages shown next to the login inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignInError {
    /// One or both fields too short; credentials were not checked.
    #[error("invalid sign in data")]
    Invalid(FieldErrors),

    /// Authentication failure: fields well-formed, pair does not match.
    #[error("invalid username or password")]
    Rejected,
}

impl SignInError {
    pub fn form_error(&self) -> &'static str {
        match self {
            SignInError::Invalid(_) => INVALID_SIGN_IN_DATA,
            SignInError::Rejected => INVALID_CREDENTIALS,
        }
    }
}

pub fn validate_username(username: &str) -> Option<String> {
    (username.chars().count() < MIN_CREDENTIAL_LEN)
        .then(|| "Username must be at least eight characters.".to_string())
}

pub fn validate_password(password: &str) -> Option<String> {
    (password.chars().count() < MIN_CREDENTIAL_LEN)
        .then(|| "Password must be at least eight characters.".to_string())
}

/// Validate the submitted fields, then compare them to `credentials`.
///
/// Returns the username to store in the session on success.
pub fn sign_in(
    username: Option<&str>,
    password: Option<&str>,
    credentials: &Credentials,
) -> Result<String, SignInError> {
    let username = username.unwrap_or_default();
    let password = password.unwrap_or_default();

    let errors = FieldErrors {
        username: validate_username(username),
        password: validate_password(password),
    };
    if !errors.is_empty() {
        return Err(SignInError::Invalid(errors));
    }

    if username != credentials.username || password != credentials.password {
        return Err(SignInError::Rejected);
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_credentials_sign_in() {
        let user = sign_in(Some("username"), Some("password"), &Credentials::default()).unwrap();
        assert_eq!(user, "username");
    }

    #[test]
    fn wrong_pair_is_rejected() {
        let credentials = Credentials::default();
        let err = sign_in(Some("username"), Some("password1"), &credentials).unwrap_err();
        assert_eq!(err, SignInError::Rejected);
        assert_eq!(err.form_error(), INVALID_CREDENTIALS);
    }

    #[test]
    fn short_fields_fail_before_credential_check() {
        let credentials = Credentials {
            username: "short".to_string(),
            password: "tiny".to_string(),
        };
        let err = sign_in(Some("short"), Some("tiny"), &credentials).unwrap_err();
        let SignInError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.username.is_some());
        assert!(errors.password.is_some());
    }

    #[test]
    fn only_short_field_is_reported() {
        let err = sign_in(Some("username"), Some("pw"), &Credentials::default()).unwrap_err();
        assert_eq!(err.form_error(), INVALID_SIGN_IN_DATA);
        let SignInError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.username.is_none());
        assert_eq!(errors.password.as_deref(), Some("Password must be at least eight characters."));
    }

    #[test]
    fn missing_fields_count_as_empty() {
        assert!(matches!(
            sign_in(None, None, &Credentials::default()),
            Err(SignInError::Invalid(_))
        ));
    }
}
