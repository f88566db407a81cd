use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use todo_core::{auth, FieldErrors, IntentError, SignInError, TodoError};
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error("sign in failed: {0}")]
    SignIn(#[from] SignInError),

    #[error("storage failure: {0}")]
    Store(StoreError),

    #[error("session encoding failed: {0}")]
    Session(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Todo(err) => AppError::Todo(err),
            other => AppError::Store(other),
        }
    }
}

/// Body returned by actions that stay on the page.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

impl ActionData {
    pub fn form_error(message: impl Into<String>) -> Self {
        Self {
            form_error: Some(message.into()),
            ..Default::default()
        }
    }

    fn with_fields(message: impl Into<String>, fields: FieldErrors) -> Self {
        let field_errors = [("username", fields.username), ("password", fields.password)]
            .into_iter()
            .filter_map(|(field, message)| message.map(|m| (field.to_string(), m)))
            .collect();
        Self {
            form_error: Some(message.into()),
            field_errors,
        }
    }
}

#[derive(Serialize)]
struct Message {
    message: String,
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(Message {
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Todo(TodoError::Validation { field, message }) => {
                let data = ActionData {
                    form_error: Some(message.clone()),
                    field_errors: BTreeMap::from([(field, message)]),
                };
                (StatusCode::BAD_REQUEST, Json(data)).into_response()
            }
            AppError::Todo(err @ TodoError::NotFound(_)) => {
                message(StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::Intent(err) => message(StatusCode::BAD_REQUEST, err.to_string()),
            AppError::SignIn(SignInError::Invalid(fields)) => (
                StatusCode::BAD_REQUEST,
                Json(ActionData::with_fields(auth::INVALID_SIGN_IN_DATA, fields)),
            )
                .into_response(),
            AppError::SignIn(SignInError::Rejected) => (
                StatusCode::UNAUTHORIZED,
                Json(ActionData::form_error(auth::INVALID_CREDENTIALS)),
            )
                .into_response(),
            err @ (AppError::Todo(TodoError::IdsExhausted)
            | AppError::Store(_)
            | AppError::Session(_)) => {
                error!("request failed: {err}");
                message(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}
