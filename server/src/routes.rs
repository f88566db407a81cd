//! Page loaders and form actions.
//!
//! Loaders answer `GET` with the data their page shows. Actions take the
//! submitted form, pick the operation from its intent and either redirect
//! (303) or answer with `ActionData` to stay on the page.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use todo_core::{
    auth, sign_in, sort_by_text, Intent, IntentError, SessionData, Todo, TodoError, TodoId,
    TodoPatch,
};
use tracing::{info, warn};

use crate::error::{ActionData, AppError};
use crate::session::{self, now_secs};
use crate::state::AppState;

type ActionResult = Result<Response, AppError>;

/// Every field any page form may submit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionForm {
    pub intent: Option<String>,
    pub op: Option<String>,
    pub target: Option<String>,
    pub text: Option<String>,
    pub update_text: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub color: Option<String>,
}

impl ActionForm {
    /// The tagged `op`/`target` pair wins over the packed `intent` field.
    /// `Ok(None)` means nothing recognisable was asked for.
    fn intent(&self) -> Result<Option<Intent>, IntentError> {
        let parsed = match (&self.op, &self.intent) {
            (Some(op), _) => Intent::from_parts(op, self.target.as_deref()),
            (None, Some(intent)) => intent.parse(),
            (None, None) => return Ok(None),
        };
        match parsed {
            Ok(intent) => Ok(Some(intent)),
            Err(IntentError::Unknown(name)) => {
                warn!("ignoring unknown intent `{name}`");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomeData {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodosData {
    pub username: String,
    pub edit_id: TodoId,
    pub todos: Vec<Todo>,
}

fn stay() -> ActionResult {
    Ok(Json(ActionData::default()).into_response())
}

fn form_error(message: &str) -> ActionResult {
    Ok(Json(ActionData::form_error(message)).into_response())
}

/// Commit `session` and redirect to `to`.
fn redirect(
    state: &AppState,
    jar: SignedCookieJar,
    session: SessionData,
    to: &str,
) -> ActionResult {
    let jar = session::commit(jar, session, state.session_settings(), now_secs())?;
    Ok((jar, Redirect::to(to)).into_response())
}

fn sign_out(state: &AppState, jar: SignedCookieJar, mut session: SessionData) -> ActionResult {
    info!(user = session.current_user(), "signing out");
    session.sign_out();
    redirect(state, jar, session, "/login")
}

pub async fn home_loader(jar: SignedCookieJar) -> Json<HomeData> {
    let session = session::load(&jar, now_secs());
    Json(HomeData {
        username: session.current_user().to_string(),
        color: session.color,
    })
}

pub async fn root_action(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ActionForm>,
) -> ActionResult {
    let mut session = session::load(&jar, now_secs());
    match form.intent()? {
        Some(Intent::SignOut) => sign_out(&state, jar, session),
        Some(Intent::Color) => {
            session.color = form
                .color
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            redirect(&state, jar, session, "/")
        }
        _ => stay(),
    }
}

pub async fn login_loader(State(state): State<AppState>, jar: SignedCookieJar) -> ActionResult {
    let mut session = session::load(&jar, now_secs());
    if !session.is_anonymous() {
        return Ok(Redirect::to("/").into_response());
    }
    let error = session.take_error();
    let jar = session::commit(jar, session, state.session_settings(), now_secs())?;
    Ok((jar, Json(LoginData { error })).into_response())
}

pub async fn login_action(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ActionForm>,
) -> ActionResult {
    let mut session = session::load(&jar, now_secs());
    match form.intent()? {
        Some(Intent::SignIn) => {
            let username = sign_in(
                form.username.as_deref(),
                form.password.as_deref(),
                &state.config.credentials,
            )
            .inspect_err(|e| info!("sign in refused: {e}"))?;
            info!(user = %username, "signed in");
            session.sign_in(username);
            redirect(&state, jar, session, "/")
        }
        Some(Intent::SignUp) => form_error(auth::SIGN_UP_NOT_IMPLEMENTED),
        Some(Intent::Forgot) => form_error(auth::FORGOT_NOT_IMPLEMENTED),
        Some(Intent::SignOut) => sign_out(&state, jar, session),
        _ => stay(),
    }
}

pub async fn todos_loader(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<TodosData>, AppError> {
    let session = session::load(&jar, now_secs());
    let mut todos = state.store.list().await?;
    sort_by_text(&mut todos);

    let edit_id = match session.edit_id {
        Some(id) if todos.iter().any(|t| t.id == id) => id,
        _ => todo_core::intent::NO_TARGET,
    };
    Ok(Json(TodosData {
        username: session.username,
        edit_id,
        todos,
    }))
}

pub async fn todos_action(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ActionForm>,
) -> ActionResult {
    let mut session = session::load(&jar, now_secs());
    let Some(intent) = form.intent()? else {
        return stay();
    };

    match intent {
        Intent::Add => {
            let todo = state.store.create(form.text.as_deref()).await?;
            info!(id = todo.id, "todo added");
        }
        Intent::Delete(id) => {
            state.store.delete(id).await?;
            if session.is_editing(id) {
                session.stop_edit();
            }
            info!(id, "todo deleted");
        }
        Intent::Edit(id) => {
            state
                .store
                .get(id)
                .await?
                .ok_or(TodoError::NotFound(id))?;
            session.start_edit(id);
        }
        Intent::CancelEdit => session.stop_edit(),
        Intent::Update(id) => {
            let patch = TodoPatch::text(form.update_text.unwrap_or_default());
            state.store.update(id, patch).await?;
            session.stop_edit();
            info!(id, "todo updated");
        }
        Intent::Toggle(id) => {
            let todo = state.store.toggle_done(id).await?;
            info!(id, done = todo.done, "todo toggled");
        }
        Intent::SignOut => return sign_out(&state, jar, session),
        Intent::Color | Intent::SignIn | Intent::SignUp | Intent::Forgot => return stay(),
    }

    redirect(&state, jar, session, "/todos")
}
