//! Account pages: registration, login, logout, home and dashboard

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};

use crate::api::session::{commit_session, expired_session_cookie, SessionContext};
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::account::{
    AccountOutcome, AccountResponse, LoginForm, RegistrationForm, View, ViewName, HOME_PATH,
    LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH,
};
use crate::domain::session::SessionToken;

pub fn create_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard))
        .route(REGISTER_PATH, get(show_register).post(register))
        .route(LOGIN_PATH, get(show_login).post(authenticate))
        .route(LOGOUT_PATH, post(logout))
}

/// GET /auth/register
pub async fn show_register(
    State(state): State<AppState>,
    context: SessionContext,
) -> Result<Response, ApiError> {
    let response = if context.session.is_authenticated() {
        Redirect::to(HOME_PATH).into_response()
    } else {
        render(&state, &View::new(ViewName::Register))
    };

    clear_stale_cookie(&state, context.stale, response)
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    context: SessionContext,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, ApiError> {
    let SessionContext {
        session,
        token,
        stale,
    } = context;
    let outcome = state.account_service.register(form, session).await?;

    respond(&state, token.as_ref(), stale, outcome).await
}

/// GET /auth/login
pub async fn show_login(
    State(state): State<AppState>,
    context: SessionContext,
) -> Result<Response, ApiError> {
    let response = if context.session.is_authenticated() {
        Redirect::to(HOME_PATH).into_response()
    } else {
        render(&state, &View::new(ViewName::Login))
    };

    clear_stale_cookie(&state, context.stale, response)
}

/// POST /auth/login
pub async fn authenticate(
    State(state): State<AppState>,
    context: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let SessionContext {
        session,
        token,
        stale,
    } = context;
    let outcome = state.account_service.authenticate(form, session).await?;

    respond(&state, token.as_ref(), stale, outcome).await
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    context: SessionContext,
) -> Result<Response, ApiError> {
    let SessionContext {
        session,
        token,
        stale,
    } = context;
    let outcome = state.account_service.logout(session);

    respond(&state, token.as_ref(), stale, outcome).await
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    context: SessionContext,
) -> Result<Response, ApiError> {
    let view = View::new(ViewName::Home).with_current_user(context.session.user().cloned());

    clear_stale_cookie(&state, context.stale, render(&state, &view))
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    context: SessionContext,
) -> Result<Response, ApiError> {
    let response = match context.session.user().cloned() {
        Some(user) => render(
            &state,
            &View::new(ViewName::Dashboard).with_current_user(Some(user)),
        ),
        None => Redirect::to(LOGIN_PATH).into_response(),
    };

    clear_stale_cookie(&state, context.stale, response)
}

fn render(state: &AppState, view: &View) -> Response {
    Html(state.views.render(view)).into_response()
}

/// Expire a cookie that names no live session
fn clear_stale_cookie(
    state: &AppState,
    stale: bool,
    mut response: Response,
) -> Result<Response, ApiError> {
    if stale {
        let cookie = expired_session_cookie(&state.session_config)?;
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

/// Commit the session, then redirect or re-render
async fn respond(
    state: &AppState,
    token: Option<&SessionToken>,
    stale: bool,
    outcome: AccountOutcome,
) -> Result<Response, ApiError> {
    let cookie = commit_session(state, token, stale, &outcome.session).await?;

    let mut response = match &outcome.response {
        AccountResponse::Redirect(path) => Redirect::to(path).into_response(),
        AccountResponse::Rerender(view) => render(state, view),
    };

    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}
