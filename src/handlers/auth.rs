use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use tower_sessions::Session;
use crate::errors::{AppResult, CredentialError};
use crate::models::{AuthQuery, LoginForm, RegisterForm};
use crate::services::USER_SESSION_KEY;
use crate::AppState;
use super::templates::{load_template, render_feedback, safe_next};

fn redirect_with(path: &str, key: &str, msg: &str) -> Response {
    Redirect::to(&format!("{}?{}={}", path, key, urlencoding::encode(msg))).into_response()
}

pub async fn serve_login_page(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> AppResult<Response> {
    let next = safe_next(query.next.as_deref()).unwrap_or("");
    let html = load_template(&state.config, "login.html")?
        .replace("{{feedback}}", &render_feedback(&query))
        .replace("{{next}}", &urlencoding::encode(next));
    Ok(Html(html).into_response())
}

pub async fn serve_register_page(
    State(state): State<AppState>,
    Query(query): Query<AuthQuery>,
) -> AppResult<Response> {
    let html = load_template(&state.config, "register.html")?
        .replace("{{feedback}}", &render_feedback(&query));
    Ok(Html(html).into_response())
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AuthQuery>,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Login attempt for user: {}", login_form.username);

    if !state
        .credentials
        .verify(&login_form.username, &login_form.password)
        .await? {
        tracing::info!("Rejected login for user: {}", login_form.username);
        return Ok(redirect_with("/login", "error", "Incorrect username or password."));
    }

    session.insert(USER_SESSION_KEY, login_form.username.clone()).await?;
    tracing::info!("User logged in: {}", login_form.username);

    let target = safe_next(query.next.as_deref()).unwrap_or("/");
    Ok(Redirect::to(target).into_response())
}

pub async fn handle_register(
    State(state): State<AppState>,
    Form(register_form): Form<RegisterForm>,
) -> AppResult<Response> {
    if register_form.password != register_form.confirm_password {
        return Ok(redirect_with("/register", "error", "Passwords don't match."));
    }

    match state
        .credentials
        .register(&register_form.username, &register_form.password)
        .await
    {
        Ok(_) => Ok(redirect_with("/login", "message", "Account created! Please log in.")),
        Err(CredentialError::DuplicateUser(_)) => {
            Ok(redirect_with("/register", "error", "Username already taken."))
        }
        Err(CredentialError::InvalidUsername(name)) => {
            tracing::debug!("Rejected username: {:?}", name);
            Ok(redirect_with(
                "/register",
                "error",
                "Usernames may only contain letters, digits, '.', '-' and '_' (max 32).",
            ))
        }
        Err(CredentialError::EmptyPassword) => {
            Ok(redirect_with("/register", "error", "Password must not be empty."))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn handle_logout(
    session: Session,
) -> AppResult<Response> {
    if let Some(username) = session.remove::<String>(USER_SESSION_KEY).await? {
        tracing::info!("User logged out: {}", username);
    }
    Ok(redirect_with("/login", "message", "Logged out."))
}
