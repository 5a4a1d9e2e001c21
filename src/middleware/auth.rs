use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::Request,
    body::Body,
};
use tower_sessions::Session;
use crate::services::USER_SESSION_KEY;

// Everything else works for anonymous visitors too, backed by the cookie ledger
const PROTECTED_PATHS: &[&str] = &["/logout"];

pub async fn require_auth(
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if !PROTECTED_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    match session.get::<String>(USER_SESSION_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) => {
            tracing::debug!("Anonymous request to {}, redirecting to login", path);
            let message = urlencoding::encode("Please log in to access this page.");
            Redirect::to(&format!(
                "/login?error={}&next={}",
                message,
                urlencoding::encode(&path)
            ))
            .into_response()
        }
        Err(e) => {
            tracing::error!("Session error: {}", e);
            Redirect::to("/login").into_response()
        }
    }
}
