use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response, Redirect, Json},
    http::StatusCode,
};
use serde_json::json;
use urlencoding;
use crate::errors::{
    AppError,
    credential::CredentialError,
    ledger::LedgerError,
};

// Converts AppError into the HTTP response the client sees.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors send the user back to the login page
            AppError::Auth(msg) => {
                Redirect::to(&format!("/login?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            AppError::Ledger(err) => convert_ledger_error(err),

            AppError::Credential(err) => convert_credential_error(err),

            AppError::File(e) => {
                tracing::error!("File error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("File error: {}", e)
                ).into_response()
            }

            AppError::Json(e) => {
                tracing::error!("Malformed JSON document: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("JSON error: {}", e)
                ).into_response()
            }

            AppError::Chart(msg) => {
                tracing::error!("Chart rendering failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Chart error: {}", msg)
                ).into_response()
            }

            AppError::Session(e) => {
                tracing::error!("Session error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Session error: {}", e)
                ).into_response()
            }

            AppError::Body(rejection) => convert_body_rejection(rejection),

            AppError::Task(e) => {
                tracing::error!("Background task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Background task failed: {}", e)
                ).into_response()
            }
        }
    }
}

// Ledger errors are reported to the API client as {"erro": ...}
fn convert_ledger_error(err: LedgerError) -> Response {
    let status = match err {
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::MissingField(_)
        | LedgerError::AlreadyExists(_)
        | LedgerError::InvalidHours(_)
        | LedgerError::CookieTooLarge(_) => StatusCode::BAD_REQUEST,
    };

    (status, Json(json!({ "erro": err.to_string() }))).into_response()
}

// Unreadable API bodies get the same {"erro": ...} shape as ledger errors
fn convert_body_rejection(rejection: JsonRejection) -> Response {
    let status = match rejection {
        JsonRejection::BytesRejection(_) => rejection.status(),
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::debug!("Rejected request body: {}", rejection.body_text());

    (status, Json(json!({ "erro": rejection.body_text() }))).into_response()
}

fn convert_credential_error(err: CredentialError) -> Response {
    match err {
        CredentialError::DuplicateUser(_)
        | CredentialError::InvalidUsername(_)
        | CredentialError::EmptyPassword => (
            StatusCode::BAD_REQUEST,
            err.to_string()
        ).into_response(),

        _ => {
            tracing::error!("Credential store error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Credential store error: {}", err)
            ).into_response()
        }
    }
}
