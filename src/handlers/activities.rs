use axum::{
    extract::State,
    response::{IntoResponse, Response, Json},
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde_json::json;
use tower_sessions::Session;
use crate::errors::{AppError, AppResult, LedgerError};
use crate::models::{ActivityNameRequest, ActivityRequest, AddTimeRequest, Ledger};
use crate::services::LedgerBackend;
use crate::AppState;

fn ledger_response(jar: CookieJar, ledger: &Ledger, message: String) -> Response {
    (
        jar,
        Json(json!({
            "sucesso": true,
            "atividades": ledger,
            "mensagem": message,
        })),
    )
        .into_response()
}

fn required(value: Option<String>, field: &'static str) -> Result<String, LedgerError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(LedgerError::MissingField(field))
}

pub async fn list_activities(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<Response> {
    let backend = LedgerBackend::from_session(&session).await?;
    let ledger = backend.read(&state, &jar)?;
    Ok(Json(ledger).into_response())
}

pub async fn add_time(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<AddTimeRequest>, AppError>,
) -> AppResult<Response> {
    let activity = required(request.atividade, "Activity")?;
    let hours = request.tempo_horas;

    if hours > state.config.ledger.max_increment_hours {
        tracing::warn!("Rejected {}h for {}: above the configured limit", hours, activity);
        return Err(LedgerError::InvalidHours(hours).into());
    }

    let backend = LedgerBackend::from_session(&session).await?;
    let (jar, ledger, total) = backend
        .apply(&state, jar, |ledger| ledger.add_time(&activity, hours))
        .await?;

    tracing::info!("Added {:.2}h to {} ({:.2}h total) for {:?}", hours, activity, total, backend);
    Ok(ledger_response(
        jar,
        &ledger,
        format!("Added {:.2}h to activity \"{}\"", hours, activity),
    ))
}

pub async fn create_activity(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<ActivityNameRequest>, AppError>,
) -> AppResult<Response> {
    let name = required(request.nome, "Activity name")?;

    let backend = LedgerBackend::from_session(&session).await?;
    let (jar, ledger, ()) = backend
        .apply(&state, jar, |ledger| ledger.create(&name))
        .await?;

    tracing::info!("Created activity {} for {:?}", name, backend);
    Ok(ledger_response(
        jar,
        &ledger,
        format!("Activity \"{}\" created", name),
    ))
}

pub async fn remove_activity(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<ActivityNameRequest>, AppError>,
) -> AppResult<Response> {
    let name = required(request.nome, "Activity name")?;

    let backend = LedgerBackend::from_session(&session).await?;
    let (jar, ledger, hours) = backend
        .apply(&state, jar, |ledger| ledger.remove(&name))
        .await?;

    tracing::info!("Removed activity {} ({:.2}h) for {:?}", name, hours, backend);
    Ok(ledger_response(
        jar,
        &ledger,
        format!("Activity \"{}\" removed", name),
    ))
}

pub async fn zero_all_activities(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<Response> {
    let backend = LedgerBackend::from_session(&session).await?;
    let (jar, ledger, ()) = backend
        .apply(&state, jar, |ledger| {
            ledger.zero_all();
            Ok(())
        })
        .await?;

    tracing::info!("Reset {} activities for {:?}", ledger.len(), backend);
    Ok(ledger_response(jar, &ledger, "All times reset".to_string()))
}

pub async fn zero_activity(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<ActivityRequest>, AppError>,
) -> AppResult<Response> {
    let activity = required(request.atividade, "Activity")?;

    let backend = LedgerBackend::from_session(&session).await?;
    let (jar, ledger, ()) = backend
        .apply(&state, jar, |ledger| ledger.zero(&activity))
        .await?;

    tracing::info!("Reset activity {} for {:?}", activity, backend);
    Ok(ledger_response(
        jar,
        &ledger,
        format!("Time reset for activity \"{}\"", activity),
    ))
}
