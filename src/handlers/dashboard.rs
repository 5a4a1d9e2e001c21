use axum::{
    extract::State,
    response::{Html, IntoResponse, Response, Json},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tower_sessions::Session;
use crate::errors::AppResult;
use crate::models::Ledger;
use crate::services::LedgerBackend;
use crate::AppState;
use super::templates::{load_template, escape_html};

pub async fn serve_index(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<Response> {
    let backend = LedgerBackend::from_session(&session).await?;
    tracing::info!("Serving main page for {:?}", backend);

    let ledger = backend.read(&state, &jar)?;
    let chart_html = render_chart_markup(state.charts.render_blocking(ledger.clone()).await);

    let html = load_template(&state.config, "index.html")?
        .replace("{{user_nav}}", &render_user_nav(backend.username()))
        .replace("{{activity_rows}}", &render_activity_rows(&ledger))
        .replace("{{activity_options}}", &render_activity_options(&ledger))
        .replace("{{chart}}", &chart_html);

    tracing::debug!("Rendered main page with {} activities", ledger.len());
    Ok(Html(html).into_response())
}

pub async fn get_chart(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<Response> {
    let backend = LedgerBackend::from_session(&session).await?;
    let ledger = backend.read(&state, &jar)?;
    let chart = state.charts.render_blocking(ledger).await?;
    Ok(Json(json!({ "grafico": chart })).into_response())
}

// a broken chart shouldn't take the whole page down
fn render_chart_markup(chart: AppResult<String>) -> String {
    match chart {
        Ok(png) => format!(
            r#"<img id="grafico" src="data:image/png;base64,{}" alt="Hours per activity">"#,
            png
        ),
        Err(e) => {
            tracing::error!("Failed to render chart for main page: {}", e);
            r#"<p id="grafico" class="chart-error">Chart unavailable.</p>"#.to_string()
        }
    }
}

fn render_user_nav(username: Option<&str>) -> String {
    match username {
        Some(username) => format!(
            r#"<span class="user">Logged in as <strong>{}</strong></span> <a href="/logout">Log out</a>"#,
            escape_html(username)
        ),
        None => r#"<span class="user">Guest (data kept in this browser)</span> <a href="/login">Log in</a> <a href="/register">Register</a>"#
            .to_string(),
    }
}

fn render_activity_rows(ledger: &Ledger) -> String {
    ledger
        .read()
        .iter()
        .map(|(name, hours)| {
            let name = escape_html(name);
            format!(
                r#"<tr data-activity="{name}">
                <td>{name}</td>
                <td class="hours">{hours:.2}h</td>
                <td class="action-cell">
                    <button class="zero-btn" data-activity="{name}">Reset</button>
                    <button class="delete-btn" data-activity="{name}">Remove</button>
                </td>
            </tr>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_activity_options(ledger: &Ledger) -> String {
    ledger
        .read()
        .keys()
        .map(|name| {
            let name = escape_html(name);
            format!(r#"<option value="{name}">{name}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
