use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::AuthQuery;

pub fn load_template(config: &Config, name: &str) -> AppResult<String> {
    let path = config.template_path(name);
    std::fs::read_to_string(&path).map_err(|e| {
        tracing::error!("Failed to read template {}: {}", path.display(), e);
        AppError::File(e)
    })
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The error/success banner shown on the login and register pages.
pub fn render_feedback(query: &AuthQuery) -> String {
    let error = query
        .error
        .as_deref()
        .map(|msg| format!(r#"<div class="flash flash-error">{}</div>"#, escape_html(msg)));
    let message = query
        .message
        .as_deref()
        .map(|msg| format!(r#"<div class="flash flash-success">{}</div>"#, escape_html(msg)));

    [error, message].into_iter().flatten().collect::<Vec<_>>().join("\n")
}

/// Only same-site absolute paths are accepted as a post-login destination.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
}
