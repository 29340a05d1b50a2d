// ============================
// crates/backend-lib/src/handlers/pages.rs
// ============================
//! Page handlers: every page is a template wrapped in the header and footer
//! fragments.
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
};
use minijinja::{context, Value};

use crate::{error::AppError, AppState};

pub const HOME_TEMPLATE: &str = "home.html";
pub const SOCIALS_TEMPLATE: &str = "socials.html";
pub const NOT_FOUND_TEMPLATE: &str = "404.html";

/// Render `template` with the `header` and `footer` fragments in its context
pub async fn render_page(state: &AppState, template: &str) -> Result<Html<String>, AppError> {
    let header = state.fragments.get("header").await?;
    let footer = state.fragments.get("footer").await?;

    // Fragments are trusted markup and go into the page unescaped.
    let html = state.templates.get_template(template)?.render(context! {
        header => Value::from_safe_string(header),
        footer => Value::from_safe_string(footer),
    })?;

    Ok(Html(html))
}

pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render_page(&state, HOME_TEMPLATE).await
}

pub async fn socials(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render_page(&state, SOCIALS_TEMPLATE).await
}

/// Fallback for unmatched paths
pub async fn not_found(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let page = render_page(&state, NOT_FOUND_TEMPLATE).await?;
    Ok((StatusCode::NOT_FOUND, page))
}
