// ============================
// website-backend-lib/src/router.rs
// ============================
//! Route table and shared layers.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, MemoryStore, SessionManagerLayer};

use crate::auth::SESSION_COOKIE_NAME;
use crate::handlers::{auth, pages};
use crate::presence;
use crate::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_signed(state.session_key.clone());

    Router::new()
        .route("/", get(pages::home))
        .route("/socials", get(pages::socials))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
        .route("/ws", get(presence::ws_handler))
        .fallback(pages::not_found)
        .layer(sessions)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
