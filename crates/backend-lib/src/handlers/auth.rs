// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, logout and the current-session endpoint.
use axum::{
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use metrics::counter;

use crate::auth::{unauthorized, AuthSession, Credentials, CurrentUser, Principal};
use crate::error::AppError;
use crate::metrics::{LOGIN_ACCEPTED, LOGIN_REJECTED};

/// `POST /login` with a `username` form field
pub async fn login(
    auth: AuthSession,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    match auth.authenticate(&form).await? {
        Some(principal) => {
            auth.login(&principal).await?;
            counter!(LOGIN_ACCEPTED).increment(1);
            tracing::info!(user = %principal.id(), "user logged in");
            Ok(Redirect::to("/").into_response())
        },
        None => {
            counter!(LOGIN_REJECTED).increment(1);
            Ok(unauthorized().into_response())
        },
    }
}

/// `POST /logout`
pub async fn logout(auth: AuthSession) -> Result<Redirect, AppError> {
    auth.logout().await?;
    Ok(Redirect::to("/"))
}

/// `GET /session`: the logged-in principal as JSON
pub async fn session(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}
