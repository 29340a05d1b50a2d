// ============================
// website-backend-lib/src/auth/session.rs
// ============================
//! Cookie session handling and the login lifecycle.
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::{cookie::Key, Session};

use crate::auth::{Credentials, Principal, PrincipalLoader};
use crate::error::AppError;
use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "session";

/// Session key holding the principal id
pub const SESSION_USER_KEY: &str = "_user_id";

/// Where unauthenticated callers are sent
pub const UNAUTHORIZED_REDIRECT: &str = "/";

/// Cookie signing key derived from the configured secret
pub fn signing_key(secret: &str) -> Result<Key, AppError> {
    Key::try_from(secret.as_bytes())
        .map_err(|e| AppError::Config(format!("secret_key unusable for signing: {e}")))
}

/// Response for a protected route reached without a principal
pub fn unauthorized() -> Redirect {
    Redirect::to(UNAUTHORIZED_REDIRECT)
}

/// The request's session together with the principal loader
pub struct AuthSession {
    session: Session,
    loader: Arc<dyn PrincipalLoader>,
}

impl AuthSession {
    /// Principal stored in the session, re-checked against the directory.
    ///
    /// A stored id whose user has disappeared is dropped from the session.
    pub async fn current_user(&self) -> Result<Option<Principal>, AppError> {
        let Some(id) = self.session.get::<String>(SESSION_USER_KEY).await? else {
            return Ok(None);
        };

        match self.loader.load_by_id(&id).await? {
            Some(principal) => Ok(Some(principal)),
            None => {
                tracing::info!(user = %id, "stored user no longer exists");
                self.session.remove::<String>(SESSION_USER_KEY).await?;
                Ok(None)
            },
        }
    }

    /// Resolve a submitted form into a principal
    pub async fn authenticate(&self, form: &Credentials) -> Result<Option<Principal>, AppError> {
        self.loader.load_from_credentials(form).await
    }

    /// Attach `principal` to the session under a fresh session id
    pub async fn login(&self, principal: &Principal) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_USER_KEY, principal.id()).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }
}

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self {
            session,
            loader: state.loader.clone(),
        })
    }
}

/// Extractor for routes that require a logged-in user
pub struct CurrentUser(pub Principal);

/// Why [`CurrentUser`] could not be extracted
pub enum AuthRejection {
    /// No principal; answered with the unauthorized redirect
    Unauthorized,
    /// The session layer itself rejected the request
    Session(Response),
    Error(AppError),
}

impl From<AppError> for AuthRejection {
    fn from(err: AppError) -> Self {
        AuthRejection::Error(err)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthorized => unauthorized().into_response(),
            AuthRejection::Session(response) => response,
            AuthRejection::Error(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthSession::from_request_parts(parts, state)
            .await
            .map_err(AuthRejection::Session)?;

        auth.current_user()
            .await?
            .map(CurrentUser)
            .ok_or(AuthRejection::Unauthorized)
    }
}
