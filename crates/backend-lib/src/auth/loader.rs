// =============
// crates/backend-lib/src/auth/loader.rs
// =============
//! Principal loading: the bridge between the session layer and the directory.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The authenticated identity attached to a session.
///
/// Only a [`PrincipalLoader`] can build one, after the directory confirmed
/// the username exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    id: String,
}

impl Principal {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The username
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Login form fields. Anything besides `username` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
}

impl Credentials {
    /// The submitted username exactly as sent, unless absent or empty
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }
}

#[async_trait]
pub trait PrincipalLoader: Send + Sync {
    /// Rebuild the principal for an id taken from a trusted session
    async fn load_by_id(&self, id: &str) -> Result<Option<Principal>, AppError>;

    /// Build a principal from a submitted form
    async fn load_from_credentials(
        &self,
        form: &Credentials,
    ) -> Result<Option<Principal>, AppError>;
}
