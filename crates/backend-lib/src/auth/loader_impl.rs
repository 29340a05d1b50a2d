use async_trait::async_trait;

use crate::auth::{Credentials, Principal, PrincipalLoader};
use crate::directory::UserDirectory;
use crate::error::AppError;

/// [`PrincipalLoader`] that checks usernames against a [`UserDirectory`]
pub struct DirectoryLoader<D> {
    directory: D,
}

impl<D: UserDirectory> DirectoryLoader<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<D: UserDirectory> PrincipalLoader for DirectoryLoader<D> {
    async fn load_by_id(&self, id: &str) -> Result<Option<Principal>, AppError> {
        match self.directory.lookup(id).await? {
            Some(_) => Ok(Some(Principal::new(id))),
            None => {
                tracing::debug!(user = %id, "unknown user");
                Ok(None)
            },
        }
    }

    async fn load_from_credentials(
        &self,
        form: &Credentials,
    ) -> Result<Option<Principal>, AppError> {
        match form.username() {
            Some(username) => self.load_by_id(username).await,
            None => Ok(None),
        }
    }
}
