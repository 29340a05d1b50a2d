// ============================
// website-backend-lib/src/lib.rs
// ============================
//! Core functionality for the website backend: page rendering, session login
//! against the user Directory API and the realtime presence channel.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod fragments;
pub mod handlers;
pub mod metrics;
pub mod presence;
pub mod router;

use std::sync::Arc;

use minijinja::Environment;
use tower_sessions::cookie::Key;

use crate::auth::{signing_key, DirectoryLoader, PrincipalLoader};
use crate::config::Settings;
use crate::directory::HttpDirectory;
use crate::error::AppError;
use crate::fragments::FragmentLoader;
use crate::presence::{PresenceSink, TracingPresence};

pub use crate::router::create_router;

/// Application state shared across all handlers
pub struct AppState {
    /// Settings the state was built from
    pub settings: Arc<Settings>,
    /// Header/footer fragments
    pub fragments: FragmentLoader,
    /// Page templates, loaded from `templates_dir`
    pub templates: Environment<'static>,
    /// Principal loading for the session layer
    pub loader: Arc<dyn PrincipalLoader>,
    /// Presence event sink
    pub presence: Arc<dyn PresenceSink>,
    /// Session cookie signing key
    pub session_key: Key,
}

impl AppState {
    /// Create the production state: HTTP directory, tracing presence
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let directory = HttpDirectory::from_settings(&settings)?;
        Self::with_components(
            settings,
            Arc::new(DirectoryLoader::new(directory)),
            Arc::new(TracingPresence),
        )
    }

    /// Create a state with explicit collaborators
    pub fn with_components(
        settings: Settings,
        loader: Arc<dyn PrincipalLoader>,
        presence: Arc<dyn PresenceSink>,
    ) -> Result<Self, AppError> {
        let session_key = signing_key(&settings.secret_key)?;
        let fragments = FragmentLoader::new(settings.elements_dir());

        let mut templates = Environment::new();
        templates.set_loader(minijinja::path_loader(settings.templates_dir.clone()));

        Ok(Self {
            settings: Arc::new(settings),
            fragments,
            templates,
            loader,
            presence,
            session_key,
        })
    }
}
