//! Shared fixtures for the backend integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Response, Router};
use backend_lib::{
    auth::DirectoryLoader,
    config::Settings,
    create_router,
    directory::{DirectoryError, UserDirectory},
    presence::PresenceSink,
    AppState,
};
use tempfile::TempDir;
use website_common::{PresenceEvent, UserRecord};

pub const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0001";
pub const HEADER: &str = "<header><a href=\"/\">Test &amp; Site</a></header>";
pub const FOOTER: &str = "<footer>&copy; test footer</footer>";

/// Templates directory with fragments and the three page templates
pub fn write_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let elements = dir.path().join("elements");
    std::fs::create_dir_all(&elements).unwrap();
    std::fs::write(elements.join("header.html"), HEADER).unwrap();
    std::fs::write(elements.join("footer.html"), FOOTER).unwrap();

    for (name, body) in [
        ("home.html", "<h1>home page</h1>"),
        ("socials.html", "<h1>socials page</h1>"),
        ("404.html", "<h1>not found page</h1>"),
    ] {
        std::fs::write(
            dir.path().join(name),
            format!("<html><body>{{{{ header }}}}{body}{{{{ footer }}}}</body></html>"),
        )
        .unwrap();
    }
    dir
}

pub fn settings_for(templates_dir: &Path) -> Settings {
    Settings {
        secret_key: SECRET.to_string(),
        api_url: "http://127.0.0.1:9/".to_string(),
        api_key: "test-key".to_string(),
        templates_dir: templates_dir.to_path_buf(),
        ..Settings::default()
    }
}

/// In-memory directory whose user set can change during a test
#[derive(Clone, Default)]
pub struct FakeDirectory {
    users: Arc<Mutex<HashSet<String>>>,
}

impl FakeDirectory {
    pub fn with_users(users: &[&str]) -> Self {
        let directory = Self::default();
        directory
            .users
            .lock()
            .unwrap()
            .extend(users.iter().map(|u| u.to_string()));
        directory
    }

    pub fn remove(&self, username: &str) {
        self.users.lock().unwrap().remove(username);
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn lookup(&self, username: &str) -> Result<Option<Vec<UserRecord>>, DirectoryError> {
        let known = self.users.lock().unwrap().contains(username);
        Ok(known.then(|| vec![UserRecord(serde_json::json!({ "Username": username }))]))
    }
}

/// Presence sink that keeps every event
#[derive(Default)]
pub struct RecordingPresence {
    events: Mutex<Vec<PresenceEvent>>,
}

impl RecordingPresence {
    pub fn events(&self) -> Vec<PresenceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Wait until at least `count` events arrived
    pub async fn wait_for(&self, count: usize) -> Vec<PresenceEvent> {
        for _ in 0..500 {
            let events = self.events();
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} presence events, got {:?}", self.events());
    }
}

impl PresenceSink for RecordingPresence {
    fn record(&self, event: PresenceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn build_app(
    templates_dir: &Path,
    directory: FakeDirectory,
    presence: Arc<dyn PresenceSink>,
) -> Router {
    let state = AppState::with_components(
        settings_for(templates_dir),
        Arc::new(DirectoryLoader::new(directory)),
        presence,
    )
    .unwrap();
    create_router(Arc::new(state))
}

pub fn test_app(templates_dir: &Path, directory: FakeDirectory) -> Router {
    build_app(templates_dir, directory, Arc::new(RecordingPresence::default()))
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
