// ============================
// website-backend-lib/src/fragments.rs
// ============================
//! Static HTML fragments (header, footer, ...) embedded into pages.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Extension appended to every fragment name
pub const FRAGMENT_EXT: &str = "html";

/// Fragments every page embeds
pub const PAGE_FRAGMENTS: [&str; 2] = ["header", "footer"];

/// Reads named fragments from a fixed directory.
///
/// There is no cache: each [`FragmentLoader::get`] hits the disk again.
#[derive(Debug, Clone)]
pub struct FragmentLoader {
    dir: PathBuf,
}

impl FragmentLoader {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, element_id: &str) -> PathBuf {
        self.dir.join(format!("{element_id}.{FRAGMENT_EXT}"))
    }

    /// Full text of fragment `element_id`
    pub async fn get(&self, element_id: &str) -> Result<String, AppError> {
        match tokio::fs::read_to_string(self.path_for(element_id)).await {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::FragmentNotFound(element_id.to_string()))
            },
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Fail unless every fragment in `names` exists as a file
    pub async fn ensure_present(&self, names: &[&str]) -> Result<(), AppError> {
        for name in names {
            let path = self.path_for(name);
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {
                    tracing::debug!(fragment = %name, path = %path.display(), "fragment present");
                },
                Ok(_) => return Err(AppError::FragmentNotFound((*name).to_string())),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(AppError::FragmentNotFound((*name).to_string()));
                },
                Err(e) => return Err(AppError::Io(e)),
            }
        }
        Ok(())
    }
}
