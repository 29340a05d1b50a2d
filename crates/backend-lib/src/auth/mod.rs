// ============================
// website-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
mod loader;
mod loader_impl;
pub mod session;

pub use loader::{Credentials, Principal, PrincipalLoader};
pub use loader_impl::DirectoryLoader;
pub use session::{
    signing_key, unauthorized, AuthRejection, AuthSession, CurrentUser, SESSION_COOKIE_NAME,
    SESSION_USER_KEY,
};
