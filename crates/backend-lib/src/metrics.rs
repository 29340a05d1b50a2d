// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const WS_CONNECTION: &str = "ws.connection";
pub const WS_DISCONNECTION: &str = "ws.disconnection";
pub const WS_ACTIVE: &str = "ws.active";
pub const DIRECTORY_LOOKUP: &str = "directory.lookup";
pub const LOGIN_ACCEPTED: &str = "login.accepted";
pub const LOGIN_REJECTED: &str = "login.rejected";
