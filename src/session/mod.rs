//! Login gate and server-side sessions.

pub mod gate;
pub mod store;

pub use gate::{require_session, SessionGate, SESSION_COOKIE};
pub use store::{Session, SessionStore};
