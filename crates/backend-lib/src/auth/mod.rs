// ============================
// campus-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod cookie;
pub mod credentials;
pub mod password;
pub mod persistent_session;
pub mod session;
pub mod token_generator;

pub use credentials::{authenticate, AuthOutcome};
pub use password::{hash_password, hash_password_secure, verify_password};
pub use credentials::DECOY_PASSWORD;
pub use persistent_session::PersistentSessionStore;
pub use session::{Session, SessionManager, SessionStore};
