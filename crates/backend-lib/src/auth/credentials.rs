//! Credential checking, kept free of any web-framework types.
use crate::models::User;
use super::password::verify_password;

/// Result of checking submitted credentials
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(User),
    UnknownUser,
    WrongPassword,
}

/// Plaintext behind the decoy hash checked when a username is unknown
pub const DECOY_PASSWORD: &str = "campus-decoy-password";

/// Decide whether `password` unlocks `user`. `user` is whatever the
/// username lookup returned. An unknown user is still checked against
/// `decoy_hash` so both failures cost one scrypt run. CPU-bound; call it
/// off the async runtime.
pub fn authenticate(user: Option<User>, password: &str, decoy_hash: &str) -> AuthOutcome {
    match user {
        None => {
            let _ = verify_password(decoy_hash, password);
            AuthOutcome::UnknownUser
        },
        Some(user) if verify_password(&user.password_hash, password) => {
            AuthOutcome::Authenticated(user)
        },
        Some(_) => AuthOutcome::WrongPassword,
    }
}
