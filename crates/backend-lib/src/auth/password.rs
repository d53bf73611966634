// ============================
// campus-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

/// Block size and parallelism stay at scrypt's recommended values;
/// only N is configurable
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Hash a password using scrypt with cost `log_n`
pub fn hash_password(plain: &str, log_n: u8) -> anyhow::Result<String> {
    let params = Params::new(log_n, SCRYPT_R, SCRYPT_P, Params::RECOMMENDED_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash. The cost is read back from the hash,
/// so hashes made under an older cost keep verifying.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String, log_n: u8) -> anyhow::Result<String> {
    let hash = hash_password(plain, log_n);
    plain.zeroize();
    hash
}
