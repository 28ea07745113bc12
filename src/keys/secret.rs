use rand::Rng;

/// Prefix on every issued secret, so integrations and log scrubbers can
/// recognize Letsy credentials at a glance.
pub const SECRET_PREFIX: &str = "letsy_";

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
// 40 chars of [A-Za-z0-9] carry ~238 bits of randomness
const SECRET_LEN: usize = 40;

/// Cost factor for bcrypt hashing of key secrets.
const BCRYPT_COST: u32 = 10;

/// Generate a fresh key secret from the OS randomness source.
pub fn generate_secret() -> String {
    let mut rng = rand::rngs::OsRng;
    let suffix: String = (0..SECRET_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    format!("{}{}", SECRET_PREFIX, suffix)
}

/// Hash a secret for storage. Salted per call, so equal secrets never
/// produce equal hashes.
pub fn hash_secret(secret: &str) -> anyhow::Result<String> {
    Ok(bcrypt::hash(secret, BCRYPT_COST)?)
}

/// Verify a presented secret against a stored hash. Malformed hashes
/// read as a failed match.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    bcrypt::verify(secret, hash).unwrap_or(false)
}
