use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD}};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PasswordError {
    #[error("Invalid hash format")]
    InvalidFormat,

    #[error("Invalid iterations")]
    InvalidIterations,

    #[error("Failed to decode {0}")]
    Decode(&'static str),

    #[error("PBKDF2 failed: {0}")]
    Pbkdf2(String),
}

/// Hash des mots de passe au format Werkzeug: pbkdf2:sha256:iterations$salt$hash
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations: iterations.max(1) }
    }

    /// PBKDF2-HMAC-SHA256 avec un salt aléatoire de 16 bytes
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        rand::thread_rng().fill(&mut salt);

        let mut key = [0u8; KEY_LENGTH];
        pbkdf2::<HmacSha256>(password.as_bytes(), &salt, self.iterations, &mut key)
            .map_err(|e| PasswordError::Pbkdf2(e.to_string()))?;

        // base64 URL-safe sans padding (format Werkzeug moderne)
        let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
        let hash_b64 = URL_SAFE_NO_PAD.encode(key);

        Ok(format!("pbkdf2:sha256:{}${}${}", self.iterations, salt_b64, hash_b64))
    }

    /// Hash bien formé qui ne correspond à aucun mot de passe
    /// Le vérifier coûte autant que vérifier un vrai hash de même config
    pub fn dummy_hash(&self) -> String {
        format!(
            "pbkdf2:sha256:{}${}${}",
            self.iterations,
            URL_SAFE_NO_PAD.encode([0u8; SALT_LENGTH]),
            URL_SAFE_NO_PAD.encode([0u8; KEY_LENGTH]),
        )
    }
}

/// Vérifie un mot de passe contre un hash stocké
/// Les itérations sont lues dans le hash, pas dans la config courante
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let mut parts = stored_hash.split('$');
    let (Some(header), Some(salt_str), Some(hash_str), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordError::InvalidFormat);
    };

    let header_parts: Vec<&str> = header.split(':').collect();
    if header_parts.len() != 3 || header_parts[0] != "pbkdf2" || header_parts[1] != "sha256" {
        return Err(PasswordError::InvalidFormat);
    }

    let iterations = header_parts[2]
        .parse::<u32>()
        .map_err(|_| PasswordError::InvalidIterations)?;

    let salt = decode_b64(salt_str).ok_or(PasswordError::Decode("salt"))?;
    let expected_hash = decode_b64(hash_str).ok_or(PasswordError::Decode("hash"))?;

    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| PasswordError::Pbkdf2(e.to_string()))?;

    Ok(constant_time_eq(&computed, &expected_hash))
}

fn decode_b64(input: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .or_else(|_| STANDARD.decode(input))
        .ok()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
