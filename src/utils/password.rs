use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

type HmacSha256 = Hmac<Sha256>;

#[cfg(not(test))]
const ITERATIONS: u32 = 260000;
#[cfg(test)]
const ITERATIONS: u32 = 1000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash un mot de passe au format pbkdf2:sha256:iterations$salt$hash
/// Utilise PBKDF2-HMAC-SHA256 avec 260000 itérations et un salt de 16 bytes
pub fn hash_password(password: &str) -> Result<String, String> {
    hash_with_iterations(password, ITERATIONS)
}

fn hash_with_iterations(password: &str, iterations: u32) -> Result<String, String> {
    // Générer un salt aléatoire
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut key)
        .map_err(|e| format!("PBKDF2 hash generation failed: {}", e))?;

    let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
    let hash_b64 = URL_SAFE_NO_PAD.encode(key);

    Ok(format!("pbkdf2:sha256:{}${}${}", iterations, salt_b64, hash_b64))
}

/// Vérifie un mot de passe contre un hash stocké
/// Le hash peut être encodé en base64 (nouveau) ou en hex (données seedées)
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    // Parser le format: pbkdf2:sha256:iterations$salt$hash
    let mut parts = stored_hash.split('$');
    let (Some(header), Some(salt_str), Some(hash_str), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("Invalid hash format".to_string());
    };

    let iterations = match header.split(':').collect::<Vec<_>>().as_slice() {
        ["pbkdf2", "sha256", iterations] => iterations
            .parse::<u32>()
            .map_err(|_| "Invalid iterations".to_string())?,
        _ => return Err("Invalid header".to_string()),
    };

    let salt = decode_flexible(salt_str)?;
    let expected_hash = decode_flexible(hash_str)?;
    if expected_hash.is_empty() {
        return Err("Empty hash".to_string());
    }

    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| format!("PBKDF2 hash verification failed: {}", e))?;

    Ok(constant_time_eq(&computed, &expected_hash))
}

/// Comparaison en temps constant (pas de sortie anticipée)
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Décode une chaîne encodée en hexadécimal (64 caractères) ou en base64 URL-safe
fn decode_flexible(input: &str) -> Result<Vec<u8>, String> {
    if input.len() == 64 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(input).map_err(|e| format!("Hex decode failed: {}", e));
    }

    URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|_| "Failed to decode".to_string())
}
