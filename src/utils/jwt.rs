use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};

use crate::models::users::Role;

/// Durée de vie d'un token (24 heures)
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub role: Role,
    pub name: String,
    pub exp: i64,        // expiration timestamp
}

/// Clés HS256 construites une seule fois au démarrage puis injectées via web::Data
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Génère un JWT token pour un utilisateur
    pub fn generate_token(&self, user_id: i32, role: Role, name: &str) -> Result<String, String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
            .ok_or("Failed to calculate expiration")?
            .timestamp();

        let claims = Claims {
            sub: user_id,
            role,
            name: name.to_string(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| format!("Failed to generate token: {}", e))
    }

    /// Vérifie et décode un JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }
}
