use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::models::users;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,              // user_id
    pub username: String,      // email
    pub roles: Vec<String>,
    pub client_id: Option<i32>,
    pub iat: i64,
    pub exp: i64,              // expiration timestamp
}

/// Clés de signature HS256 et durée de vie des tokens
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Génère un JWT pour un utilisateur
    pub fn generate_token(&self, user: &users::Model) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();

        let claims = Claims {
            sub: user.id,
            username: user.email.clone(),
            roles: user.roles(),
            client_id: Some(user.client_id),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Vérifie la signature et l'expiration puis décode les claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
    }
}
