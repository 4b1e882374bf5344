//! Signed session token codec.
//!
//! Issues and verifies the opaque bearer token carried in the credential
//! cookie. Tokens are HS256 JWTs whose payload holds the identity key and
//! issue time. Validity is purely a function of the signature — nothing is
//! persisted server-side per token.

use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token payload: identity key plus issue time.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64,
    pub iat: u64,
}

/// Signs identity claims into tokens and verifies them back.
///
/// The signing secret is injected at construction from configuration, so it
/// can be rotated per deployment and isolated per test.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no expiry; validity is signature + store lookup only.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        TokenCodec {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for the given identity key.
    pub fn issue(&self, user_id: u64) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            iat: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verify a token and return the identity key it was signed for.
    ///
    /// Returns `None` for any failure: bad signature, unparsable payload,
    /// wrong shape. Callers map that to a single rejection outcome.
    pub fn verify(&self, token: &str) -> Option<u64> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .ok()
            .map(|data| data.claims.sub)
    }
}
