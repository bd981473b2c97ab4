//! Bearer token issuance and validation (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::{validate_claims, AuthError, ClaimSet};

/// Serializes and signs a claim set.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, claims: &ClaimSet) -> Result<String, AuthError>;
}

/// Verifies a presented token and reconstructs the signed claim set.
///
/// Portal rules are not re-checked here; they were enforced at issuance.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, AuthError>;
}

/// HMAC-SHA256 signer/verifier keyed by a process-wide secret.
#[derive(Clone)]
pub struct Hs256Tokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256Tokens {
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Signing("signing secret is empty".to_string()));
        }
        if secret.len() < 32 {
            tracing::warn!("signing secret is shorter than 32 bytes");
        }

        // Expiry is checked against the caller-supplied clock in `validate`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

impl core::fmt::Debug for Hs256Tokens {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Tokens").finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256Tokens {
    fn issue(&self, claims: &ClaimSet) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl TokenValidator for Hs256Tokens {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let data = decode::<ClaimSet>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            }
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
