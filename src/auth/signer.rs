//! Stateless token signer
//!
//! Pure and side-effect free; safe for unsynchronized concurrent use.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::str::FromStr;

use crate::{
    auth::{AuthError, Claims},
    config::AuthConfig,
};

#[derive(Clone)]
pub struct TokenSigner {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_type: String,
    default_ttl_seconds: u64,
}

impl TokenSigner {
    /// Build a signer from validated configuration.
    ///
    /// Only the HMAC family is accepted; verification pins the configured
    /// algorithm so a token signed any other way fails as invalid.
    pub fn new(config: &AuthConfig) -> Result<Self, String> {
        config.validate()?;

        let algorithm = Algorithm::from_str(&config.jwt_algorithm)
            .map_err(|e| format!("unsupported signing algorithm: {}", e))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(format!(
                "signing algorithm {} is not in the HMAC allow-list",
                config.jwt_algorithm
            ));
        }

        let mut validation = Validation::new(algorithm);
        validation.validate_nbf = true;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            token_type: config.token_type.clone(),
            default_ttl_seconds: config.jwt_expiration_seconds,
        })
    }

    /// Sign claims into a compact token string
    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
    }

    /// Verify a token string and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn default_ttl_seconds(&self) -> u64 {
        self.default_ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ClaimsElement;
    use chrono::Utc;

    fn signer_with(secret: &str, algorithm: &str) -> TokenSigner {
        TokenSigner::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_algorithm: algorithm.to_string(),
            jwt_expiration_seconds: 7200,
            token_type: "Bearer".to_string(),
            key_prefix: "libris".to_string(),
        })
        .expect("valid signer config")
    }

    fn claims(ttl_seconds: u64) -> Claims {
        Claims::new(
            &ClaimsElement {
                user_id: "1650000000000001".to_string(),
                user_name: "13800000000".to_string(),
                is_admin: true,
            },
            Utc::now(),
            ttl_seconds,
        )
    }

    #[test]
    fn sign_verify_roundtrip_preserves_identity() {
        let signer = signer_with("unit-test-secret", "HS256");
        let issued = claims(7200);

        let token = signer.sign(&issued).unwrap();
        let parsed = signer.verify(&token).unwrap();

        assert_eq!(parsed.user_id, issued.user_id);
        assert_eq!(parsed.user_name, issued.user_name);
        assert_eq!(parsed.is_admin, issued.is_admin);
        assert_eq!(parsed.sub, issued.user_id);
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let signer = signer_with("secret-a", "HS256");
        let other = signer_with("secret-b", "HS256");

        let token = other.sign(&claims(7200)).unwrap();
        assert_eq!(signer.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn verify_rejects_algorithm_mismatch() {
        let signer = signer_with("shared-secret", "HS256");
        let other = signer_with("shared-secret", "HS512");

        let token = other.sign(&claims(7200)).unwrap();
        assert_eq!(signer.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let signer = signer_with("unit-test-secret", "HS256");

        // Far enough in the past to clear the default validation leeway
        let mut expired = claims(0);
        expired.iat -= 3600;
        expired.nbf -= 3600;
        expired.exp -= 3600;

        let token = signer.sign(&expired).unwrap();
        assert_eq!(signer.verify(&token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn verify_rejects_garbage() {
        let signer = signer_with("unit-test-secret", "HS256");
        assert_eq!(signer.verify("not-a-token"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn construction_rejects_non_hmac_algorithm() {
        let result = TokenSigner::new(&AuthConfig {
            jwt_algorithm: "RS256".to_string(),
            ..AuthConfig::default()
        });
        assert!(result.is_err());
    }
}
