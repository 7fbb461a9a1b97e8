//! Session manager tying the signer and the session store together

use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;

use crate::{
    auth::{
        store::{fingerprint, SessionRecord, SessionStore, TokenKind},
        AuthError, Claims, ClaimsElement, TokenInfo, TokenSigner,
    },
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct SessionManager {
    signer: TokenSigner,
    store: SessionStore,
}

impl SessionManager {
    pub fn new(signer: TokenSigner, store: SessionStore) -> Self {
        Self { signer, store }
    }

    /// Issue an access token and write its session record.
    ///
    /// The token expiry honors `ttl_seconds` (falling back to the configured
    /// default) and the same window bounds the session record, so token and
    /// record expire together. A store failure fails the whole operation;
    /// no token is handed out without a backing record.
    pub async fn generate(
        &self,
        element: &ClaimsElement,
        org_id: i64,
        extra: HashMap<String, serde_json::Value>,
        ttl_seconds: Option<u64>,
    ) -> AppResult<TokenInfo> {
        let ttl = ttl_seconds.unwrap_or_else(|| self.signer.default_ttl_seconds());
        let claims = Claims::new(element, Utc::now(), ttl);

        let access_token = self
            .signer
            .sign(&claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        self.store
            .put(
                &element.user_id,
                TokenKind::Access,
                org_id,
                &access_token,
                extra,
                Duration::from_secs(ttl),
            )
            .await?;

        Ok(TokenInfo {
            access_token,
            token_type: self.signer.token_type().to_string(),
            expires_at: claims.exp,
        })
    }

    /// Verify a token string. Store-agnostic: revocation is the separate
    /// [`check_active`](Self::check_active) step.
    pub fn parse(&self, token: &str) -> Result<Claims, AuthError> {
        self.signer.verify(token)
    }

    /// Store-backed revocation check for a verified token.
    ///
    /// An absent record (logout, TTL lapse) or a fingerprint that no longer
    /// matches (a later login overwrote the record) both read as a deleted
    /// token. Org id is not compared here; that predicate belongs to
    /// third-party flows going through [`SessionStore::check`].
    pub async fn check_active(
        &self,
        claims: &Claims,
        raw_token: &str,
    ) -> Result<SessionRecord, AuthError> {
        let record = match self.store.get(&claims.user_id, TokenKind::Access).await {
            Ok(record) => record,
            Err(AuthError::NotFound) => return Err(AuthError::DeletedToken),
            Err(e) => return Err(e),
        };

        if record.token != fingerprint(raw_token) {
            return Err(AuthError::DeletedToken);
        }
        Ok(record)
    }

    /// Look up the access session record keyed by subject + third-party id
    pub async fn get_info(&self, uid: &str, third_id: &str) -> AppResult<SessionRecord> {
        let record = self
            .store
            .get(&format!("{}{}", uid, third_id), TokenKind::Access)
            .await?;
        Ok(record)
    }

    /// Drop the session record for `(uid, kind)`, used at logout
    pub async fn destroy(&self, uid: &str, kind: TokenKind) -> AppResult<bool> {
        let deleted = self.store.delete(uid, kind).await?;
        if !deleted {
            tracing::debug!(uid, kind = kind.as_str(), "no session record to destroy");
        }
        Ok(deleted)
    }

    /// Shutdown hook. The underlying clients are pooled and close with the
    /// process; nothing to tear down explicitly.
    pub fn release(&self) -> AppResult<()> {
        Ok(())
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, RedisConfig};

    // The store client is lazy, so a manager can be built without a live
    // Redis; only parse paths are exercised here.
    fn manager() -> SessionManager {
        let config = AuthConfig::default();
        let signer = TokenSigner::new(&config).unwrap();
        let store = SessionStore::new(&RedisConfig::default(), &config.key_prefix).unwrap();
        SessionManager::new(signer, store)
    }

    fn element() -> ClaimsElement {
        ClaimsElement {
            user_id: "9000001".to_string(),
            user_name: "13912345678".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn parse_roundtrips_signed_claims() {
        let manager = manager();
        let signer = TokenSigner::new(&AuthConfig::default()).unwrap();

        let claims = Claims::new(&element(), Utc::now(), 7200);
        let token = signer.sign(&claims).unwrap();

        let parsed = manager.parse(&token).unwrap();
        assert_eq!(parsed.user_id, "9000001");
        assert_eq!(parsed.user_name, "13912345678");
        assert!(!parsed.is_admin);
    }

    #[test]
    fn parse_maps_tampering_to_invalid() {
        let manager = manager();
        let signer = TokenSigner::new(&AuthConfig::default()).unwrap();

        let token = signer.sign(&Claims::new(&element(), Utc::now(), 7200)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        assert_eq!(manager.parse(&tampered), Err(AuthError::InvalidToken));
    }

    #[test]
    fn parse_maps_expiry_through() {
        let manager = manager();
        let signer = TokenSigner::new(&AuthConfig::default()).unwrap();

        let mut claims = Claims::new(&element(), Utc::now(), 0);
        claims.iat -= 7200;
        claims.nbf -= 7200;
        claims.exp -= 7200;

        let token = signer.sign(&claims).unwrap();
        assert_eq!(manager.parse(&token), Err(AuthError::ExpiredToken));
    }
}
