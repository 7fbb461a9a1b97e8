//! Redis-backed session store
//!
//! One record per `(subject, token kind)` under `prefix:kind:subject`. The
//! raw token is never stored, only its one-way fingerprint. Every operation
//! is a bounded network round trip against a shared Redis deployment
//! (single-node or clustered).

use redis::{
    aio::{ConnectionLike, MultiplexedConnection},
    cluster::ClusterClient,
    cluster_async::ClusterConnection,
    AsyncCommands, Cmd, Pipeline, RedisFuture, RedisResult, Value,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::{auth::AuthError, config::RedisConfig};

/// Namespace distinguishing tokens issued to the same subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    OpenApi,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::OpenApi => "openapi",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Stored session metadata for one issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Issuing tenant id; single-tenant deployments use 0
    pub org_id: i64,
    /// Hex SHA-256 fingerprint of the issued token string
    pub token: String,
    /// Caller-defined extra fields, kept flat in the stored JSON object
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// One-way fingerprint of a token string
pub fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[derive(Clone)]
enum RedisBackend {
    Single(redis::Client),
    Cluster(ClusterClient),
}

enum RedisConn {
    Single(MultiplexedConnection),
    Cluster(ClusterConnection),
}

impl ConnectionLike for RedisConn {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        match self {
            RedisConn::Single(conn) => conn.req_packed_command(cmd),
            RedisConn::Cluster(conn) => conn.req_packed_command(cmd),
        }
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        match self {
            RedisConn::Single(conn) => conn.req_packed_commands(cmd, offset, count),
            RedisConn::Cluster(conn) => conn.req_packed_commands(cmd, offset, count),
        }
    }

    fn get_db(&self) -> i64 {
        match self {
            RedisConn::Single(conn) => conn.get_db(),
            RedisConn::Cluster(conn) => conn.get_db(),
        }
    }
}

impl RedisBackend {
    async fn connect(&self) -> RedisResult<RedisConn> {
        match self {
            RedisBackend::Single(client) => Ok(RedisConn::Single(
                client.get_multiplexed_async_connection().await?,
            )),
            RedisBackend::Cluster(client) => {
                Ok(RedisConn::Cluster(client.get_async_connection().await?))
            }
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    backend: RedisBackend,
    prefix: String,
    timeout: Duration,
}

impl SessionStore {
    /// Build a store handle; no connection is opened until the first call
    pub fn new(config: &RedisConfig, key_prefix: &str) -> Result<Self, AuthError> {
        if config.addresses.is_empty() {
            return Err(AuthError::StoreUnavailable(
                "no redis address configured".to_string(),
            ));
        }

        let backend = if config.clustered {
            let nodes: Vec<String> = config
                .addresses
                .iter()
                .map(|addr| cluster_node_url(addr, &config.password))
                .collect();
            RedisBackend::Cluster(
                ClusterClient::new(nodes)
                    .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?,
            )
        } else {
            let url = node_url(&config.addresses[0], &config.password, config.db);
            RedisBackend::Single(
                redis::Client::open(url)
                    .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?,
            )
        };

        Ok(Self {
            backend,
            prefix: key_prefix.to_string(),
            timeout: Duration::from_secs(config.command_timeout_secs),
        })
    }

    /// Verify connectivity, used once at startup
    pub async fn ping(&self) -> Result<(), AuthError> {
        self.bounded(async {
            let mut conn = self.backend.connect().await?;
            redis::cmd("PING").query_async::<_, String>(&mut conn).await
        })
        .await?;
        Ok(())
    }

    /// Write the session record for `(uid, kind)`, overwriting any previous
    /// one. The overwrite is what enforces the single-active-session policy;
    /// two concurrent logins race and the last write wins.
    pub async fn put(
        &self,
        uid: &str,
        kind: TokenKind,
        org_id: i64,
        raw_token: &str,
        extra: HashMap<String, serde_json::Value>,
        ttl: Duration,
    ) -> Result<(), AuthError> {
        let record = SessionRecord {
            org_id,
            token: fingerprint(raw_token),
            extra,
        };
        let value = serde_json::to_string(&record)
            .map_err(|e| AuthError::StoreUnavailable(format!("encode session record: {}", e)))?;
        let key = self.key(uid, kind);

        self.bounded(async {
            let mut conn = self.backend.connect().await?;
            conn.set_ex::<_, _, ()>(&key, &value, ttl.as_secs()).await
        })
        .await
    }

    /// Fetch the session record, `NotFound` when absent or expired
    pub async fn get(&self, uid: &str, kind: TokenKind) -> Result<SessionRecord, AuthError> {
        let key = self.key(uid, kind);
        let value: Option<String> = self
            .bounded(async {
                let mut conn = self.backend.connect().await?;
                conn.get(&key).await
            })
            .await?;

        let value = value.ok_or(AuthError::NotFound)?;
        serde_json::from_str(&value)
            .map_err(|e| AuthError::StoreUnavailable(format!("decode session record: {}", e)))
    }

    /// Verification predicate: does the stored record match this org id and
    /// token? A mismatch is a negative result, not an error.
    pub async fn check(
        &self,
        uid: &str,
        raw_token: &str,
        kind: TokenKind,
        org_id: i64,
    ) -> Result<(bool, SessionRecord), AuthError> {
        let record = self.get(uid, kind).await?;
        let matched = record.org_id == org_id && record.token == fingerprint(raw_token);
        Ok((matched, record))
    }

    /// Delete the session record, returns whether a record existed
    pub async fn delete(&self, uid: &str, kind: TokenKind) -> Result<bool, AuthError> {
        let key = self.key(uid, kind);
        let removed: i64 = self
            .bounded(async {
                let mut conn = self.backend.connect().await?;
                conn.del(&key).await
            })
            .await?;
        Ok(removed > 0)
    }

    fn key(&self, uid: &str, kind: TokenKind) -> String {
        format!("{}:{}:{}", self.prefix, kind.as_str(), uid)
    }

    /// Run one store round trip under the configured timeout
    async fn bounded<T, F>(&self, fut: F) -> Result<T, AuthError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AuthError::StoreUnavailable(e.to_string())),
            Err(_) => Err(AuthError::StoreUnavailable(
                "store call timed out".to_string(),
            )),
        }
    }
}

fn node_url(addr: &str, password: &str, db: i64) -> String {
    if password.is_empty() {
        format!("redis://{}/{}", addr, db)
    } else {
        format!("redis://:{}@{}/{}", password, addr, db)
    }
}

fn cluster_node_url(addr: &str, password: &str) -> String {
    if password.is_empty() {
        format!("redis://{}", addr)
    } else {
        format!("redis://:{}@{}", password, addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisConfig;

    fn store() -> SessionStore {
        SessionStore::new(&RedisConfig::default(), "libris").unwrap()
    }

    #[test]
    fn key_layout_is_prefix_kind_subject() {
        let store = store();
        assert_eq!(store.key("42", TokenKind::Access), "libris:access:42");
        assert_eq!(store.key("42", TokenKind::OpenApi), "libris:openapi:42");
        assert_eq!(store.key("42", TokenKind::Refresh), "libris:refresh:42");
    }

    #[test]
    fn fingerprint_is_stable_hex_sha256() {
        let a = fingerprint("token-a");
        assert_eq!(a.len(), 64);
        assert_eq!(a, fingerprint("token-a"));
        assert_ne!(a, fingerprint("token-b"));
    }

    #[test]
    fn record_serializes_flat() {
        let mut extra = HashMap::new();
        extra.insert("phone".to_string(), serde_json::json!("13800000000"));

        let record = SessionRecord {
            org_id: 7,
            token: fingerprint("raw"),
            extra,
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(value["org_id"], 7);
        assert_eq!(value["token"], serde_json::json!(fingerprint("raw")));
        // Extra fields live at the top level, not nested
        assert_eq!(value["phone"], "13800000000");
    }

    #[test]
    fn record_roundtrip_keeps_extra_fields() {
        let mut extra = HashMap::new();
        extra.insert("is_admin".to_string(), serde_json::json!(false));

        let record = SessionRecord {
            org_id: 0,
            token: fingerprint("raw"),
            extra,
        };

        let decoded: SessionRecord =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(decoded.org_id, 0);
        assert_eq!(decoded.token, record.token);
        assert_eq!(decoded.extra["is_admin"], serde_json::json!(false));
    }

    #[test]
    fn node_urls_carry_credentials_and_db() {
        assert_eq!(node_url("127.0.0.1:6379", "", 3), "redis://127.0.0.1:6379/3");
        assert_eq!(
            node_url("127.0.0.1:6379", "hunter2", 0),
            "redis://:hunter2@127.0.0.1:6379/0"
        );
        assert_eq!(
            cluster_node_url("10.0.0.1:7000", "hunter2"),
            "redis://:hunter2@10.0.0.1:7000"
        );
    }
}
