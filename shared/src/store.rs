//! Product store client
//!
//! One SurrealDB table, `product`, with one row per title:
//!
//! | field | type | note |
//! |-------|------|------|
//! | id | record | `product:t<hex(title)>`, never empty even for `""` |
//! | title | string | unique index |
//! | quantity | int | `>= 0` |
//!
//! The endpoint decides the engine: `ws://host:port` for a remote server
//! (RocksDB-backed on the server side), `rocksdb://path` for an embedded
//! store, `mem://` for tests.

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use thiserror::Error;

use crate::models::{ProductRecord, RankedProduct};
use crate::retry::{RetryError, RetryPolicy, retry};

pub const TABLE: &str = "product";

/// Record key for a title
///
/// Hex of the UTF-8 bytes behind a fixed prefix: SurrealDB rejects empty
/// string ids, and an empty title is still a title.
fn record_key(title: &str) -> String {
    format!("t{}", hex::encode(title.as_bytes()))
}

const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS product SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS title ON product TYPE string;
    DEFINE FIELD IF NOT EXISTS quantity ON product TYPE int ASSERT $value >= 0;
    DEFINE INDEX IF NOT EXISTS product_title ON product FIELDS title UNIQUE;
"#;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable after {attempts} attempts: {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: surrealdb::Error,
    },

    #[error("quantity {quantity} for '{title}' exceeds the store's integer range")]
    QuantityOutOfRange { title: String, quantity: u64 },

    #[error("store query failed: {0}")]
    Query(#[from] surrealdb::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Where and how to connect
#[derive(Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl StoreConfig {
    /// Remote SurrealDB server over WebSocket
    pub fn remote(host: &str, port: u16) -> Self {
        Self::with_endpoint(format!("ws://{host}:{port}"))
    }

    /// In-process memory engine
    pub fn memory() -> Self {
        Self::with_endpoint("mem://")
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: "shop".to_string(),
            database: "products".to_string(),
            username: None,
            password: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self.database = database.into();
        self
    }

    pub fn credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Read side of the store, as seen by the query endpoint
#[async_trait]
pub trait ProductReader: Send + Sync {
    /// Up to `count` products by quantity descending, ranked from 1
    async fn query_top(&self, count: usize) -> StoreResult<Vec<RankedProduct>>;

    /// Liveness probe
    async fn health(&self) -> StoreResult<()>;
}

/// Connected product table
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct ProductStore {
    db: Surreal<Any>,
}

impl ProductStore {
    /// Connect to `ws://host:port` with the default policy (5 attempts, 5s apart)
    pub async fn connect(host: &str, port: u16) -> StoreResult<Self> {
        Self::connect_with(&StoreConfig::remote(host, port), &RetryPolicy::store_default()).await
    }

    /// Connect, sign in, select namespace/database and ensure the schema exists
    ///
    /// The whole sequence is retried under `policy`; exhaustion is reported as
    /// [`StoreError::Unreachable`] and is not retried further.
    pub async fn connect_with(config: &StoreConfig, policy: &RetryPolicy) -> StoreResult<Self> {
        tracing::info!(endpoint = %config.endpoint, "Initializing product store client");

        let db = retry(policy, "store connect", |attempt| async move {
            tracing::debug!(attempt, endpoint = %config.endpoint, "Connecting to product store");
            Self::establish(config).await
        })
        .await
        .map_err(|e| match e {
            RetryError::Exhausted {
                attempts,
                last_error,
            } => StoreError::Unreachable {
                attempts,
                source: last_error,
            },
        })?;

        tracing::info!(
            endpoint = %config.endpoint,
            namespace = %config.namespace,
            database = %config.database,
            "Product store ready"
        );
        Ok(Self { db })
    }

    async fn establish(config: &StoreConfig) -> Result<Surreal<Any>, surrealdb::Error> {
        let db = any::connect(config.endpoint.clone()).await?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;
        db.query(SCHEMA).await?.check()?;

        Ok(db)
    }

    /// Write or replace the row for `title`
    ///
    /// Overwrites, never accumulates: the stored quantity is exactly `quantity`
    /// afterwards.
    pub async fn upsert(&self, title: &str, quantity: u64) -> StoreResult<()> {
        let stored = i64::try_from(quantity).map_err(|_| StoreError::QuantityOutOfRange {
            title: title.to_string(),
            quantity,
        })?;

        self.db
            .query("UPSERT type::thing($table, $key) SET title = $title, quantity = $quantity RETURN NONE")
            .bind(("table", TABLE))
            .bind(("key", record_key(title)))
            .bind(("title", title.to_string()))
            .bind(("quantity", stored))
            .await?
            .check()?;
        Ok(())
    }

    /// Up to `count` rows by quantity descending, ranked from 1
    ///
    /// Tie order is whatever the store returns. `LIMIT` takes a u32, so larger
    /// counts are clamped; no table gets that big.
    pub async fn query_top(&self, count: usize) -> StoreResult<Vec<RankedProduct>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let limit = u32::try_from(count).unwrap_or(u32::MAX);
        let records: Vec<ProductRecord> = self
            .db
            .query("SELECT title, quantity FROM type::table($table) ORDER BY quantity DESC LIMIT $limit")
            .bind(("table", TABLE))
            .bind(("limit", limit))
            .await?
            .take(0)?;

        Ok(RankedProduct::rank_all(records))
    }

    /// Find a single row by title
    pub async fn find(&self, title: &str) -> StoreResult<Option<ProductRecord>> {
        let records: Vec<ProductRecord> = self
            .db
            .query("SELECT title, quantity FROM type::thing($table, $key)")
            .bind(("table", TABLE))
            .bind(("key", record_key(title)))
            .await?
            .take(0)?;
        Ok(records.into_iter().next())
    }

    /// Every row, ordered by title
    pub async fn find_all(&self) -> StoreResult<Vec<ProductRecord>> {
        let records: Vec<ProductRecord> = self
            .db
            .query("SELECT title, quantity FROM type::table($table) ORDER BY title")
            .bind(("table", TABLE))
            .await?
            .take(0)?;
        Ok(records)
    }

    pub async fn health(&self) -> StoreResult<()> {
        self.db.health().await?;
        Ok(())
    }
}

#[async_trait]
impl ProductReader for ProductStore {
    async fn query_top(&self, count: usize) -> StoreResult<Vec<RankedProduct>> {
        ProductStore::query_top(self, count).await
    }

    async fn health(&self) -> StoreResult<()> {
        ProductStore::health(self).await
    }
}
