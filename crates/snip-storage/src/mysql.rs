use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::repository::Result;
use snip_core::{
    AccessLogEntry, AccessLogId, AccessLogRepository, Link, LinkId, LinkRepository, NewAccessLogEntry,
    NewLink, ReadLinkRepository, ShortCode, StorageError,
};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

const LINKS_DDL: &str = include_str!("../ddl/mysql/links.sql");
const ACCESS_LOG_ENTRIES_DDL: &str = include_str!("../ddl/mysql/access_log_entries.sql");

/// Connection settings for [`MySqlRepository::connect_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlSettings {
    #[builder(setter(into))]
    pub database_url: String,
    /// How long a request waits for a pooled connection before failing with
    /// [`StorageError::Timeout`].
    #[builder(default = Duration::from_secs(5))]
    pub acquire_timeout: Duration,
    #[builder(default = 10)]
    pub max_connections: u32,
}

/// MySQL implementation of the link and access log stores.
///
/// Timestamps are persisted as unix milliseconds in `BIGINT` columns, so a
/// stored value is always a UTC instant and reads never have to guess a
/// zone. Values written through this repository are truncated to
/// millisecond precision, and the returned records reflect that.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool with
    /// default settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(MySqlSettings::builder().database_url(database_url).build()).await
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect_with(settings: MySqlSettings) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Creates the `links` and `access_log_entries` tables if they are absent.
    ///
    /// Idempotent; run it once before serving traffic.
    pub async fn bootstrap(&self) -> Result<()> {
        for ddl in [LINKS_DDL, ACCESS_LOG_ENTRIES_DDL] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        info!("mysql schema is ready");
        Ok(())
    }
}

fn to_millis(ts: Timestamp) -> i64 {
    ts.as_millisecond()
}

fn from_millis(column: &str, millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{millis}': {e}"))
    })
}

fn truncate_to_millis(ts: Timestamp) -> Result<Timestamp> {
    from_millis("timestamp", to_millis(ts))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn link_from_row(row: &MySqlRow) -> Result<Link> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let expires_at: i64 = row.try_get("expires_at").map_err(map_sqlx_error)?;
    let password_hash: Option<String> = row.try_get("password_hash").map_err(map_sqlx_error)?;

    Ok(Link {
        id: LinkId(id),
        original_url,
        short_code: ShortCode::new_unchecked(short_code),
        created_at: from_millis("created_at", created_at)?,
        expires_at: from_millis("expires_at", expires_at)?,
        password_hash,
    })
}

fn access_log_entry_from_row(row: &MySqlRow) -> Result<AccessLogEntry> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let link_id: i64 = row.try_get("link_id").map_err(map_sqlx_error)?;
    let accessed_at: i64 = row.try_get("accessed_at").map_err(map_sqlx_error)?;
    let client_ip: String = row.try_get("client_ip").map_err(map_sqlx_error)?;

    Ok(AccessLogEntry {
        id: AccessLogId(id),
        link_id: LinkId(link_id),
        accessed_at: from_millis("accessed_at", accessed_at)?,
        client_ip,
    })
}

fn inserted_id(result: &sqlx::mysql::MySqlQueryResult) -> Result<i64> {
    i64::try_from(result.last_insert_id()).map_err(|_| {
        StorageError::InvalidData(format!(
            "inserted id {} does not fit in BIGINT",
            result.last_insert_id()
        ))
    })
}

#[async_trait]
impl ReadLinkRepository for MySqlRepository {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at, expires_at, password_hash
            FROM links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(link_from_row).transpose()
    }
}

#[async_trait]
impl LinkRepository for MySqlRepository {
    async fn create(&self, link: NewLink) -> Result<Link> {
        let link = NewLink {
            created_at: truncate_to_millis(link.created_at)?,
            expires_at: truncate_to_millis(link.expires_at)?,
            ..link
        };

        // A single INSERT against the unique key: a conflicting write is
        // rejected by the server and leaves no row behind.
        let result = sqlx::query(
            r#"
            INSERT INTO links (original_url, short_code, created_at, expires_at, password_hash)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.original_url)
        .bind(link.short_code.as_str())
        .bind(to_millis(link.created_at))
        .bind(to_millis(link.expires_at))
        .bind(link.password_hash.as_deref())
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => {
                let id = LinkId(inserted_id(&result)?);
                debug!(code = %link.short_code, id = %id, "stored link");
                Ok(link.into_link(id))
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::DuplicateCode(link.short_code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}

#[async_trait]
impl AccessLogRepository for MySqlRepository {
    async fn append(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry> {
        let entry = NewAccessLogEntry {
            accessed_at: truncate_to_millis(entry.accessed_at)?,
            ..entry
        };

        let result = sqlx::query(
            r#"
            INSERT INTO access_log_entries (link_id, accessed_at, client_ip)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(entry.link_id.0)
        .bind(to_millis(entry.accessed_at))
        .bind(&entry.client_ip)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(entry.into_entry(AccessLogId(inserted_id(&result)?)))
    }

    async fn list_by_link_id(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, link_id, accessed_at, client_ip
            FROM access_log_entries
            WHERE link_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(link_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(access_log_entry_from_row).collect()
    }

    async fn count_by_link_id(&self, link_id: LinkId) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM access_log_entries
            WHERE link_id = ?
            "#,
        )
        .bind(link_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        u64::try_from(count)
            .map_err(|_| StorageError::InvalidData(format!("negative row count {count}")))
    }
}
