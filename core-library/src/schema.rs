//! Versioned schema for the record store
//!
//! Each [`VersionedSchema`] lists the collections introduced at that version.
//! The version already applied to a database file is kept in SQLite's
//! `user_version` header field. Upgrading walks every schema newer than the
//! stored version and creates only the collections that do not exist yet, so
//! running the upgrade twice is a no-op.

use crate::error::{LibraryError, Result};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info, warn};

/// Collection holding [`Song`](crate::models::Song) records
pub const SONGS: &str = "songs";

/// Collection holding [`Playlist`](crate::models::Playlist) records
pub const PLAYLISTS: &str = "playlists";

/// A named keyed collection (one SQLite table)
pub struct Collection {
    pub name: &'static str,
    pub schema: &'static str,
}

const SONGS_COLLECTION_V_1: Collection = Collection {
    name: SONGS,
    schema: "CREATE TABLE IF NOT EXISTS songs (id TEXT NOT NULL PRIMARY KEY, title TEXT NOT NULL, artist TEXT, album TEXT, duration REAL NOT NULL DEFAULT 0, file_path TEXT NOT NULL, file_format TEXT NOT NULL, date_added TEXT NOT NULL)",
};

const PLAYLISTS_COLLECTION_V_1: Collection = Collection {
    name: PLAYLISTS,
    schema: "CREATE TABLE IF NOT EXISTS playlists (id TEXT NOT NULL PRIMARY KEY, name TEXT NOT NULL, song_ids TEXT NOT NULL DEFAULT '[]')",
};

pub struct VersionedSchema {
    pub version: u32,
    pub collections: &'static [Collection],
}

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    collections: &[SONGS_COLLECTION_V_1, PLAYLISTS_COLLECTION_V_1],
}];

/// Highest schema version this build knows how to open
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Outcome of a schema upgrade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from_version: u32,
    pub to_version: u32,
    /// Collections created by this run, in creation order
    pub created: Vec<&'static str>,
}

impl SchemaUpgrade {
    pub fn is_noop(&self) -> bool {
        self.from_version == self.to_version && self.created.is_empty()
    }
}

/// Read the schema version stored in the database header
pub async fn stored_version(conn: &mut SqliteConnection) -> Result<u32> {
    let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;

    u32::try_from(version).map_err(|_| {
        LibraryError::StoreUnavailable(format!("corrupt schema version {version}"))
    })
}

/// Check whether a collection exists
pub async fn collection_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;

    Ok(count > 0)
}

/// Bring the database up to [`CURRENT_SCHEMA_VERSION`]
///
/// Runs in a single transaction. Fails with
/// [`LibraryError::StoreUnavailable`] when the file was written by a newer
/// build.
pub async fn upgrade(pool: &SqlitePool) -> Result<SchemaUpgrade> {
    let mut tx = pool.begin().await?;
    let from_version = stored_version(&mut tx).await?;

    if from_version > CURRENT_SCHEMA_VERSION {
        warn!(
            stored = from_version,
            supported = CURRENT_SCHEMA_VERSION,
            "Store was written by a newer schema"
        );
        return Err(LibraryError::StoreUnavailable(format!(
            "schema version {from_version} is newer than supported version {CURRENT_SCHEMA_VERSION}"
        )));
    }

    let mut created = Vec::new();
    for schema in VERSIONED_SCHEMAS
        .iter()
        .filter(|schema| schema.version > from_version)
    {
        apply(&mut tx, schema, &mut created).await?;
    }

    if from_version < CURRENT_SCHEMA_VERSION {
        // PRAGMA does not accept bound parameters
        let pragma = format!("PRAGMA user_version = {CURRENT_SCHEMA_VERSION}");
        sqlx::query(&pragma).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    let upgrade = SchemaUpgrade {
        from_version,
        to_version: CURRENT_SCHEMA_VERSION,
        created,
    };

    if upgrade.is_noop() {
        debug!(version = CURRENT_SCHEMA_VERSION, "Schema up to date");
    } else {
        info!(
            from_version = upgrade.from_version,
            to_version = upgrade.to_version,
            created = ?upgrade.created,
            "Schema upgraded"
        );
    }

    Ok(upgrade)
}

async fn apply(
    tx: &mut Transaction<'_, Sqlite>,
    schema: &VersionedSchema,
    created: &mut Vec<&'static str>,
) -> Result<()> {
    for collection in schema.collections {
        if collection_exists(tx, collection.name).await? {
            debug!(
                collection = collection.name,
                version = schema.version,
                "Collection already exists"
            );
            continue;
        }

        sqlx::query(collection.schema).execute(&mut **tx).await?;
        debug!(
            collection = collection.name,
            version = schema.version,
            "Created collection"
        );
        created.push(collection.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn raw_memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_creates_both_collections() {
        let pool = raw_memory_pool().await;

        let upgrade = upgrade(&pool).await.unwrap();

        assert_eq!(upgrade.from_version, 0);
        assert_eq!(upgrade.to_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(upgrade.created, vec![SONGS, PLAYLISTS]);

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(stored_version(&mut conn).await.unwrap(), CURRENT_SCHEMA_VERSION);
        assert!(collection_exists(&mut conn, SONGS).await.unwrap());
        assert!(collection_exists(&mut conn, PLAYLISTS).await.unwrap());
    }

    #[tokio::test]
    async fn test_upgrade_is_idempotent() {
        let pool = raw_memory_pool().await;

        upgrade(&pool).await.unwrap();
        let second = upgrade(&pool).await.unwrap();

        assert!(second.is_noop());
        assert!(second.created.is_empty());
    }

    #[tokio::test]
    async fn test_existing_collection_is_not_recreated() {
        let pool = raw_memory_pool().await;

        // A store left at version 0 that already has one of the collections
        sqlx::query(SONGS_COLLECTION_V_1.schema)
            .execute(&pool)
            .await
            .unwrap();

        let upgrade = upgrade(&pool).await.unwrap();
        assert_eq!(upgrade.from_version, 0);
        assert_eq!(upgrade.created, vec![PLAYLISTS]);
    }

    #[tokio::test]
    async fn test_newer_schema_is_rejected() {
        let pool = raw_memory_pool().await;
        sqlx::query("PRAGMA user_version = 99")
            .execute(&pool)
            .await
            .unwrap();

        let result = upgrade(&pool).await;
        assert!(matches!(result, Err(LibraryError::StoreUnavailable(_))));
    }

    #[test]
    fn test_schema_table_is_monotonic() {
        let versions: Vec<u32> = VERSIONED_SCHEMAS.iter().map(|s| s.version).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(versions.last().copied(), Some(CURRENT_SCHEMA_VERSION));
    }
}
