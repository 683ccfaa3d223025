//! Versioned schema migrations for the user collection
//!
//! Migrations are plain SQL rendered against the configured collection name
//! and tracked per collection in `_shop_migrations`, so several collections
//! can share one database.

use sqlx::{PgPool, Row};
use tracing::info;

use crate::{
    database::CollectionName,
    error::{DatabaseError, DatabaseResult},
};

const TRACKING_TABLE: &str = "_shop_migrations";

/// A reversible schema change
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    up: fn(&CollectionName) -> Vec<String>,
    down: fn(&CollectionName) -> Vec<String>,
}

impl Migration {
    pub fn up_statements(&self, collection: &CollectionName) -> Vec<String> {
        (self.up)(collection)
    }

    pub fn down_statements(&self, collection: &CollectionName) -> Vec<String> {
        (self.down)(collection)
    }
}

/// All known migrations, oldest first
pub static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_users",
        up: |c| {
            vec![
                format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS {c} (
                        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                        name TEXT NOT NULL DEFAULT '',
                        email TEXT NOT NULL DEFAULT '',
                        password_hash TEXT,
                        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                    )
                    "#
                ),
                // Non-unique on purpose: duplicate emails are not rejected here.
                format!(
                    "CREATE INDEX IF NOT EXISTS \"{}_email_idx\" ON {c} (email)",
                    c.as_str()
                ),
            ]
        },
        down: |c| vec![format!("DROP TABLE IF EXISTS {c}")],
    },
    Migration {
        version: 2,
        description: "add_user_age",
        up: |c| {
            vec![
                format!("ALTER TABLE {c} ADD COLUMN IF NOT EXISTS age INTEGER"),
                format!("UPDATE {c} SET age = 0 WHERE age IS NULL"),
                format!("ALTER TABLE {c} ALTER COLUMN age SET DEFAULT 0"),
                format!("ALTER TABLE {c} ALTER COLUMN age SET NOT NULL"),
            ]
        },
        down: |c| vec![format!("ALTER TABLE {c} DROP COLUMN IF EXISTS age")],
    },
    Migration {
        version: 3,
        description: "add_user_version",
        up: |c| {
            vec![format!(
                "ALTER TABLE {c} ADD COLUMN IF NOT EXISTS version BIGINT NOT NULL DEFAULT 1"
            )]
        },
        down: |c| vec![format!("ALTER TABLE {c} DROP COLUMN IF EXISTS version")],
    },
];

/// Applies and reverts [`MIGRATIONS`] for one collection
#[derive(Debug, Clone)]
pub struct Migrator {
    collection: CollectionName,
}

impl Migrator {
    pub fn new(collection: CollectionName) -> Self {
        Self { collection }
    }

    async fn ensure_tracking_table(&self, pool: &PgPool) -> DatabaseResult<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {TRACKING_TABLE} (
                collection TEXT NOT NULL,
                version BIGINT NOT NULL,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, version)
            )
            "#
        ))
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(())
    }

    /// Versions already applied to this collection, ascending
    pub async fn applied_versions(&self, pool: &PgPool) -> DatabaseResult<Vec<i64>> {
        self.ensure_tracking_table(pool).await?;

        let rows = sqlx::query(&format!(
            "SELECT version FROM {TRACKING_TABLE} WHERE collection = $1 ORDER BY version"
        ))
        .bind(self.collection.as_str())
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(|row| row.get("version")).collect())
    }

    /// Apply every migration not yet recorded, returning the versions applied
    pub async fn run_pending(&self, pool: &PgPool) -> DatabaseResult<Vec<i64>> {
        let applied = self.applied_versions(pool).await?;
        let mut newly_applied = Vec::new();

        for migration in pending(&applied) {
            info!(
                "Applying migration {} ({}) to {}",
                migration.version, migration.description, self.collection
            );

            let mut tx = pool.begin().await.map_err(DatabaseError::Query)?;
            for statement in migration.up_statements(&self.collection) {
                sqlx::query(&statement)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| self.failed(migration, e))?;
            }
            sqlx::query(&format!(
                "INSERT INTO {TRACKING_TABLE} (collection, version, description) VALUES ($1, $2, $3)"
            ))
            .bind(self.collection.as_str())
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| self.failed(migration, e))?;
            tx.commit().await.map_err(DatabaseError::Query)?;

            newly_applied.push(migration.version);
        }

        Ok(newly_applied)
    }

    /// Roll back the newest applied migration, if any
    pub async fn revert_last(&self, pool: &PgPool) -> DatabaseResult<Option<i64>> {
        let applied = self.applied_versions(pool).await?;
        let Some(&latest) = applied.last() else {
            return Ok(None);
        };
        let migration = MIGRATIONS
            .iter()
            .find(|m| m.version == latest)
            .ok_or_else(|| {
                DatabaseError::Migration(format!("Unknown applied migration version {}", latest))
            })?;

        info!(
            "Reverting migration {} ({}) on {}",
            migration.version, migration.description, self.collection
        );

        let mut tx = pool.begin().await.map_err(DatabaseError::Query)?;
        for statement in migration.down_statements(&self.collection) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.failed(migration, e))?;
        }
        sqlx::query(&format!(
            "DELETE FROM {TRACKING_TABLE} WHERE collection = $1 AND version = $2"
        ))
        .bind(self.collection.as_str())
        .bind(migration.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| self.failed(migration, e))?;
        tx.commit().await.map_err(DatabaseError::Query)?;

        Ok(Some(latest))
    }

    fn failed(&self, migration: &Migration, err: sqlx::Error) -> DatabaseError {
        DatabaseError::Migration(format!(
            "migration {} ({}) on {} failed: {}",
            migration.version, migration.description, self.collection, err
        ))
    }
}

fn pending(applied: &[i64]) -> impl Iterator<Item = &'static Migration> + '_ {
    MIGRATIONS
        .iter()
        .filter(move |m| !applied.contains(&m.version))
}
