//! PostgreSQL-backed user repository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    database::CollectionName,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, age, version, created_at, updated_at";

/// SQL text rendered once for the configured collection
#[derive(Debug)]
struct UserQueries {
    insert: String,
    find_by_id: String,
    find_by_email: String,
    update_name: String,
    delete: String,
    list: String,
}

impl UserQueries {
    fn new(collection: &CollectionName) -> Self {
        Self {
            insert: format!(
                r#"
                INSERT INTO {collection} (name, email, password_hash, age, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#
            ),
            find_by_id: format!("SELECT {USER_COLUMNS} FROM {collection} WHERE id = $1"),
            find_by_email: format!(
                r#"
                SELECT {USER_COLUMNS} FROM {collection}
                WHERE email = $1
                ORDER BY password_hash IS NULL, created_at, id
                LIMIT 1
                "#
            ),
            update_name: format!(
                r#"
                UPDATE {collection}
                SET name = $2, updated_at = $3, version = version + 1
                WHERE id = $1
                "#
            ),
            delete: format!("DELETE FROM {collection} WHERE id = $1"),
            list: format!("SELECT {USER_COLUMNS} FROM {collection} ORDER BY created_at, id"),
        }
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    queries: Arc<UserQueries>,
}

impl UserRepository {
    /// Create a new user repository over `collection`
    pub fn new(pool: PgPool, collection: CollectionName) -> Self {
        Self {
            pool,
            queries: Arc::new(UserQueries::new(&collection)),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: NewUser) -> DatabaseResult<Uuid> {
        info!("Inserting user: {}", user.email);

        sqlx::query_scalar(&self.queries.insert)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.age)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        sqlx::query_as(&self.queries.find_by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        sqlx::query_as(&self.queries.find_by_email)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn update_name(
        &self,
        id: Uuid,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<u64> {
        info!("Updating name of user: {}", id);

        let result = sqlx::query(&self.queries.update_name)
            .bind(id)
            .bind(name)
            .bind(updated_at)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<u64> {
        info!("Deleting user: {}", id);

        let result = sqlx::query(&self.queries.delete)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        sqlx::query_as(&self.queries.list)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        database::{DatabaseConfig, init_pool},
        migrations::Migrator,
    };

    #[test]
    fn test_queries_use_configured_collection() {
        let queries = UserQueries::new(&CollectionName::parse("shop_users").unwrap());
        for sql in [
            &queries.insert,
            &queries.find_by_id,
            &queries.find_by_email,
            &queries.update_name,
            &queries.delete,
            &queries.list,
        ] {
            assert!(sql.contains("shop_users"), "{}", sql);
        }
    }

    #[test]
    fn test_update_bumps_version() {
        let queries = UserQueries::new(&CollectionName::parse("users").unwrap());
        assert!(queries.update_name.contains("version = version + 1"));
        assert!(!queries.update_name.contains("email"));
    }

    #[test]
    fn test_find_by_email_prefers_accounts_with_password() {
        let queries = UserQueries::new(&CollectionName::parse("users").unwrap());
        assert!(
            queries
                .find_by_email
                .contains("ORDER BY password_hash IS NULL, created_at, id")
        );
    }

    #[test]
    fn test_list_has_no_limit() {
        let queries = UserQueries::new(&CollectionName::parse("users").unwrap());
        assert!(!queries.list.contains("LIMIT"));
        assert!(!queries.list.contains("WHERE"));
    }

    fn new_user(name: &str, email: &str, password_hash: Option<&str>) -> NewUser {
        let now = Utc::now();
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.map(str::to_string),
            age: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Runs every store operation against a freshly migrated collection
    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_repository_against_postgres() -> Result<(), Box<dyn std::error::Error>> {
        let config = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DatabaseConfig::default().url),
            name: String::new(),
            collection: "repository_users".to_string(),
            ..DatabaseConfig::default()
        };
        let pool = init_pool(&config).await?;
        let collection = config.collection_name()?;
        let migrator = Migrator::new(collection.clone());
        while migrator.revert_last(&pool).await?.is_some() {}
        migrator.run_pending(&pool).await?;

        let repository = UserRepository::new(pool.clone(), collection);

        let first = repository
            .insert(new_user("John Doe", "john.doe@example.com", None))
            .await?;
        let second = repository
            .insert(new_user(
                "John",
                "john.doe@example.com",
                Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
            ))
            .await?;
        assert_ne!(first, second);

        let stored = repository.find_by_id(first).await?.expect("inserted user");
        assert_eq!(stored.name, "John Doe");
        assert_eq!(stored.password_hash, None);
        assert_eq!(stored.age, 0);
        assert_eq!(stored.version, 1);
        assert!(repository.find_by_id(uuid::Uuid::new_v4()).await?.is_none());

        // The account with a password wins over the older one without
        let by_email = repository
            .find_by_email("john.doe@example.com")
            .await?
            .expect("user by email");
        assert_eq!(by_email.id, second);
        assert!(repository.find_by_email("nobody@example.com").await?.is_none());

        let renamed_at = Utc::now();
        assert_eq!(repository.update_name(first, "Jane Doe", renamed_at).await?, 1);
        let renamed = repository.find_by_id(first).await?.expect("renamed user");
        assert_eq!(renamed.name, "Jane Doe");
        assert_eq!(renamed.version, 2);
        assert!(renamed.updated_at >= renamed.created_at);
        assert_eq!(
            repository
                .update_name(uuid::Uuid::new_v4(), "Ghost", renamed_at)
                .await?,
            0
        );

        let ids: Vec<_> = repository.list().await?.into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![first, second]);

        assert_eq!(repository.delete(first).await?, 1);
        assert_eq!(repository.delete(first).await?, 0);
        assert_eq!(repository.list().await?.len(), 1);

        while migrator.revert_last(&pool).await?.is_some() {}

        Ok(())
    }
}
