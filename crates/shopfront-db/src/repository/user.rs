//! # User Repository
//!
//! Account records for customers and admins. Authentication itself is out
//! of tree; this repository only stores who exists and what role they
//! hold, which is all the workflow engine needs to build a `Caller`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, WorkflowResult};
use crate::repository::new_id;
use shopfront_core::{validation::validate_username, Role, User};

const USER_COLUMNS: &str = "id, username, email, role, created_at";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a new user account.
    ///
    /// ## Errors
    /// * `Validation` - Malformed username
    /// * `Db(UniqueViolation)` - Username or email already taken
    pub async fn create(&self, username: &str, email: &str, role: Role) -> WorkflowResult<User> {
        validate_username(username)?;

        let user = User {
            id: new_id(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };

        debug!(id = %user.id, username = %user.username, "Creating user");

        sqlx::query(
            "INSERT INTO users (id, username, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID, failing if absent.
    pub async fn require(&self, id: &str) -> DbResult<User> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Counts user accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use shopfront_core::Role;

    use crate::error::{DbError, WorkflowError};
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let db = test_db().await;
        let created = db
            .users()
            .create("alice", "alice@example.com", Role::Customer)
            .await
            .unwrap();

        let by_id = db.users().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.role, Role::Customer);

        let by_name = db.users().get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        db.users()
            .create("alice", "alice@example.com", Role::Customer)
            .await
            .unwrap();

        let err = db
            .users()
            .create("alice", "other@example.com", Role::Customer)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Db(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_username_rejected() {
        let db = test_db().await;
        let err = db
            .users()
            .create("not a name", "x@example.com", Role::Customer)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn test_require_missing_user() {
        let db = test_db().await;
        let err = db.users().require("ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
