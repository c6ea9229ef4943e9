use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::user::errors::DirectoryError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Group;
use crate::domain::user::models::Identity;
use crate::domain::user::models::UserName;
use crate::domain::user::models::UserRecord;
use crate::domain::user::ports::UserDirectory;

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    user_name: String,
    group_id: i64,
    email: String,
    email_verified: bool,
    password_hash: String,
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    user_name: String,
    group_id: i64,
    email: String,
    email_verified: bool,
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: i64,
    name: String,
    roles: Vec<String>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: row.id,
            user_name: row.user_name,
            group_id: row.group_id,
            email: row.email,
            email_verified: row.email_verified,
        }
    }
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            identity: Identity {
                id: row.id,
                user_name: row.user_name,
                group_id: row.group_id,
                email: row.email,
                email_verified: row.email_verified,
            },
            password_hash: row.password_hash,
        }
    }
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            roles: row.roles,
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, user_name, group_id, email, email_verified, password_hash
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_identity(&self, id: i64) -> Result<Option<Identity>, DirectoryError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, user_name, group_id, email, email_verified
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        Ok(row.map(Identity::from))
    }

    async fn find_group(&self, group_id: i64) -> Result<Option<Group>, DirectoryError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, roles
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        Ok(row.map(Group::from))
    }

    async fn create_user(
        &self,
        user_name: &UserName,
        email: &EmailAddress,
        password_hash: String,
    ) -> Result<Identity, DirectoryError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO users (user_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, user_name, group_id, email, email_verified
            "#,
        )
        .bind(user_name.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_user_name_key") {
                        return DirectoryError::UserNameTaken(user_name.as_str().to_string());
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        return DirectoryError::EmailTaken(email.as_str().to_string());
                    }
                }
            }
            DirectoryError::Database(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn mark_email_verified(&self, user_id: i64) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email_verified = TRUE
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(user_id.to_string()));
        }

        Ok(())
    }

    async fn set_password_hash(
        &self,
        user_id: i64,
        password_hash: String,
    ) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(user_id.to_string()));
        }

        Ok(())
    }
}
