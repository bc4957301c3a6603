// src/infrastructure/repositories/postgres_account.rs
use super::map_sqlx;
use crate::application::{
    ApplicationResult,
    ports::{
        accounts::{CredentialStore, UserDirectory},
        security::PasswordHasher,
    },
};
use crate::domain::{account::RoleFlags, session::SubjectId};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

/// Credential and role lookups against the `users` table.
///
/// Subjects are the decimal form of `users.id`; any other subject id simply
/// does not exist here.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
    hasher: Arc<dyn PasswordHasher>,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { pool, hasher }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    id: i64,
    password_hash: String,
}

#[derive(Debug, FromRow)]
struct FlagsRow {
    is_admin: bool,
    is_active: bool,
}

fn user_id(subject: &SubjectId) -> Option<i64> {
    subject.as_str().parse::<i64>().ok().filter(|id| *id > 0)
}

#[async_trait]
impl CredentialStore for PostgresAccountStore {
    async fn verify(&self, identifier: &str, secret: &str) -> ApplicationResult<Option<SubjectId>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, password_hash FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let Some(row) = row else {
            return Ok(None);
        };

        if self.hasher.verify(secret, &row.password_hash).await? {
            Ok(Some(SubjectId::from(row.id)))
        } else {
            Ok(None)
        }
    }

    async fn is_active(&self, subject: &SubjectId) -> ApplicationResult<bool> {
        Ok(self
            .get_role_flags(subject)
            .await?
            .is_some_and(|flags| flags.is_active))
    }
}

#[async_trait]
impl UserDirectory for PostgresAccountStore {
    async fn get_role_flags(&self, subject: &SubjectId) -> ApplicationResult<Option<RoleFlags>> {
        let Some(id) = user_id(subject) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, FlagsRow>("SELECT is_admin, is_active FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(row.map(|row| RoleFlags {
            is_admin: row.is_admin,
            is_active: row.is_active,
        }))
    }

    async fn set_active(&self, subject: &SubjectId, is_active: bool) -> ApplicationResult<bool> {
        let Some(id) = user_id(subject) else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1 AND is_active <> $2")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
