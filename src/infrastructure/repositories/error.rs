// src/infrastructure/repositories/error.rs
use crate::domain::errors::DomainError;

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound("record not found".into()),
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                if code.as_ref() == "23514" {
                    return DomainError::Validation("check constraint violated".into());
                }
            }
            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
