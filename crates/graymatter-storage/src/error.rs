use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("{entity} is already done: {key}")]
    AlreadyDone { entity: &'static str, key: String },

    #[error(transparent)]
    Invalid(#[from] graymatter_core::error::CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored value out of range: {0}")]
    OutOfRange(String),
}

impl StorageError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StorageError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Map a unique-constraint violation to [`StorageError::Conflict`].
    pub(crate) fn conflict_on_unique(
        e: sqlx::Error,
        entity: &'static str,
        key: impl ToString,
    ) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict {
                entity,
                key: key.to_string(),
            },
            _ => StorageError::Database(e),
        }
    }
}
