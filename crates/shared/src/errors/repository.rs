use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            SqlxError::Database(db_err) => {
                let message = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    RepositoryError::AlreadyExists(message)
                } else if db_err.is_foreign_key_violation() {
                    RepositoryError::ForeignKey(message)
                } else if db_err.is_check_violation() {
                    RepositoryError::Conflict(message)
                } else {
                    RepositoryError::Sqlx(SqlxError::Database(db_err))
                }
            }
            other => RepositoryError::Sqlx(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = RepositoryError::from(SqlxError::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_errors_are_wrapped() {
        let err = RepositoryError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Sqlx(_)));
    }
}
