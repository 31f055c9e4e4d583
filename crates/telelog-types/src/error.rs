use thiserror::Error;

/// Errors from repository operations (used by trait definitions in telelog-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the ledger service to the dispatcher and CLI.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("user not found")]
    UserNotFound,

    /// Concurrent-upsert race on the unique telegram id. The caller may
    /// retry the lookup-then-use sequence; there is no internal retry loop.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for LedgerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => LedgerError::UserNotFound,
            RepositoryError::Conflict(msg) => LedgerError::Conflict(msg),
            RepositoryError::Connection => {
                LedgerError::Storage("database connection error".to_string())
            }
            RepositoryError::Query(msg) => LedgerError::Storage(msg),
        }
    }
}

/// Errors loading the bot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(String),

    #[error("invalid config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_ledger_error_from_not_found() {
        let err: LedgerError = RepositoryError::NotFound.into();
        assert!(matches!(err, LedgerError::UserNotFound));
    }

    #[test]
    fn test_ledger_error_from_conflict_keeps_message() {
        let err: LedgerError = RepositoryError::Conflict("telegram_id 42".to_string()).into();
        assert_eq!(err.to_string(), "conflict: telegram_id 42");
    }

    #[test]
    fn test_ledger_error_from_connection() {
        let err: LedgerError = RepositoryError::Connection.into();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
