use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Duplicate key in {collection}: {id}")]
    DuplicateKey { collection: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => {
                LibraryError::StoreUnavailable("record store is closed".to_string())
            }
            other => LibraryError::Database(other),
        }
    }
}

impl LibraryError {
    /// Translate an insert failure, turning primary-key collisions into
    /// [`LibraryError::DuplicateKey`].
    pub(crate) fn from_insert(err: sqlx::Error, collection: &str, id: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LibraryError::DuplicateKey {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
            }
            _ => LibraryError::from(err),
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, LibraryError::DuplicateKey { .. })
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
