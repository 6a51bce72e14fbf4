//! Error type shared by the generator, the ingestion pipeline and the CLI.

use std::fmt;
use std::path::PathBuf;

/// Error type for all pipeline operations
#[derive(Debug)]
pub enum EcomError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    Connection(diesel::ConnectionError),
    Database(diesel::result::Error),
    InvalidIdentifier(String),
    Config(String),
    Json(serde_json::Error),
}

impl EcomError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EcomError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for EcomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcomError::Io { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
            // csv errors carry their own "CSV ... error:" prefix
            EcomError::Csv(e) => write!(f, "{}", e),
            EcomError::Connection(e) => write!(f, "Database connection error: {}", e),
            EcomError::Database(e) => write!(f, "Database error: {}", e),
            EcomError::InvalidIdentifier(name) => {
                write!(f, "Invalid SQL identifier: '{}'", name)
            }
            EcomError::Config(msg) => write!(f, "Configuration error: {}", msg),
            EcomError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for EcomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EcomError::Io { source, .. } => Some(source),
            EcomError::Csv(e) => Some(e),
            EcomError::Connection(e) => Some(e),
            EcomError::Database(e) => Some(e),
            EcomError::Json(e) => Some(e),
            EcomError::InvalidIdentifier(_) | EcomError::Config(_) => None,
        }
    }
}

impl From<csv::Error> for EcomError {
    fn from(err: csv::Error) -> Self {
        EcomError::Csv(err)
    }
}

impl From<diesel::ConnectionError> for EcomError {
    fn from(err: diesel::ConnectionError) -> Self {
        EcomError::Connection(err)
    }
}

impl From<diesel::result::Error> for EcomError {
    fn from(err: diesel::result::Error) -> Self {
        EcomError::Database(err)
    }
}

impl From<serde_json::Error> for EcomError {
    fn from(err: serde_json::Error) -> Self {
        EcomError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, EcomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = EcomError::io(
            "products.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("products.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_invalid_identifier_display() {
        let err = EcomError::InvalidIdentifier("orders; DROP".to_string());
        assert_eq!(err.to_string(), "Invalid SQL identifier: 'orders; DROP'");
    }

    #[test]
    fn test_csv_error_prefix_not_repeated() {
        let mut reader = csv::Reader::from_reader("a,b\n1,2,3\n".as_bytes());
        let err = reader
            .records()
            .next()
            .unwrap()
            .map(|_| ())
            .map_err(EcomError::from)
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("CSV error:"));
        assert_eq!(msg.matches("CSV error").count(), 1);
    }
}
