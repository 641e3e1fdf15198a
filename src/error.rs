// Error taxonomy shared by the credential store, the ledger and the session facade

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Bad or missing user input (empty fields, unparseable amount)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, "Required field is empty")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Unknown user or wrong password. Deliberately does not say which.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid login")]
pub struct AuthenticationError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("json error on {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("spreadsheet error on {}: {source}", path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl TrackerError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, message))
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// A failing writer underneath the csv writer is reported as `Io`
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        if !source.is_io_error() {
            return Self::Csv {
                path: path.into(),
                source,
            };
        }

        match source.into_kind() {
            csv::ErrorKind::Io(err) => Self::io(path, err),
            other => Self::io(path, io::Error::new(io::ErrorKind::Other, format!("{:?}", other))),
        }
    }

    /// A failing writer underneath serde_json is reported as `Io`
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        if source.is_io() {
            return Self::io(path, source.into());
        }

        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub fn xlsx(path: impl Into<PathBuf>, source: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx {
            path: path.into(),
            source,
        }
    }

    /// Validation and authentication failures are reported back to the user;
    /// everything else is a persistence failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrackerError::Validation(_) | TrackerError::Authentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name: Required field is empty");

        let wrapped: TrackerError = err.into();
        assert_eq!(
            wrapped.to_string(),
            "validation failed: name: Required field is empty"
        );
    }

    #[test]
    fn test_authentication_error_hides_reason() {
        let err: TrackerError = AuthenticationError.into();
        assert_eq!(err.to_string(), "invalid login");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(TrackerError::validation("amount", "not a number").is_recoverable());
        assert!(TrackerError::from(AuthenticationError).is_recoverable());

        let io = TrackerError::io(
            "/nowhere/out.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_recoverable());
        assert!(io.to_string().contains("/nowhere/out.csv"));
    }

    struct DeniedWriter;

    impl io::Write for DeniedWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn is_denied_io(err: &TrackerError) -> bool {
        matches!(
            err,
            TrackerError::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied
        )
    }

    #[test]
    fn test_writer_failures_map_to_io() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = TrackerError::csv("/data/expenses.csv", csv::Error::from(denied));
        assert!(is_denied_io(&err));
        assert!(err.to_string().contains("/data/expenses.csv"));

        let source = serde_json::to_writer(DeniedWriter, &vec!["alice"; 4]).unwrap_err();
        let err = TrackerError::json("/data/users.json", source);
        assert!(is_denied_io(&err));
    }

    #[test]
    fn test_format_failures_keep_their_kind() {
        let source = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(
            TrackerError::json("/data/users.json", source),
            TrackerError::Json { .. }
        ));

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("lots".as_bytes());
        let source = rdr.deserialize::<f64>().next().unwrap().unwrap_err();
        assert!(matches!(
            TrackerError::csv("/data/expenses.csv", source),
            TrackerError::Csv { .. }
        ));
    }
}
