//! Error types for hallticket.
//!
//! Every library boundary (record store, code encoder, renderer, registry)
//! returns [`Result`]. The binary decides how to surface each failure; use
//! [`Error::kind`] to tell I/O trouble from bad input or a failed render.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for hallticket operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// The backing file could not be read or parsed as CSV.
    #[error("failed to read record store {path}: {source}")]
    StoreRead {
        /// Path to the backing file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// The backing file could not be rewritten.
    #[error("failed to write record store {path}: {source}")]
    StoreWrite {
        /// Path to the backing file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// A stored row could not be turned into a record.
    #[error("malformed row at line {line}: {message}")]
    MalformedRow {
        /// 1-based line in the backing file.
        line: u64,
        /// What was wrong with the row.
        message: String,
    },

    // === Input Errors ===
    /// A scanned code payload lacked the `ticket:roll` shape.
    #[error("invalid code payload '{payload}': expected <hall_ticket_id>:<roll_number>")]
    InvalidCodePayload {
        /// The payload as received.
        payload: String,
    },

    /// Program name did not match any offered program.
    #[error("unknown program '{0}'")]
    UnknownProgram(String),

    /// Semester label outside 1st..8th.
    #[error("unknown semester '{0}'")]
    UnknownSemester(String),

    /// Date text in neither YYYY-MM-DD nor DD-MM-YYYY form.
    #[error("invalid date '{0}': expected YYYY-MM-DD or DD-MM-YYYY")]
    InvalidDate(String),

    /// A generation form field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// No record matched a lookup.
    #[error("no hall ticket found for roll number {roll_number} and ticket {hall_ticket_id}")]
    NotFound {
        /// Roll number searched for.
        roll_number: String,
        /// Ticket id searched for.
        hall_ticket_id: String,
    },

    // === Rendering Errors ===
    /// The payload could not be encoded as a QR symbol.
    #[error("failed to encode QR code: {0}")]
    CodeEncode(String),

    /// The PDF document could not be assembled.
    #[error("failed to build PDF: {0}")]
    Pdf(String),

    /// Reading or writing a raster image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for hallticket operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes used by the shell to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store or artifact I/O.
    Io,
    /// User or file input that could not be understood.
    MalformedInput,
    /// QR or PDF production.
    Rendering,
    /// Configuration loading or validation.
    Config,
    /// Lookup found nothing.
    NotFound,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid input error for a form field.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Create a PDF assembly error.
    #[must_use]
    pub fn pdf(message: impl ToString) -> Self {
        Self::Pdf(message.to_string())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StoreRead { .. }
            | Self::StoreWrite { .. }
            | Self::Io(_)
            | Self::DirectoryCreate { .. } => ErrorKind::Io,
            Self::MalformedRow { .. }
            | Self::InvalidCodePayload { .. }
            | Self::UnknownProgram(_)
            | Self::UnknownSemester(_)
            | Self::InvalidDate(_)
            | Self::InvalidInput { .. }
            | Self::Json(_) => ErrorKind::MalformedInput,
            Self::CodeEncode(_) | Self::Pdf(_) | Self::Image(_) => ErrorKind::Rendering,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Check if this error means a lookup matched nothing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_code_payload_display() {
        let err = Error::InvalidCodePayload {
            payload: "ABCDEFGH".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ABCDEFGH"));
        assert!(msg.contains("<hall_ticket_id>:<roll_number>"));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            roll_number: "R100".to_string(),
            hall_ticket_id: "1A2B3C4D".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("R100"));
        assert!(err.to_string().contains("1A2B3C4D"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input("name", "must not be blank");
        assert_eq!(err.to_string(), "invalid name: must not be blank");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_rendering_kinds() {
        assert_eq!(Error::pdf("xref").kind(), ErrorKind::Rendering);
        assert_eq!(
            Error::CodeEncode("data too long".to_string()).kind(),
            ErrorKind::Rendering
        );
    }

    #[test]
    fn test_config_validation_kind() {
        let err = Error::ConfigValidation {
            message: "code_size_px too small".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("code_size_px"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
