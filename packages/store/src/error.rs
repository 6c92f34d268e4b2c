//! Error types shared by the client and the server.

use thiserror::Error;

/// Failure of a Content Store operation as seen by the sync client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("failed to read {0}")]
    StoreRead(String),

    #[error("failed to write {0}")]
    StoreWrite(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid row: {0}")]
    Schema(#[from] SchemaError),

    #[error("change feed error: {0}")]
    Feed(String),
}

/// A row or change payload that does not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("unknown operation `{op}` on `{table}`")]
    UnknownOperation { table: String, op: String },
}

/// Rejection of an image before anything is uploaded or stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file is {size} bytes, the limit is 5 MiB")]
    FileTooLarge { size: u64 },

    #[error("unsupported image type `{mime}`, use JPEG or PNG")]
    UnsupportedType { mime: String },

    #[error("not a usable image: {reason}")]
    InvalidImage { reason: String },
}
