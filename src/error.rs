use crate::connection::Cursor;
use std::fmt::{self, Display};
use thiserror::Error;

/// Which pagination argument a validation error is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentField {
    First,
    Last,
    After,
    Before,
}

impl ArgumentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::After => "after",
            Self::Before => "before",
        }
    }
}

impl Display for ArgumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentErrorKind {
    /// Neither `first` nor `last` was provided.
    MissingBound,
    /// Arguments for both traversal directions were mixed in one request.
    ConflictingBounds,
    /// `first`/`last` is above the configured maximum page size.
    LimitExceeded,
    /// `first`/`last` is below zero.
    NegativeLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", message(.kind, .field))]
pub struct PaginationArgumentError {
    pub kind: ArgumentErrorKind,
    pub field: ArgumentField,
}

impl PaginationArgumentError {
    pub fn new(kind: ArgumentErrorKind, field: ArgumentField) -> Self {
        Self { kind, field }
    }
}

fn message(kind: &ArgumentErrorKind, field: &ArgumentField) -> String {
    match kind {
        ArgumentErrorKind::MissingBound => {
            "A non-null value for `first` or `last` must be provided.".into()
        }
        ArgumentErrorKind::ConflictingBounds => format!(
            "Argument `{field}` cannot be provided together with the other traversal direction."
        ),
        ArgumentErrorKind::LimitExceeded => {
            format!("Argument `{field}` is above the maximum page size.")
        }
        ArgumentErrorKind::NegativeLimit => format!("Argument `{field}` must not be negative."),
    }
}

/// Every rule violation found by the accumulating validator. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid pagination argument(s): {}", .0.len(), join(.0))]
pub struct ArgumentErrors(pub(crate) Vec<PaginationArgumentError>);

impl ArgumentErrors {
    pub fn errors(&self) -> &[PaginationArgumentError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<PaginationArgumentError> {
        self.0
    }
}

fn join(errors: &[PaginationArgumentError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}

/// The bound cursor did not reappear at the head of the re-fetched window.
///
/// Retrying the same request will not help; pagination has to restart from
/// the beginning of the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cursor `{provided_cursor}` no longer identifies a valid position in this connection")]
pub struct InvalidCursorError {
    pub provided_cursor: Cursor,
}

#[derive(Debug, Error)]
pub enum PagerError {
    #[error(transparent)]
    Argument(#[from] PaginationArgumentError),

    #[error(transparent)]
    Arguments(#[from] ArgumentErrors),

    #[error(transparent)]
    InvalidCursor(#[from] InvalidCursorError),

    #[error("Database driver error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Pager Config Error: {0}")]
    ConfigError(String),

    #[error("Uncaught Error type")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type PagerResult<T> = std::result::Result<T, PagerError>;
