use thiserror::Error;

use crate::models::{ReportStatus, MAX_DESCRIPTION_LEN};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),
    #[error("severity must be between 1 and 5, got {0}")]
    SeverityOutOfRange(u8),
    #[error("coordinates out of range: ({0}, {1})")]
    CoordinatesOutOfRange(f64, f64),
    #[error("description exceeds {} characters ({0})", MAX_DESCRIPTION_LEN)]
    DescriptionTooLong(usize),
    #[error("no report with id {0}")]
    NotFound(String),
    #[error("cannot move report from {from} to {to}")]
    InvalidTransition {
        from: ReportStatus,
        to: ReportStatus,
    },
    #[error("a resolution photo is required to mark a report resolved")]
    ResolvedImageRequired,
}
