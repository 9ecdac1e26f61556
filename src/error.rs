use thiserror::Error;

use crate::engine::{AllocError, DiagRecord};
use crate::status::{CODE_ERROR, Status};

/// Failures a driver operation can report.
///
/// Informational outcomes (connected, closed, row fetched, no more rows)
/// are not errors; they surface as code-0 [`Status`] values instead.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Precondition violation or other failure that did not originate
    /// from the engine: missing connection string, allocation failure,
    /// an operation attempted without a live connection, or an
    /// unsupported column type.
    #[error("{0}")]
    Internal(String),

    /// The engine rejected the connection attempt. Carries the
    /// connection-context diagnostic text.
    #[error("failed to connect: {0}")]
    ConnectFailed(String),

    /// The engine rejected command execution. Carries the
    /// statement-context diagnostic text.
    #[error("query failed: {0}")]
    QueryFailed(String),
}

impl From<AllocError> for DriverError {
    fn from(err: AllocError) -> Self {
        DriverError::Internal(err.to_string())
    }
}

impl From<&DriverError> for Status {
    fn from(err: &DriverError) -> Self {
        Status::build(None, CODE_ERROR, &err.to_string())
    }
}

/// Message text of a diagnostic record, or empty when the engine had no
/// record to give.
pub(crate) fn diag_message(diag: Option<DiagRecord>) -> String {
    diag.map(|record| record.message).unwrap_or_default()
}
