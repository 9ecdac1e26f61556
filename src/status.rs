//! Uniform (code, message) status produced by every driver operation.

use serde::{Deserialize, Serialize};

use crate::engine::DiagRecord;

/// Success and informational statuses carry this code.
pub const CODE_OK: i32 = 0;
/// Generic/internal failures and engine-diagnosed failures carry this code.
pub const CODE_ERROR: i32 = 1;

/// The status pair a host reads after every operation.
///
/// Unlike the side-slot convention common in this kind of driver, the
/// status is returned explicitly alongside each operation's primary
/// value, so callers cannot forget to check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: i32,
    pub message: String,
}

impl Status {
    /// The single construction path for every status in the system.
    ///
    /// With a diagnostic source the code is forced to [`CODE_ERROR`] and
    /// the engine's message text is appended to `prefix`. Without one,
    /// `code` and `prefix` are used verbatim.
    #[must_use]
    pub fn build(diag: Option<&DiagRecord>, code: i32, prefix: &str) -> Self {
        match diag {
            Some(record) => Self {
                code: CODE_ERROR,
                message: format!("{prefix}{}", record.message),
            },
            None => Self {
                code,
                message: prefix.to_string(),
            },
        }
    }

    /// Informational status (code 0).
    #[must_use]
    pub fn info(message: &str) -> Self {
        Self::build(None, CODE_OK, message)
    }

    /// Internal failure status (code 1), for failures that did not come
    /// from the engine.
    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self::build(None, CODE_ERROR, message)
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}", self.code, self.message)
    }
}
