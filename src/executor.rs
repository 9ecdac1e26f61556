//! Statement executor: commit/rollback routing and direct execution.

use tracing::{debug, warn};

use crate::connection::DbHandle;
use crate::engine::{Engine, SqlReturn, TranAction};
use crate::error::{DriverError, diag_message};
use crate::status::Status;

impl<E: Engine> DbHandle<E> {
    /// Run a command.
    ///
    /// The literal commands `commit` and `rollback` (case-insensitive)
    /// complete the outstanding transaction on the connection context;
    /// anything else is sent verbatim as a SQL statement on the
    /// statement context. A "no data" outcome counts as success, so
    /// DDL/DML that returns nothing still reports `query ok`.
    ///
    /// Note: executing here invalidates any in-progress fetch loop on
    /// this handle's statement context.
    pub fn execute(&mut self, command: &str) -> Status {
        let Some(live) = self.live.as_mut() else {
            return Status::internal("no live connection");
        };

        let ret = if command.eq_ignore_ascii_case("commit") {
            debug!("commit requested");
            self.engine.end_tran(&mut live.conn, TranAction::Commit)
        } else if command.eq_ignore_ascii_case("rollback") {
            debug!("rollback requested");
            self.engine.end_tran(&mut live.conn, TranAction::Rollback)
        } else {
            self.engine.exec_direct(&mut live.stmt, command)
        };

        if ret == SqlReturn::NoData || ret.succeeded() {
            Status::info("query ok")
        } else {
            let diag = self.engine.stmt_diagnostic(&mut live.stmt, 1);
            let err = DriverError::QueryFailed(diag_message(diag));
            warn!("{err}");
            Status::from(&err)
        }
    }
}
