//! Connection manager: owns the engine resource triple for one handle.

use tracing::{debug, warn};

use crate::engine::{Engine, TranAction};
use crate::error::{DriverError, diag_message};
use crate::status::Status;

/// The three nested engine resources behind a live connection.
///
/// Allocated environment, then connection, then statement; released in
/// reverse. Exactly one statement context per connection.
pub(crate) struct Live<E: Engine> {
    pub(crate) env: E::Env,
    pub(crate) conn: E::Conn,
    pub(crate) stmt: E::Stmt,
}

/// One database connection handle.
///
/// Owns its engine instance outright; independent handles own
/// independent engine resource triples and never interact. All
/// operations are synchronous and blocking, and each returns its
/// [`Status`] explicitly.
pub struct DbHandle<E: Engine> {
    pub(crate) engine: E,
    pub(crate) live: Option<Live<E>>,
    pub(crate) closed: bool,
}

impl<E: Engine> DbHandle<E> {
    /// Open a connection.
    ///
    /// `connection_string` is passed to the engine verbatim; `None`
    /// models a host that supplied no string (or a non-string) and
    /// reports an internal status without touching the engine. On
    /// engine connect failure everything already allocated is released
    /// before returning, and the handle is left closed: later
    /// operations on it report an internal status instead of acting on
    /// freed resources.
    pub fn open(engine: E, connection_string: Option<&str>) -> (Self, Status) {
        let mut handle = Self {
            engine,
            live: None,
            closed: true,
        };

        let Some(connection_string) = connection_string else {
            return (handle, Status::internal("missing connection string"));
        };

        match handle.try_open(connection_string) {
            Ok(()) => {
                debug!("engine connection established");
                (handle, Status::info("db connected"))
            }
            Err(err) => {
                warn!("open failed: {err}");
                let status = Status::from(&err);
                (handle, status)
            }
        }
    }

    fn try_open(&mut self, connection_string: &str) -> Result<(), DriverError> {
        let mut env = self.engine.alloc_env()?;

        let mut conn = match self.engine.alloc_conn(&mut env) {
            Ok(conn) => conn,
            Err(err) => {
                self.engine.free_env(env);
                return Err(err.into());
            }
        };

        if !self.engine.connect(&mut conn, connection_string).succeeded() {
            let diag = self.engine.conn_diagnostic(&mut conn, 1);
            self.engine.free_conn(conn);
            self.engine.free_env(env);
            return Err(DriverError::ConnectFailed(diag_message(diag)));
        }

        let stmt = match self.engine.alloc_stmt(&mut conn) {
            Ok(stmt) => stmt,
            Err(err) => {
                self.engine.free_conn(conn);
                self.engine.free_env(env);
                return Err(err.into());
            }
        };

        self.live = Some(Live { env, conn, stmt });
        self.closed = false;
        Ok(())
    }

    /// Explicitly close the connection.
    ///
    /// Closing a handle with no live connection is an error; a host
    /// reclaiming a handle during teardown should use
    /// [`DbHandle::reclaim`] instead.
    pub fn close(&mut self) -> Status {
        if self.release() {
            Status::info("closed")
        } else {
            Status::internal("connection not found")
        }
    }

    /// Release the connection during teardown or forced cleanup.
    ///
    /// A handle with nothing live is a silent no-op; this never reports
    /// "not found".
    pub fn reclaim(&mut self) -> Status {
        let _ = self.release();
        Status::info("closed")
    }

    /// Adapter for host lifecycle protocols that signal teardown with a
    /// flag on their single close entry point.
    pub fn close_with(&mut self, forced: bool) -> Status {
        if forced { self.reclaim() } else { self.close() }
    }

    /// Commit the outstanding transaction and free the statement,
    /// connection and environment contexts in that order. Returns false
    /// when nothing was live.
    fn release(&mut self) -> bool {
        let Some(live) = self.live.take() else {
            return false;
        };
        let Live { env, mut conn, stmt } = live;

        let _ = self.engine.end_tran(&mut conn, TranAction::Commit);
        self.engine.free_stmt(stmt);
        self.engine.free_conn(conn);
        self.engine.free_env(env);
        self.closed = true;
        debug!("engine connection closed");
        true
    }

    /// Whether the handle currently has no live connection.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Access the engine backing this handle.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: Engine> Drop for DbHandle<E> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
