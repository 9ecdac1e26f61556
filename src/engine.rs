//! The call-level engine API the driver consumes.
//!
//! This is the seam between the driver core and an ODBC-style client
//! library: handle allocation for the three resource kinds, connect,
//! direct execution, transaction control, fetch, column description and
//! per-column data retrieval. The crate forbids unsafe code, so a real
//! binding lives in a separate crate that implements [`Engine`]; the
//! `test-utils` feature ships an in-memory implementation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Outcome of an engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlReturn {
    Success,
    /// Succeeded, with diagnostic information available.
    SuccessWithInfo,
    /// The call completed but produced no data (end of results, or a
    /// statement that returns nothing).
    NoData,
    Error,
}

impl SqlReturn {
    /// Whether the call succeeded (with or without info).
    #[must_use]
    pub fn succeeded(self) -> bool {
        matches!(self, SqlReturn::Success | SqlReturn::SuccessWithInfo)
    }
}

/// Transaction completion requested on a connection context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranAction {
    Commit,
    Rollback,
}

/// The column types the row decoder knows how to marshal.
///
/// Anything an engine reports outside this set arrives as `Other` and
/// aborts the row being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlDataType {
    SmallInt,
    Integer,
    TinyInt,
    BigInt,
    Float,
    Double,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    Bit,
    /// An engine type tag with no decode rule; the raw tag is kept for
    /// diagnostics.
    Other(i16),
}

/// Per-column metadata needed to decode a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub data_type: SqlDataType,
}

impl ColumnDescription {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: SqlDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// One diagnostic record retrieved from a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagRecord {
    /// Five-character SQLSTATE.
    pub state: String,
    /// Engine-native error code.
    pub native_code: i32,
    pub message: String,
}

/// Length indicator reported alongside a chunk of a variable-length
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Bytes remaining for the column before this call, including the
    /// bytes just written into the buffer.
    Bytes(usize),
    /// The engine cannot tell how much data remains.
    NoTotal,
    /// The column value is null.
    Null,
}

/// Result of one get-data call against a variable-length column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    /// The engine wrote up to `buf.len()` bytes into the caller's buffer.
    Data(Indicator),
    /// No more data for this column.
    NoData,
}

/// Engine resource allocation failed.
#[derive(Debug, Error)]
#[error("out of memory")]
pub struct AllocError;

/// An ODBC-style call-level client API.
///
/// One implementor instance backs one connection handle; the three
/// resource kinds depend on each other in allocation order (environment,
/// then connection, then statement) and the connection manager releases
/// them in reverse.
pub trait Engine {
    type Env;
    type Conn;
    type Stmt;

    fn alloc_env(&mut self) -> Result<Self::Env, AllocError>;
    fn alloc_conn(&mut self, env: &mut Self::Env) -> Result<Self::Conn, AllocError>;
    fn alloc_stmt(&mut self, conn: &mut Self::Conn) -> Result<Self::Stmt, AllocError>;

    fn free_stmt(&mut self, stmt: Self::Stmt);
    fn free_conn(&mut self, conn: Self::Conn);
    fn free_env(&mut self, env: Self::Env);

    fn connect(&mut self, conn: &mut Self::Conn, connection_string: &str) -> SqlReturn;
    fn end_tran(&mut self, conn: &mut Self::Conn, action: TranAction) -> SqlReturn;

    fn exec_direct(&mut self, stmt: &mut Self::Stmt, sql: &str) -> SqlReturn;
    /// Advance the result cursor one row.
    fn fetch(&mut self, stmt: &mut Self::Stmt) -> SqlReturn;
    fn num_result_cols(&mut self, stmt: &mut Self::Stmt) -> u16;
    /// Describe column `column` (1-based, in result-set order).
    fn describe_col(&mut self, stmt: &mut Self::Stmt, column: u16) -> ColumnDescription;

    /// Read an integer column. `None` means the column is null or the
    /// engine could not convert the value; the other fixed-size reads
    /// behave the same way.
    fn get_i64(&mut self, stmt: &mut Self::Stmt, column: u16) -> Option<i64>;
    fn get_f64(&mut self, stmt: &mut Self::Stmt, column: u16) -> Option<f64>;
    fn get_bit(&mut self, stmt: &mut Self::Stmt, column: u16) -> Option<bool>;
    fn get_date(&mut self, stmt: &mut Self::Stmt, column: u16) -> Option<NaiveDate>;
    fn get_time(&mut self, stmt: &mut Self::Stmt, column: u16) -> Option<NaiveTime>;
    fn get_timestamp(&mut self, stmt: &mut Self::Stmt, column: u16) -> Option<NaiveDateTime>;

    /// Streaming read for character columns, callable repeatedly per
    /// column until [`Chunk::NoData`]. The engine writes at most
    /// `buf.len()` bytes per call.
    fn get_text_chunk(&mut self, stmt: &mut Self::Stmt, column: u16, buf: &mut [u8]) -> Chunk;
    /// Streaming read for binary columns; same contract as
    /// [`Engine::get_text_chunk`].
    fn get_binary_chunk(&mut self, stmt: &mut Self::Stmt, column: u16, buf: &mut [u8]) -> Chunk;

    /// Retrieve diagnostic record `record` (1-based) from the connection
    /// context after a failed call.
    fn conn_diagnostic(&mut self, conn: &mut Self::Conn, record: u16) -> Option<DiagRecord>;
    fn stmt_diagnostic(&mut self, stmt: &mut Self::Stmt, record: u16) -> Option<DiagRecord>;
}
