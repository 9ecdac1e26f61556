//! In-memory [`Engine`] for exercising the driver surface without a
//! live data source.
//!
//! Scripted with a builder in the same spirit as the crate's public
//! option types: configure a result set and failure injection up front,
//! then hand the engine to [`DbHandle::open`](crate::DbHandle::open).
//! Cloning the engine before handing it over yields a probe sharing the
//! same state, so tests can inspect transaction and resource accounting
//! even after the handle is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::engine::{
    AllocError, Chunk, ColumnDescription, DiagRecord, Engine, Indicator, SqlDataType, SqlReturn,
    TranAction,
};

/// One scripted cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCell {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Binary(Vec<u8>),
    Bit(bool),
    Null,
}

#[derive(Debug, Default)]
struct ChunkCursor {
    offset: usize,
    started: bool,
}

#[derive(Debug, Default)]
struct MockState {
    columns: Vec<ColumnDescription>,
    rows: Vec<Vec<MockCell>>,

    fail_connect: Option<String>,
    fail_execute: Option<String>,
    fail_alloc_env: bool,
    fail_alloc_conn: bool,
    fail_alloc_stmt: bool,
    report_no_total: bool,
    null_binary_mid_stream: bool,

    connected: bool,
    current_row: Option<usize>,
    next_row: usize,
    chunk_cursors: HashMap<u16, ChunkCursor>,

    executed: Vec<String>,
    transactions: Vec<TranAction>,
    last_diag: Option<DiagRecord>,

    env_alive: usize,
    conn_alive: usize,
    stmt_alive: usize,
    free_order: Vec<&'static str>,
}

pub struct MockEnv;
pub struct MockConn;
pub struct MockStmt;

/// Scripted in-memory engine; one instance per connection handle.
#[derive(Clone, Default)]
pub struct MockEngine {
    state: Rc<RefCell<MockState>>,
}

impl MockEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result set every executed statement will expose.
    #[must_use]
    pub fn with_result_set(
        self,
        columns: Vec<(&str, SqlDataType)>,
        rows: Vec<Vec<MockCell>>,
    ) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.columns = columns
                .into_iter()
                .map(|(name, data_type)| ColumnDescription::new(name, data_type))
                .collect();
            state.rows = rows;
        }
        self
    }

    /// Make the connect call fail with this diagnostic text.
    #[must_use]
    pub fn fail_connect(self, message: &str) -> Self {
        self.state.borrow_mut().fail_connect = Some(message.to_string());
        self
    }

    /// Make direct execution fail with this diagnostic text.
    #[must_use]
    pub fn fail_execute(self, message: &str) -> Self {
        self.state.borrow_mut().fail_execute = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn fail_alloc_env(self) -> Self {
        self.state.borrow_mut().fail_alloc_env = true;
        self
    }

    #[must_use]
    pub fn fail_alloc_conn(self) -> Self {
        self.state.borrow_mut().fail_alloc_conn = true;
        self
    }

    #[must_use]
    pub fn fail_alloc_stmt(self) -> Self {
        self.state.borrow_mut().fail_alloc_stmt = true;
        self
    }

    /// Report `NoTotal` instead of a byte count whenever more data
    /// remains than fits the caller's buffer, like a driver that cannot
    /// size long columns.
    #[must_use]
    pub fn report_no_total(self) -> Self {
        self.state.borrow_mut().report_no_total = true;
        self
    }

    /// Report a null indicator on the second and later chunks of every
    /// binary column, to exercise null-discovered-mid-stream handling.
    #[must_use]
    pub fn null_binary_mid_stream(self) -> Self {
        self.state.borrow_mut().null_binary_mid_stream = true;
        self
    }

    // Probe accessors, usable from a clone after the handle is gone.

    #[must_use]
    pub fn connected(&self) -> bool {
        self.state.borrow().connected
    }

    #[must_use]
    pub fn executed_sql(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    #[must_use]
    pub fn transactions(&self) -> Vec<TranAction> {
        self.state.borrow().transactions.clone()
    }

    /// Count of engine resources currently allocated across all three
    /// kinds.
    #[must_use]
    pub fn live_resources(&self) -> usize {
        let state = self.state.borrow();
        state.env_alive + state.conn_alive + state.stmt_alive
    }

    /// Resource kinds in the order they were freed.
    #[must_use]
    pub fn free_order(&self) -> Vec<&'static str> {
        self.state.borrow().free_order.clone()
    }

    fn set_diag(&self, state_code: &str, native_code: i32, message: &str) {
        self.state.borrow_mut().last_diag = Some(DiagRecord {
            state: state_code.to_string(),
            native_code,
            message: message.to_string(),
        });
    }

    fn cell(&self, column: u16) -> Option<MockCell> {
        let state = self.state.borrow();
        let row = state.rows.get(state.current_row?)?;
        row.get(usize::from(column) - 1).cloned()
    }

    /// Shared get-data loop for text and binary cells: copy the next
    /// window of `data` into `buf` and report the indicator the way an
    /// ODBC driver would (bytes remaining before the call, or no-total
    /// when configured and the data does not fit).
    fn stream(&self, column: u16, data: &[u8], buf: &mut [u8]) -> Chunk {
        let mut state = self.state.borrow_mut();
        let report_no_total = state.report_no_total;
        let cursor = state.chunk_cursors.entry(column).or_default();

        let remaining = data.len() - cursor.offset;
        if cursor.started && remaining == 0 {
            return Chunk::NoData;
        }
        cursor.started = true;

        let written = remaining.min(buf.len());
        buf[..written].copy_from_slice(&data[cursor.offset..cursor.offset + written]);
        cursor.offset += written;

        if report_no_total && remaining > buf.len() {
            Chunk::Data(Indicator::NoTotal)
        } else {
            Chunk::Data(Indicator::Bytes(remaining))
        }
    }
}

impl Engine for MockEngine {
    type Env = MockEnv;
    type Conn = MockConn;
    type Stmt = MockStmt;

    fn alloc_env(&mut self) -> Result<MockEnv, AllocError> {
        let mut state = self.state.borrow_mut();
        if state.fail_alloc_env {
            return Err(AllocError);
        }
        state.env_alive += 1;
        Ok(MockEnv)
    }

    fn alloc_conn(&mut self, _env: &mut MockEnv) -> Result<MockConn, AllocError> {
        let mut state = self.state.borrow_mut();
        if state.fail_alloc_conn {
            return Err(AllocError);
        }
        state.conn_alive += 1;
        Ok(MockConn)
    }

    fn alloc_stmt(&mut self, _conn: &mut MockConn) -> Result<MockStmt, AllocError> {
        let mut state = self.state.borrow_mut();
        if state.fail_alloc_stmt {
            return Err(AllocError);
        }
        state.stmt_alive += 1;
        Ok(MockStmt)
    }

    fn free_stmt(&mut self, _stmt: MockStmt) {
        let mut state = self.state.borrow_mut();
        state.stmt_alive -= 1;
        state.free_order.push("stmt");
    }

    fn free_conn(&mut self, _conn: MockConn) {
        let mut state = self.state.borrow_mut();
        state.conn_alive -= 1;
        state.connected = false;
        state.free_order.push("conn");
    }

    fn free_env(&mut self, _env: MockEnv) {
        let mut state = self.state.borrow_mut();
        state.env_alive -= 1;
        state.free_order.push("env");
    }

    fn connect(&mut self, _conn: &mut MockConn, _connection_string: &str) -> SqlReturn {
        let failure = self.state.borrow().fail_connect.clone();
        if let Some(message) = failure {
            self.set_diag("08001", 1, &message);
            return SqlReturn::Error;
        }
        self.state.borrow_mut().connected = true;
        SqlReturn::Success
    }

    fn end_tran(&mut self, _conn: &mut MockConn, action: TranAction) -> SqlReturn {
        self.state.borrow_mut().transactions.push(action);
        SqlReturn::Success
    }

    fn exec_direct(&mut self, _stmt: &mut MockStmt, sql: &str) -> SqlReturn {
        let failure = self.state.borrow().fail_execute.clone();
        self.state.borrow_mut().executed.push(sql.to_string());
        if let Some(message) = failure {
            self.set_diag("42000", 102, &message);
            return SqlReturn::Error;
        }
        let mut state = self.state.borrow_mut();
        state.current_row = None;
        state.next_row = 0;
        SqlReturn::Success
    }

    fn fetch(&mut self, _stmt: &mut MockStmt) -> SqlReturn {
        let mut state = self.state.borrow_mut();
        if state.next_row < state.rows.len() {
            state.current_row = Some(state.next_row);
            state.next_row += 1;
            state.chunk_cursors.clear();
            SqlReturn::Success
        } else {
            state.current_row = None;
            SqlReturn::NoData
        }
    }

    fn num_result_cols(&mut self, _stmt: &mut MockStmt) -> u16 {
        self.state.borrow().columns.len() as u16
    }

    fn describe_col(&mut self, _stmt: &mut MockStmt, column: u16) -> ColumnDescription {
        self.state.borrow().columns[usize::from(column) - 1].clone()
    }

    fn get_i64(&mut self, _stmt: &mut MockStmt, column: u16) -> Option<i64> {
        match self.cell(column)? {
            MockCell::Int(v) => Some(v),
            _ => None,
        }
    }

    fn get_f64(&mut self, _stmt: &mut MockStmt, column: u16) -> Option<f64> {
        match self.cell(column)? {
            MockCell::Float(v) => Some(v),
            _ => None,
        }
    }

    fn get_bit(&mut self, _stmt: &mut MockStmt, column: u16) -> Option<bool> {
        match self.cell(column)? {
            MockCell::Bit(v) => Some(v),
            _ => None,
        }
    }

    fn get_date(&mut self, _stmt: &mut MockStmt, column: u16) -> Option<NaiveDate> {
        match self.cell(column)? {
            MockCell::Date(v) => Some(v),
            _ => None,
        }
    }

    fn get_time(&mut self, _stmt: &mut MockStmt, column: u16) -> Option<NaiveTime> {
        match self.cell(column)? {
            MockCell::Time(v) => Some(v),
            _ => None,
        }
    }

    fn get_timestamp(&mut self, _stmt: &mut MockStmt, column: u16) -> Option<NaiveDateTime> {
        match self.cell(column)? {
            MockCell::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    fn get_text_chunk(&mut self, _stmt: &mut MockStmt, column: u16, buf: &mut [u8]) -> Chunk {
        match self.cell(column) {
            Some(MockCell::Text(s)) => self.stream(column, s.as_bytes(), buf),
            Some(MockCell::Null) => Chunk::Data(Indicator::Null),
            _ => Chunk::NoData,
        }
    }

    fn get_binary_chunk(&mut self, _stmt: &mut MockStmt, column: u16, buf: &mut [u8]) -> Chunk {
        let null_mid_stream = self.state.borrow().null_binary_mid_stream;
        match self.cell(column) {
            Some(MockCell::Binary(bytes)) => {
                if null_mid_stream && self.state.borrow().chunk_cursors.contains_key(&column) {
                    return Chunk::Data(Indicator::Null);
                }
                self.stream(column, &bytes, buf)
            }
            Some(MockCell::Null) => Chunk::Data(Indicator::Null),
            _ => Chunk::NoData,
        }
    }

    fn conn_diagnostic(&mut self, _conn: &mut MockConn, _record: u16) -> Option<DiagRecord> {
        self.state.borrow().last_diag.clone()
    }

    fn stmt_diagnostic(&mut self, _stmt: &mut MockStmt, _record: u16) -> Option<DiagRecord> {
        self.state.borrow().last_diag.clone()
    }
}
