//! Row decoder: per-column type dispatch over the active result set.

pub(crate) mod chunks;

use tracing::{debug, warn};

use crate::connection::DbHandle;
use crate::engine::{Engine, SqlDataType};
use crate::error::DriverError;
use crate::status::Status;
use crate::values::ValueBuilder;

/// What a fetch call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<V> {
    /// One decoded row: an ordered list of (column-name, value) pairs
    /// built through the caller's [`ValueBuilder`].
    Row(V),
    /// End-of-results sentinel. Paired with the "no more rows" status
    /// this is the normal loop-termination signal, not an error.
    End,
}

impl<E: Engine> DbHandle<E> {
    /// Fetch and decode the next row of the active result set.
    ///
    /// Each row is rebuilt fresh: column metadata is read once per row
    /// per column and nothing is cached across fetches. A column whose
    /// engine type has no decode rule aborts the whole row; the call
    /// returns the end sentinel with an internal status, partial
    /// columns are discarded, and the connection remains usable.
    pub fn fetch_next_row<B: ValueBuilder>(
        &mut self,
        builder: &mut B,
    ) -> (FetchOutcome<B::Value>, Status) {
        let Some(live) = self.live.as_mut() else {
            return (FetchOutcome::End, Status::internal("no live connection"));
        };

        let columns = self.engine.num_result_cols(&mut live.stmt);
        if !self.engine.fetch(&mut live.stmt).succeeded() {
            debug!("result set exhausted");
            return (FetchOutcome::End, Status::info("no more rows"));
        }

        let mut pairs = Vec::with_capacity(columns as usize);
        for column in 1..=columns {
            let desc = self.engine.describe_col(&mut live.stmt, column);
            let value = match decode_column(
                &mut self.engine,
                &mut live.stmt,
                column,
                &desc.data_type,
                builder,
            ) {
                Ok(value) => value,
                Err(err) => {
                    warn!(column, "aborting row: {err}");
                    return (FetchOutcome::End, Status::from(&err));
                }
            };
            let name = builder.string(&desc.name);
            pairs.push(builder.pair(name, value));
        }

        (FetchOutcome::Row(builder.list(pairs)), Status::info("row fetched"))
    }
}

/// Decode one column of the current row per the engine-reported type.
fn decode_column<E: Engine, B: ValueBuilder>(
    engine: &mut E,
    stmt: &mut E::Stmt,
    column: u16,
    data_type: &SqlDataType,
    builder: &mut B,
) -> Result<B::Value, DriverError> {
    use SqlDataType as T;

    let value = match data_type {
        T::SmallInt | T::Integer | T::TinyInt | T::BigInt => {
            match engine.get_i64(stmt, column) {
                Some(v) => builder.integer(v),
                None => builder.empty(),
            }
        }
        T::Float | T::Double => match engine.get_f64(stmt, column) {
            Some(v) => builder.double(v),
            None => builder.empty(),
        },
        T::Char | T::Varchar | T::LongVarchar => {
            match chunks::read_text(engine, stmt, column) {
                Some(s) => builder.string(&s),
                None => builder.empty(),
            }
        }
        T::Date => match engine.get_date(stmt, column) {
            Some(d) => builder.string(&d.format("%Y-%m-%d").to_string()),
            None => builder.empty(),
        },
        T::Time => match engine.get_time(stmt, column) {
            Some(t) => builder.string(&t.format("%H:%M:%S").to_string()),
            None => builder.empty(),
        },
        T::Timestamp => match engine.get_timestamp(stmt, column) {
            Some(ts) => builder.string(&ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => builder.empty(),
        },
        T::Binary => match chunks::read_blob(engine, stmt, column) {
            Some(bytes) => builder.bytes(&bytes),
            None => builder.empty(),
        },
        T::Bit => match engine.get_bit(stmt, column) {
            Some(b) => builder.boolean(b),
            None => builder.empty(),
        },
        T::Other(_) => {
            return Err(DriverError::Internal("unknown field datatype".to_string()));
        }
    };

    Ok(value)
}
