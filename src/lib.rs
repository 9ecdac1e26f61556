//! Synchronous driver adapter between an ODBC-style call-level database
//! API and a dynamically-typed host.
//!
//! The core is the row-fetch and type-marshaling engine: per-column
//! dispatch on engine-reported type tags, chunked decode of
//! variable-length character and binary columns, and translation of
//! engine diagnostics into a uniform (code, message) [`Status`]. The
//! public surface is four operations on [`DbHandle`]: open, close (or
//! reclaim), execute and fetch-next-row.
//!
//! The engine itself is a trait seam ([`engine::Engine`]); the host's
//! value system plugs in through [`ValueBuilder`], with [`HostValue`]
//! as a ready-made native implementation.

pub mod connection;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod status;
pub mod values;

mod executor;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use connection::DbHandle;
pub use decoder::FetchOutcome;
pub use error::DriverError;
pub use status::Status;
pub use values::{HostValue, HostValueBuilder, ValueBuilder};
