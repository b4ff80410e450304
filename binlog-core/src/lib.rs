//! MySQL binlog event stream decoder
//!
//! Decodes length-prefixed binlog events into structured records for
//! replication, auditing or change-data-capture pipelines. The parser
//! reads a common 19-byte header, dispatches on the event type, and
//! keeps a table-map cache so rows events can be interpreted against
//! the latest table definition seen on the stream.
//!
//! ```no_run
//! use binlog_core::{BinlogParser, EventReader};
//! use std::fs::File;
//!
//! # fn main() -> binlog_core::Result<()> {
//! let file = File::open("mysql-bin.000001")?;
//! let mut reader = EventReader::new(file);
//! let mut parser = BinlogParser::new();
//! while let Some(event) = parser.next_event(&mut reader)? {
//!     println!("{:?} at {}", event.header.event_type, event.header.next_pos);
//! }
//! # Ok(())
//! # }
//! ```
pub mod binlog;
pub mod col;
pub mod error;

#[cfg(test)]
pub(crate) mod testutil;

pub use crate::binlog::parser::{BinlogParser, ParseOptions, UndecodedPolicy};
pub use crate::binlog::{BinlogEvent, EventData, EventHeader, LogEventType};
pub use crate::col::{ColumnDescriptor, ColumnMeta, ColumnType, ColumnValue};
pub use crate::error::{Error, Result};
pub use bytes_reader::EventReader;
