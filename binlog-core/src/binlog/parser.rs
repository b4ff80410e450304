//! event stream parser: header decode, body dispatch, table-map cache
use super::rows::{read_rows, read_update_rows};
use super::{
    BinlogEvent, EventData, EventHeader, FormatDescriptionData, IncidentData, IntvarData,
    LogEventType, QueryData, RandData, RotateData, TableMap, TableMapCache, TableMapData,
    UserVarData, XidData,
};
use crate::error::Result;
use bytes::{Buf, Bytes};
use bytes_reader::{EventReader, ReadFromBytes};
use log::{debug, trace};
use std::io::Read;

/// what to do with event kinds the parser does not decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndecodedPolicy {
    /// consume the body and report it as skipped
    Skip,
    /// surface the body bytes verbatim
    Raw,
    /// fail with an unsupported-event error
    Reject,
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// longest query text to retain from a query event
    pub max_query_length: Option<usize>,
    pub undecoded: UndecodedPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_query_length: None,
            undecoded: UndecodedPolicy::Skip,
        }
    }
}

/// single-threaded decoder of a binlog event stream
///
/// owns the table-map cache, so rows events see exactly the table
/// definition installed by the latest preceding table map event for
/// their table id
#[derive(Debug, Default)]
pub struct BinlogParser {
    cache: TableMapCache,
    opts: ParseOptions,
}

impl BinlogParser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(opts: ParseOptions) -> Self {
        BinlogParser {
            cache: TableMapCache::new(),
            opts,
        }
    }

    /// table definition currently cached for the given id
    pub fn table_map(&self, table_id: u64) -> Option<&TableMap> {
        self.cache.lookup(table_id)
    }

    /// decode the next event, or None at a clean end of stream
    ///
    /// the reader must stand at an event boundary; after an error its
    /// position is unspecified and the caller has to reposition before
    /// continuing
    pub fn next_event<S: Read>(
        &mut self,
        reader: &mut EventReader<S>,
    ) -> Result<Option<BinlogEvent>> {
        let header = match EventHeader::read_from(reader)? {
            Some(header) => header,
            None => return Ok(None),
        };
        let body = reader.read(header.data_len() as usize)?;
        let data = self.read_body(&header, body)?;
        Ok(Some(BinlogEvent { header, data }))
    }

    fn read_body(&mut self, header: &EventHeader, mut body: Bytes) -> Result<EventData> {
        let data = match header.event_type {
            LogEventType::FormatDescription => {
                EventData::FormatDescription(FormatDescriptionData::read_from(&mut body)?)
            }
            LogEventType::Rotate => EventData::Rotate(RotateData::read_from(&mut body)?),
            LogEventType::Query => {
                EventData::Query(QueryData::read_from(&mut body, self.opts.max_query_length)?)
            }
            LogEventType::Intvar => EventData::Intvar(IntvarData::read_from(&mut body)?),
            LogEventType::Xid => EventData::Xid(XidData::read_from(&mut body)?),
            LogEventType::Rand => EventData::Rand(RandData::read_from(&mut body)?),
            LogEventType::UserVar => EventData::UserVar(UserVarData::read_from(&mut body)?),
            LogEventType::Incident => EventData::Incident(IncidentData::read_from(&mut body)?),
            LogEventType::Stop => EventData::Stop,
            LogEventType::Heartbeat => EventData::Heartbeat,
            LogEventType::TableMap => {
                // install only after the full body decoded; a failure
                // above leaves any earlier mapping untouched
                let data = TableMapData::read_from(&mut body)?;
                debug!(
                    "table map installed: table_id={} table={}.{}",
                    data.table_id, data.table.db, data.table.table
                );
                self.cache.install(data.table_id, data.table.clone());
                EventData::TableMap(data)
            }
            LogEventType::WriteRows => EventData::WriteRows(read_rows(&mut body, &self.cache)?),
            LogEventType::DeleteRows => EventData::DeleteRows(read_rows(&mut body, &self.cache)?),
            LogEventType::UpdateRows => {
                EventData::UpdateRows(read_update_rows(&mut body, &self.cache)?)
            }
            other => match self.opts.undecoded {
                UndecodedPolicy::Raw => EventData::Opaque(body.split_to(body.remaining())),
                UndecodedPolicy::Skip => {
                    trace!(
                        "skipping {:?} body of {} bytes",
                        other,
                        body.remaining()
                    );
                    EventData::Skipped
                }
                UndecodedPolicy::Reject => {
                    return Err(crate::error::Error::UnsupportedEvent(header.type_code))
                }
            },
        };
        Ok(data)
    }
}
