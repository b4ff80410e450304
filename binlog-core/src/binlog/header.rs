use super::LogEventType;
use crate::error::{Error, Result};
use bitflags::bitflags;
use bytes_reader::{EventReader, ReadBytesExt};
use std::io::Read;

/// fixed size of the common header shared by every v4 event
pub const EVENT_HEADER_LEN: u32 = 19;

bitflags! {
    pub struct EventHeaderFlags: u16 {
        const BINLOG_IN_USE   = 0x0001;
        const THREAD_SPECIFIC = 0x0004;
        const SUPPRESS_USE    = 0x0008;
        const ARTIFICIAL      = 0x0020;
        const RELAY_LOG       = 0x0040;
    }
}

/// common header of a v4 event
///
/// reference: https://dev.mysql.com/doc/internals/en/binlog-event-header.html
/// the header includes 6 fields:
/// timestamp 0:4, type_code 4:1, server_id 5:4,
/// event_length 9:4, next_position 13:4, flags 17:2
#[derive(Debug, Clone, PartialEq)]
pub struct EventHeader {
    pub timestamp: u32,
    pub event_type: LogEventType,
    pub type_code: u8,
    pub server_id: u32,
    pub event_len: u32,
    pub next_pos: u32,
    pub flags: EventHeaderFlags,
    /// absolute offset one past the last body byte
    pub body_end: u64,
}

impl EventHeader {
    /// decode the next header, or None at a clean end of stream
    ///
    /// the reader must stand at an event boundary; a declared length
    /// below the header size is rejected before any body byte moves
    pub fn read_from<S: Read>(reader: &mut EventReader<S>) -> Result<Option<EventHeader>> {
        let start = reader.position();
        let mut chunk = match reader.read_or_eof(EVENT_HEADER_LEN as usize)? {
            Some(chunk) => chunk,
            None => return Ok(None),
        };
        let timestamp = chunk.read_le_u32()?;
        let type_code = chunk.read_u8()?;
        let server_id = chunk.read_le_u32()?;
        let event_len = chunk.read_le_u32()?;
        let next_pos = chunk.read_le_u32()?;
        let flags = chunk.read_le_u16()?;
        if event_len < EVENT_HEADER_LEN {
            return Err(Error::MalformedHeader { event_len });
        }
        Ok(Some(EventHeader {
            timestamp,
            event_type: LogEventType::from(type_code),
            type_code,
            server_id,
            event_len,
            next_pos,
            flags: EventHeaderFlags::from_bits_truncate(flags),
            body_end: start + event_len as u64,
        }))
    }

    pub fn data_len(&self) -> u32 {
        self.event_len - EVENT_HEADER_LEN
    }

    /// bytes left until body end, seen from the given reader position
    pub fn remaining(&self, position: u64) -> u64 {
        self.body_end.saturating_sub(position)
    }
}
