//! binlog event model: type catalog, common header and body variants
mod fde;
mod header;
mod incident;
mod intvar;
pub mod parser;
mod query;
mod rand;
mod rotate;
mod rows;
mod table_map;
mod user_var;
mod xid;

use bytes::Bytes;

pub use fde::FormatDescriptionData;
pub use header::{EventHeader, EventHeaderFlags, EVENT_HEADER_LEN};
pub use incident::IncidentData;
pub use intvar::{IntvarData, IntvarKey};
pub use query::{Flags2, QueryData, QueryStatusVar};
pub use rand::RandData;
pub use rotate::RotateData;
pub use rows::{RowCell, RowImage, RowsData, RowsFlags, UpdateRowImage, UpdateRowsData};
pub use table_map::{TableMap, TableMapCache, TableMapData, TableMapFlags};
pub use user_var::{UserVarData, UserVarFlags, UserVarValue};
pub use xid::XidData;

/// event type catalog of binlog v4 up to MySQL 5.1
///
/// reference: https://dev.mysql.com/doc/internals/en/binlog-event-type.html
/// out-of-range codes decode as Unknown instead of failing, so a
/// stream carrying newer event kinds still moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEventType {
    Unknown,
    StartV3,
    Query,
    Stop,
    Rotate,
    Intvar,
    Load,
    Slave,
    CreateFile,
    AppendBlock,
    ExecLoad,
    DeleteFile,
    NewLoad,
    Rand,
    UserVar,
    FormatDescription,
    Xid,
    BeginLoadQuery,
    ExecuteLoadQuery,
    TableMap,
    PreGaWriteRows,
    PreGaUpdateRows,
    PreGaDeleteRows,
    WriteRows,
    UpdateRows,
    DeleteRows,
    Incident,
    Heartbeat,
}

impl From<u8> for LogEventType {
    fn from(code: u8) -> LogEventType {
        match code {
            0 => LogEventType::Unknown,
            1 => LogEventType::StartV3,
            2 => LogEventType::Query,
            3 => LogEventType::Stop,
            4 => LogEventType::Rotate,
            5 => LogEventType::Intvar,
            6 => LogEventType::Load,
            7 => LogEventType::Slave,
            8 => LogEventType::CreateFile,
            9 => LogEventType::AppendBlock,
            10 => LogEventType::ExecLoad,
            11 => LogEventType::DeleteFile,
            12 => LogEventType::NewLoad,
            13 => LogEventType::Rand,
            14 => LogEventType::UserVar,
            15 => LogEventType::FormatDescription,
            16 => LogEventType::Xid,
            17 => LogEventType::BeginLoadQuery,
            18 => LogEventType::ExecuteLoadQuery,
            19 => LogEventType::TableMap,
            // used in 5.1.0 ~ 5.1.17 only
            20 => LogEventType::PreGaWriteRows,
            21 => LogEventType::PreGaUpdateRows,
            22 => LogEventType::PreGaDeleteRows,
            23 => LogEventType::WriteRows,
            24 => LogEventType::UpdateRows,
            25 => LogEventType::DeleteRows,
            26 => LogEventType::Incident,
            27 => LogEventType::Heartbeat,
            _ => LogEventType::Unknown,
        }
    }
}

impl From<LogEventType> for u8 {
    fn from(event_type: LogEventType) -> u8 {
        match event_type {
            LogEventType::Unknown => 0,
            LogEventType::StartV3 => 1,
            LogEventType::Query => 2,
            LogEventType::Stop => 3,
            LogEventType::Rotate => 4,
            LogEventType::Intvar => 5,
            LogEventType::Load => 6,
            LogEventType::Slave => 7,
            LogEventType::CreateFile => 8,
            LogEventType::AppendBlock => 9,
            LogEventType::ExecLoad => 10,
            LogEventType::DeleteFile => 11,
            LogEventType::NewLoad => 12,
            LogEventType::Rand => 13,
            LogEventType::UserVar => 14,
            LogEventType::FormatDescription => 15,
            LogEventType::Xid => 16,
            LogEventType::BeginLoadQuery => 17,
            LogEventType::ExecuteLoadQuery => 18,
            LogEventType::TableMap => 19,
            LogEventType::PreGaWriteRows => 20,
            LogEventType::PreGaUpdateRows => 21,
            LogEventType::PreGaDeleteRows => 22,
            LogEventType::WriteRows => 23,
            LogEventType::UpdateRows => 24,
            LogEventType::DeleteRows => 25,
            LogEventType::Incident => 26,
            LogEventType::Heartbeat => 27,
        }
    }
}

/// one parsed event: the common header plus the type-specific body
#[derive(Debug, Clone, PartialEq)]
pub struct BinlogEvent {
    pub header: EventHeader,
    pub data: EventData,
}

/// tagged body record, one variant per decoded event kind
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    FormatDescription(FormatDescriptionData),
    Rotate(RotateData),
    Query(QueryData),
    Intvar(IntvarData),
    Xid(XidData),
    Rand(RandData),
    UserVar(UserVarData),
    TableMap(TableMapData),
    WriteRows(RowsData),
    UpdateRows(UpdateRowsData),
    DeleteRows(RowsData),
    Stop,
    Heartbeat,
    Incident(IncidentData),
    /// verbatim body of a kind the parser does not decode
    Opaque(Bytes),
    /// body consumed and discarded under the skip policy
    Skipped,
}
