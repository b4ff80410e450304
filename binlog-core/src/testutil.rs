//! wire-image assembly helpers shared by the module tests
use crate::binlog::{LogEventType, EVENT_HEADER_LEN};
use bytes::{BufMut, BytesMut};
use bytes_reader::my::write_len_enc_int;
use bytes_reader::WriteBytesExt;

/// assemble one full event (header + body) as it sits at the given
/// absolute offset; next_position points right past the event
pub(crate) fn build_event_at(
    pos: u64,
    event_type: LogEventType,
    timestamp: u32,
    server_id: u32,
    flags: u16,
    body: &[u8],
) -> Vec<u8> {
    let event_len = EVENT_HEADER_LEN + body.len() as u32;
    let mut out = BytesMut::with_capacity(event_len as usize);
    out.write_le_u32(timestamp).unwrap();
    out.write_u8(u8::from(event_type)).unwrap();
    out.write_le_u32(server_id).unwrap();
    out.write_le_u32(event_len).unwrap();
    out.write_le_u32(pos as u32 + event_len).unwrap();
    out.write_le_u16(flags).unwrap();
    out.put_slice(body);
    out.to_vec()
}

pub(crate) fn build_event(event_type: LogEventType, body: &[u8]) -> Vec<u8> {
    build_event_at(0, event_type, 0, 1, 0, body)
}

/// body of a table map event for `db`.`table` with the given columns,
/// each (type code, metadata bytes, nullable)
pub(crate) fn table_map_body(
    table_id: u64,
    db: &str,
    table: &str,
    columns: &[(u8, &[u8], bool)],
) -> Vec<u8> {
    let mut out = BytesMut::new();
    out.write_le_u48(table_id).unwrap();
    out.write_le_u16(1).unwrap();
    out.write_u8(db.len() as u8).unwrap();
    out.put_slice(db.as_bytes());
    out.write_u8(0).unwrap();
    out.write_u8(table.len() as u8).unwrap();
    out.put_slice(table.as_bytes());
    out.write_u8(0).unwrap();
    write_len_enc_int(&mut out, columns.len() as u64);
    for (code, _, _) in columns {
        out.write_u8(*code).unwrap();
    }
    let meta_len: usize = columns.iter().map(|(_, meta, _)| meta.len()).sum();
    write_len_enc_int(&mut out, meta_len as u64);
    for (_, meta, _) in columns {
        out.put_slice(meta);
    }
    out.put_slice(&pack_bits(columns.iter().map(|(_, _, null)| *null)));
    out.to_vec()
}

/// LSB-first bitmap packing, the layout of every binlog bit array
pub(crate) fn pack_bits<I: IntoIterator<Item = bool>>(bits: I) -> Vec<u8> {
    let mut packed = Vec::new();
    for (i, bit) in bits.into_iter().enumerate() {
        if i % 8 == 0 {
            packed.push(0);
        }
        if bit {
            *packed.last_mut().unwrap() |= 1 << (i & 7);
        }
    }
    packed
}
