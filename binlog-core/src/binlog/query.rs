//! query event and its status-variable block
use crate::error::{Error, Result};
use bitflags::bitflags;
use bytes::{Buf, Bytes};
use bytes_reader::{ReadBytesExt, ReadMyEnc};
use smol_str::SmolStr;

/// Data of QueryEvent
///
/// reference: https://dev.mysql.com/doc/internals/en/query-event.html
/// only binlog v4, which carries the status block length in the post
/// header
#[derive(Debug, Clone, PartialEq)]
pub struct QueryData {
    pub thread_id: u32,
    pub exec_time: u32,
    pub error_code: u16,
    pub status_vars: Vec<QueryStatusVar>,
    pub db: SmolStr,
    pub query: String,
}

/// session-scoped variable carried in the status block
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatusVar {
    Flags2(Flags2),
    SqlMode(u64),
    CatalogDeprecated(String),
    AutoIncrement { increment: u16, offset: u16 },
    /// collation codes; the name catalog is external
    Charset { client: u16, connection: u16, server: u16 },
    TimeZone(String),
    Catalog(String),
    LcTimeNames(u16),
    CharsetDatabase(u16),
    TableMapForUpdate(u64),
    MasterDataWritten(u32),
    Invoker { username: String, hostname: String },
}

bitflags! {
    pub struct Flags2: u32 {
        const AUTO_IS_NULL          = 1 << 14;
        const NOT_AUTOCOMMIT        = 1 << 19;
        const NO_FOREIGN_KEY_CHECKS = 1 << 26;
        const RELAXED_UNIQUE_CHECKS = 1 << 27;
    }
}

impl QueryData {
    /// decode the body; query text beyond max_query_length is
    /// dropped, though the full body is consumed either way
    pub fn read_from(input: &mut Bytes, max_query_length: Option<usize>) -> Result<QueryData> {
        let thread_id = input.read_le_u32()?;
        let exec_time = input.read_le_u32()?;
        let db_len = input.read_u8()?;
        let error_code = input.read_le_u16()?;
        let status_len = input.read_le_u16()?;
        // 13(4+4+1+2+2) bytes consumed
        let status_region = input.read_len(status_len as usize)?;
        let status_vars = read_status_vars(status_region).map_err(|e| {
            if e.is_short_read() {
                Error::OverReadStatus
            } else {
                e
            }
        })?;
        let db = input.read_nstringz(db_len as usize)?;
        let db = SmolStr::new(String::from_utf8_lossy(db.as_ref()));
        let query_len = input.remaining();
        let keep = max_query_length.map_or(query_len, |max| max.min(query_len));
        let query = input.read_len(keep)?;
        let query = String::from_utf8_lossy(query.as_ref()).into_owned();
        // drop whatever truncation left behind
        input.advance(input.remaining());
        Ok(QueryData {
            thread_id,
            exec_time,
            error_code,
            status_vars,
            db,
            query,
        })
    }
}

/// decode typed variables until the region is exhausted
///
/// the region is exactly status_length bytes, so a payload running
/// past the end surfaces as a short read of the region
fn read_status_vars(mut input: Bytes) -> Result<Vec<QueryStatusVar>> {
    let mut vars = Vec::new();
    while input.has_remaining() {
        let code = input.read_u8()?;
        let var = match code {
            0x00 => QueryStatusVar::Flags2(Flags2::from_bits_truncate(input.read_le_u32()?)),
            0x01 => QueryStatusVar::SqlMode(input.read_le_u64()?),
            0x02 => {
                let s = input.read_lpstringz()?;
                QueryStatusVar::CatalogDeprecated(String::from_utf8_lossy(s.as_ref()).into_owned())
            }
            0x03 => QueryStatusVar::AutoIncrement {
                increment: input.read_le_u16()?,
                offset: input.read_le_u16()?,
            },
            0x04 => QueryStatusVar::Charset {
                client: input.read_le_u16()?,
                connection: input.read_le_u16()?,
                server: input.read_le_u16()?,
            },
            0x05 => {
                let s = input.read_lpstring()?;
                QueryStatusVar::TimeZone(String::from_utf8_lossy(s.as_ref()).into_owned())
            }
            0x06 => {
                let s = input.read_lpstring()?;
                QueryStatusVar::Catalog(String::from_utf8_lossy(s.as_ref()).into_owned())
            }
            0x07 => QueryStatusVar::LcTimeNames(input.read_le_u16()?),
            0x08 => QueryStatusVar::CharsetDatabase(input.read_le_u16()?),
            0x09 => QueryStatusVar::TableMapForUpdate(input.read_le_u64()?),
            0x0a => QueryStatusVar::MasterDataWritten(input.read_le_u32()?),
            0x0b => {
                let username = input.read_lpstring()?;
                let hostname = input.read_lpstring()?;
                QueryStatusVar::Invoker {
                    username: String::from_utf8_lossy(username.as_ref()).into_owned(),
                    hostname: String::from_utf8_lossy(hostname.as_ref()).into_owned(),
                }
            }
            // a variable of unknown code has an unknown payload size
            // and cannot be skipped safely
            other => return Err(Error::UnsupportedStatusVar(other)),
        };
        vars.push(var);
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};
    use bytes_reader::WriteBytesExt;

    fn query_body(status_vars: &[u8], db: &str, query: &str) -> Bytes {
        let mut out = BytesMut::new();
        out.write_le_u32(42).unwrap();
        out.write_le_u32(0).unwrap();
        out.write_u8(db.len() as u8).unwrap();
        out.write_le_u16(0).unwrap();
        out.write_le_u16(status_vars.len() as u16).unwrap();
        out.put_slice(status_vars);
        out.put_slice(db.as_bytes());
        out.write_u8(0).unwrap();
        out.put_slice(query.as_bytes());
        out.freeze()
    }

    #[test]
    fn test_begin_query() -> Result<()> {
        let mut input = query_body(&[], "test", "BEGIN");
        let query = QueryData::read_from(&mut input, None)?;
        assert_eq!(42, query.thread_id);
        assert_eq!(0, query.error_code);
        assert!(query.status_vars.is_empty());
        assert_eq!("test", query.db);
        assert_eq!("BEGIN", query.query);
        assert!(!input.has_remaining());
        Ok(())
    }

    #[test]
    fn test_empty_query_text() -> Result<()> {
        let mut input = query_body(&[], "test", "");
        let query = QueryData::read_from(&mut input, None)?;
        assert_eq!("", query.query);
        Ok(())
    }

    #[test]
    fn test_query_truncation_consumes_body() -> Result<()> {
        let mut input = query_body(&[], "d", "SELECT 1");
        let query = QueryData::read_from(&mut input, Some(6))?;
        assert_eq!("SELECT", query.query);
        // truncation must not leave unread body bytes behind
        assert!(!input.has_remaining());
        Ok(())
    }

    #[test]
    fn test_status_vars() -> Result<()> {
        let mut status = BytesMut::new();
        status.write_u8(0x00).unwrap();
        status.write_le_u32((1 << 14) | (1 << 26)).unwrap();
        status.write_u8(0x01).unwrap();
        status.write_le_u64(0x0008_0000).unwrap();
        status.write_u8(0x03).unwrap();
        status.write_le_u16(2).unwrap();
        status.write_le_u16(1).unwrap();
        status.write_u8(0x04).unwrap();
        status.write_le_u16(33).unwrap();
        status.write_le_u16(33).unwrap();
        status.write_le_u16(8).unwrap();
        status.write_u8(0x05).unwrap();
        status.write_u8(6).unwrap();
        status.put_slice(b"SYSTEM");
        let mut input = query_body(&status.freeze(), "test", "INSERT INTO t VALUES (1)");
        let query = QueryData::read_from(&mut input, None)?;
        assert_eq!(
            vec![
                QueryStatusVar::Flags2(Flags2::AUTO_IS_NULL | Flags2::NO_FOREIGN_KEY_CHECKS),
                QueryStatusVar::SqlMode(0x0008_0000),
                QueryStatusVar::AutoIncrement {
                    increment: 2,
                    offset: 1
                },
                QueryStatusVar::Charset {
                    client: 33,
                    connection: 33,
                    server: 8
                },
                QueryStatusVar::TimeZone("SYSTEM".to_owned()),
            ],
            query.status_vars
        );
        Ok(())
    }

    #[test]
    fn test_invoker_and_master_data_written() -> Result<()> {
        let mut status = BytesMut::new();
        status.write_u8(0x0a).unwrap();
        status.write_le_u32(1024).unwrap();
        status.write_u8(0x0b).unwrap();
        status.write_u8(4).unwrap();
        status.put_slice(b"root");
        status.write_u8(9).unwrap();
        status.put_slice(b"localhost");
        let mut input = query_body(&status.freeze(), "", "FLUSH LOGS");
        let query = QueryData::read_from(&mut input, None)?;
        assert_eq!(
            vec![
                QueryStatusVar::MasterDataWritten(1024),
                QueryStatusVar::Invoker {
                    username: "root".to_owned(),
                    hostname: "localhost".to_owned()
                },
            ],
            query.status_vars
        );
        Ok(())
    }

    #[test]
    fn test_over_read_status() {
        // flags2 needs four payload bytes, the block holds only two
        let mut input = query_body(&[0x00, 0xff, 0xff], "t", "X");
        let err = QueryData::read_from(&mut input, None).unwrap_err();
        assert!(matches!(err, Error::OverReadStatus));
    }

    #[test]
    fn test_unknown_status_var_is_fatal() {
        let mut input = query_body(&[0x7f], "t", "X");
        let err = QueryData::read_from(&mut input, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStatusVar(0x7f)));
    }
}
