use bytes::Bytes;
use bytes_reader::{ReadBytesExt, ReadFromBytes, Result};

/// Data of XidEvent, the commit marker of a transaction
///
/// reference: https://dev.mysql.com/doc/internals/en/xid-event.html
#[derive(Debug, Clone, PartialEq)]
pub struct XidData {
    pub xid: u64,
}

impl ReadFromBytes for XidData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let xid = input.read_le_u64()?;
        Ok(XidData { xid })
    }
}
