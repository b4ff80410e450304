use bytes::Bytes;
use bytes_reader::{Error, ReadBytesExt, ReadFromBytes, Result};
use std::convert::TryFrom;

/// Data of IntvarEvent
///
/// reference: https://dev.mysql.com/doc/internals/en/intvar-event.html
#[derive(Debug, Clone, PartialEq)]
pub struct IntvarData {
    pub key: IntvarKey,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntvarKey {
    LastInsertId,
    InsertId,
}

impl TryFrom<u8> for IntvarKey {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x01 => Ok(IntvarKey::LastInsertId),
            0x02 => Ok(IntvarKey::InsertId),
            _ => Err(Error::Constraint(format!("invalid intvar key: {}", code))),
        }
    }
}

impl ReadFromBytes for IntvarData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let key = IntvarKey::try_from(input.read_u8()?)?;
        let value = input.read_le_u64()?;
        Ok(IntvarData { key, value })
    }
}
