use bitflags::bitflags;
use bytes::{Buf, Bytes};
use bytes_reader::{Error, ReadBytesExt, ReadFromBytes, Result};

/// Data of UserVarEvent
///
/// reference: https://dev.mysql.com/doc/internals/en/user-var-event.html
#[derive(Debug, Clone, PartialEq)]
pub struct UserVarData {
    pub name: String,
    /// None when the variable was set to NULL
    pub value: Option<UserVarValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserVarValue {
    pub value_type: u8,
    pub charset_num: u32,
    pub value: Bytes,
    pub flags: UserVarFlags,
}

bitflags! {
    pub struct UserVarFlags: u8 {
        const UNSIGNED = 0x01;
    }
}

impl ReadFromBytes for UserVarData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let name_length = input.read_le_u32()?;
        let name = input.read_len(name_length as usize)?;
        let name = String::from_utf8_lossy(name.as_ref()).into_owned();
        let is_null = input.read_u8()?;
        let value = if is_null != 0 {
            None
        } else {
            Some(UserVarValue::read_from(input)?)
        };
        Ok(UserVarData { name, value })
    }
}

impl ReadFromBytes for UserVarValue {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let value_type = input.read_u8()?;
        let charset_num = input.read_le_u32()?;
        let value_len = input.read_le_u32()?;
        let value = input.read_len(value_len as usize)?;
        // the flags byte is absent in older servers
        let flags = if input.has_remaining() {
            input.read_u8()?
        } else {
            0
        };
        let flags = UserVarFlags::from_bits(flags)
            .ok_or_else(|| Error::Constraint(format!("invalid user var flags: {:#04x}", flags)))?;
        Ok(UserVarValue {
            value_type,
            charset_num,
            value,
            flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_var() -> Result<()> {
        let mut body = 3u32.to_le_bytes().to_vec();
        body.extend_from_slice(b"foo");
        body.push(0); // not null
        body.push(0x08); // int
        body.extend_from_slice(&63u32.to_le_bytes());
        body.extend_from_slice(&8u32.to_le_bytes());
        body.extend_from_slice(&7u64.to_le_bytes());
        body.push(0x01);
        let mut input = Bytes::from(body);
        let var = UserVarData::read_from(&mut input)?;
        assert_eq!("foo", var.name);
        let value = var.value.unwrap();
        assert_eq!(0x08, value.value_type);
        assert_eq!(63, value.charset_num);
        assert_eq!(&7u64.to_le_bytes()[..], value.value.as_ref());
        assert!(value.flags.contains(UserVarFlags::UNSIGNED));
        Ok(())
    }

    #[test]
    fn test_null_user_var() -> Result<()> {
        let mut body = 1u32.to_le_bytes().to_vec();
        body.extend_from_slice(b"x");
        body.push(1);
        let mut input = Bytes::from(body);
        let var = UserVarData::read_from(&mut input)?;
        assert_eq!("x", var.name);
        assert!(var.value.is_none());
        Ok(())
    }
}
