use bytes::{Buf, Bytes};
use bytes_reader::{ReadBytesExt, ReadFromBytes, Result};
use smol_str::SmolStr;

/// Data of RotateEvent
///
/// reference: https://dev.mysql.com/doc/internals/en/rotate-event.html
#[derive(Debug, Clone, PartialEq)]
pub struct RotateData {
    /// first event offset within the next file
    pub position: u64,
    pub next_file: SmolStr,
}

impl ReadFromBytes for RotateData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let position = input.read_le_u64()?;
        // the file name runs to the end of the body
        let name = input.split_to(input.remaining());
        let next_file = SmolStr::new(String::from_utf8_lossy(name.as_ref()));
        Ok(RotateData {
            position,
            next_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate() -> Result<()> {
        let mut body = 4u64.to_le_bytes().to_vec();
        body.extend_from_slice(b"mysql-bin.000002");
        let mut input = Bytes::from(body);
        let rotate = RotateData::read_from(&mut input)?;
        assert_eq!(4, rotate.position);
        assert_eq!("mysql-bin.000002", rotate.next_file);
        Ok(())
    }
}
