//! format description event
use bytes::{Buf, Bytes};
use bytes_reader::{ReadBytesExt, ReadFromBytes};

/// Data of FormatDescriptionEvent
///
/// reference: https://dev.mysql.com/doc/internals/en/format-description-event.html
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptionData {
    pub binlog_version: u16,
    pub server_version: String,
    pub create_timestamp: u32,
    pub header_length: u8,
    /// per-type post-header lengths, kept verbatim
    pub post_header_lengths: Vec<u8>,
}

impl ReadFromBytes for FormatDescriptionData {
    fn read_from(input: &mut Bytes) -> bytes_reader::Result<Self> {
        let binlog_version = input.read_le_u16()?;
        // 50 bytes, NUL padded
        let mut raw_version = input.read_len(50)?;
        let server_version = raw_version.read_until(0, false)?;
        let server_version = String::from_utf8_lossy(server_version.as_ref()).into_owned();
        let create_timestamp = input.read_le_u32()?;
        let header_length = input.read_u8()?;
        let post_header_lengths = input.split_to(input.remaining()).to_vec();
        Ok(FormatDescriptionData {
            binlog_version,
            server_version,
            create_timestamp,
            header_length,
            post_header_lengths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn fde_body(version: &str, post_header_lengths: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&4u16.to_le_bytes());
        let mut padded = [0u8; 50];
        padded[..version.len()].copy_from_slice(version.as_bytes());
        body.extend_from_slice(&padded);
        body.extend_from_slice(&1_460_000_000u32.to_le_bytes());
        body.push(19);
        body.extend_from_slice(post_header_lengths);
        body
    }

    #[test]
    fn test_format_description() -> Result<()> {
        let body = fde_body("5.6.10-log", &[56, 13, 0, 8, 0]);
        let mut input = Bytes::from(body);
        let fde = FormatDescriptionData::read_from(&mut input)?;
        assert_eq!(4, fde.binlog_version);
        assert_eq!("5.6.10-log", fde.server_version);
        assert_eq!(1_460_000_000, fde.create_timestamp);
        assert_eq!(19, fde.header_length);
        assert_eq!(vec![56, 13, 0, 8, 0], fde.post_header_lengths);
        assert!(!input.has_remaining());
        Ok(())
    }

    #[test]
    fn test_format_description_without_trailer() -> Result<()> {
        let body = fde_body("5.5.50", &[]);
        let mut input = Bytes::from(body);
        let fde = FormatDescriptionData::read_from(&mut input)?;
        assert_eq!("5.5.50", fde.server_version);
        assert!(fde.post_header_lengths.is_empty());
        Ok(())
    }
}
