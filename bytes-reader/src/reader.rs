use crate::error::{Error, Result};
use ::bytes::Bytes;
use std::io::{ErrorKind, Read};

/// positioned byte reader over an arbitrary source
///
/// tracks the absolute offset of the next unread byte and hands out
/// exact-sized chunks; a chunk that cannot be filled completely is a
/// short read, never a partial result
#[derive(Debug)]
pub struct EventReader<S> {
    src: S,
    pos: u64,
}

impl<S: Read> EventReader<S> {
    pub fn new(src: S) -> Self {
        Self::with_position(src, 0)
    }

    /// wrap a source whose first byte sits at the given absolute offset
    pub fn with_position(src: S, pos: u64) -> Self {
        EventReader { src, pos }
    }

    /// absolute offset of the next unread byte
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// exactly n bytes, advancing the position by n
    pub fn read(&mut self, n: usize) -> Result<Bytes> {
        match self.read_or_eof(n)? {
            Some(chunk) => Ok(chunk),
            None => Err(Error::short(n)),
        }
    }

    /// exactly n bytes, or None if the source is already exhausted
    ///
    /// a source that yields some but fewer than n bytes is a short
    /// read: the caller sits mid-record and cannot recover here
    pub fn read_or_eof(&mut self, n: usize) -> Result<Option<Bytes>> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.src.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(r) => filled += r,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        if filled == 0 && n > 0 {
            return Ok(None);
        }
        if filled < n {
            return Err(Error::short(n - filled));
        }
        self.pos += n as u64;
        Ok(Some(Bytes::from(buf)))
    }

    /// discard exactly n bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read(n).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking() -> Result<()> {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = EventReader::new(&data[..]);
        assert_eq!(0, reader.position());
        assert_eq!(&[1, 2][..], reader.read(2)?.as_ref());
        assert_eq!(2, reader.position());
        reader.skip(1)?;
        assert_eq!(3, reader.position());
        Ok(())
    }

    #[test]
    fn test_eof_vs_short_read() -> Result<()> {
        let data = [1u8, 2, 3];
        let mut reader = EventReader::new(&data[..]);
        // partial fill is an error, not a truncated chunk
        assert!(reader.read(4).unwrap_err().is_short_read());
        // exhausted source reports clean end of stream
        let mut reader = EventReader::new(&data[..]);
        reader.read(3)?;
        assert!(reader.read_or_eof(4)?.is_none());
        assert_eq!(3, reader.position());
        Ok(())
    }

    #[test]
    fn test_with_position() -> Result<()> {
        let data = [9u8; 8];
        let mut reader = EventReader::with_position(&data[..], 100);
        reader.read(8)?;
        assert_eq!(108, reader.position());
        Ok(())
    }
}
