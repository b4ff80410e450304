use crate::bytes::ReadBytesExt;
use crate::error::{Error, Result};
use ::bytes::{BufMut, Bytes, BytesMut};

/// MySQL-encoded field decoders
pub trait ReadMyEnc {
    /// length-encoded integer
    ///
    /// reference: https://dev.mysql.com/doc/internals/en/integer.html
    /// the 0xfb/0xff lead bytes mark NULL/ERR in resultsets only; a
    /// length in binlog position can be neither, so both are rejected
    fn read_len_enc_int(&mut self) -> Result<u64>;

    /// exactly n bytes
    fn read_nstring(&mut self, n: usize) -> Result<Bytes>;

    /// exactly n bytes followed by a verified NUL terminator
    fn read_nstringz(&mut self, n: usize) -> Result<Bytes>;

    /// 1-byte length prefix, then that many bytes
    fn read_lpstring(&mut self) -> Result<Bytes>;

    /// 1-byte length prefix, then that many bytes, then a verified
    /// NUL terminator
    fn read_lpstringz(&mut self) -> Result<Bytes>;

    /// n booleans out of ceil(n/8) bytes, LSB first within each byte
    fn read_bit_array(&mut self, n: usize) -> Result<Vec<bool>>;
}

impl ReadMyEnc for Bytes {
    fn read_len_enc_int(&mut self) -> Result<u64> {
        let lead = self.read_u8()?;
        match lead {
            0xfc => Ok(self.read_le_u16()? as u64),
            0xfd => Ok(self.read_le_u24()? as u64),
            0xfe => self.read_le_u64(),
            0xfb | 0xff => Err(Error::Constraint(format!(
                "invalid length-encoded integer lead byte: {:#04x}",
                lead
            ))),
            _ => Ok(lead as u64),
        }
    }

    fn read_nstring(&mut self, n: usize) -> Result<Bytes> {
        self.read_len(n)
    }

    fn read_nstringz(&mut self, n: usize) -> Result<Bytes> {
        let s = self.read_len(n)?;
        let term = self.read_u8()?;
        if term != 0 {
            return Err(Error::Constraint(format!(
                "missing NUL terminator, found {:#04x}",
                term
            )));
        }
        Ok(s)
    }

    fn read_lpstring(&mut self) -> Result<Bytes> {
        let len = self.read_u8()?;
        self.read_len(len as usize)
    }

    fn read_lpstringz(&mut self) -> Result<Bytes> {
        let len = self.read_u8()?;
        self.read_nstringz(len as usize)
    }

    fn read_bit_array(&mut self, n: usize) -> Result<Vec<bool>> {
        let packed = self.read_len((n + 7) / 8)?;
        let mut bits = Vec::with_capacity(n);
        for i in 0..n {
            bits.push(packed[i >> 3] & (1 << (i & 7)) != 0);
        }
        Ok(bits)
    }
}

/// write a length-encoded integer, used to assemble wire images
pub fn write_len_enc_int(out: &mut BytesMut, n: u64) -> usize {
    if n < 0xfb {
        out.put_u8(n as u8);
        1
    } else if n <= 0xffff {
        out.put_u8(0xfc);
        out.put_u16_le(n as u16);
        3
    } else if n <= 0xff_ffff {
        out.put_u8(0xfd);
        out.put_uint_le(n, 3);
        4
    } else {
        out.put_u8(0xfe);
        out.put_u64_le(n);
        9
    }
}
