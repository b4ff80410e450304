use crate::error::{Error, Result};
use ::bytes::{Buf, BufMut, Bytes, BytesMut};

/// field-level decoders over a consuming byte chunk
///
/// all multi-byte integers are little endian, as everywhere in the
/// binlog wire format
pub trait ReadBytesExt {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_le_u16(&mut self) -> Result<u16>;

    fn read_le_u24(&mut self) -> Result<u32>;

    fn read_le_u32(&mut self) -> Result<u32>;

    fn read_le_u48(&mut self) -> Result<u64>;

    fn read_le_u64(&mut self) -> Result<u64>;

    /// little-endian unsigned integer of 1..=8 bytes
    fn read_le_uint(&mut self, size: usize) -> Result<u64>;

    /// take exactly n bytes as an owned chunk
    fn read_len(&mut self, n: usize) -> Result<Bytes>;

    /// bytes before the first occurrence of delim, or the full
    /// remainder if absent; the delimiter itself is consumed and
    /// included only if inclusive is set
    fn read_until(&mut self, delim: u8, inclusive: bool) -> Result<Bytes>;

    #[inline]
    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    #[inline]
    fn read_le_i16(&mut self) -> Result<i16> {
        Ok(self.read_le_u16()? as i16)
    }

    #[inline]
    fn read_le_i24(&mut self) -> Result<i32> {
        let value = self.read_le_u24()?;
        let value = if value & 0x80_0000 != 0 {
            (value | 0xff00_0000) as i32
        } else {
            value as i32
        };
        Ok(value)
    }

    #[inline]
    fn read_le_i32(&mut self) -> Result<i32> {
        Ok(self.read_le_u32()? as i32)
    }

    #[inline]
    fn read_le_i64(&mut self) -> Result<i64> {
        Ok(self.read_le_u64()? as i64)
    }

    #[inline]
    fn read_le_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_le_u32()?))
    }

    #[inline]
    fn read_le_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_le_u64()?))
    }
}

#[inline]
fn check(input: &Bytes, n: usize) -> Result<()> {
    if input.remaining() < n {
        return Err(Error::short(n - input.remaining()));
    }
    Ok(())
}

impl ReadBytesExt for Bytes {
    fn read_u8(&mut self) -> Result<u8> {
        check(self, 1)?;
        Ok(self.get_u8())
    }

    fn read_le_u16(&mut self) -> Result<u16> {
        check(self, 2)?;
        Ok(self.get_u16_le())
    }

    fn read_le_u24(&mut self) -> Result<u32> {
        check(self, 3)?;
        Ok(self.get_uint_le(3) as u32)
    }

    fn read_le_u32(&mut self) -> Result<u32> {
        check(self, 4)?;
        Ok(self.get_u32_le())
    }

    fn read_le_u48(&mut self) -> Result<u64> {
        check(self, 6)?;
        Ok(self.get_uint_le(6))
    }

    fn read_le_u64(&mut self) -> Result<u64> {
        check(self, 8)?;
        Ok(self.get_u64_le())
    }

    fn read_le_uint(&mut self, size: usize) -> Result<u64> {
        if size == 0 || size > 8 {
            return Err(Error::Constraint(format!(
                "invalid uint size: {}",
                size
            )));
        }
        check(self, size)?;
        Ok(self.get_uint_le(size))
    }

    fn read_len(&mut self, n: usize) -> Result<Bytes> {
        check(self, n)?;
        Ok(self.split_to(n))
    }

    fn read_until(&mut self, delim: u8, inclusive: bool) -> Result<Bytes> {
        match self.iter().position(|&b| b == delim) {
            Some(idx) => {
                let taken = if inclusive {
                    self.split_to(idx + 1)
                } else {
                    let taken = self.split_to(idx);
                    self.advance(1);
                    taken
                };
                Ok(taken)
            }
            None => Ok(self.split_to(self.remaining())),
        }
    }
}

/// write-side counterpart, used to assemble wire images
pub trait WriteBytesExt {
    fn write_u8(&mut self, n: u8) -> Result<usize>;

    fn write_le_u16(&mut self, n: u16) -> Result<usize>;

    fn write_le_u24(&mut self, n: u32) -> Result<usize>;

    fn write_le_u32(&mut self, n: u32) -> Result<usize>;

    fn write_le_u48(&mut self, n: u64) -> Result<usize>;

    fn write_le_u64(&mut self, n: u64) -> Result<usize>;
}

impl WriteBytesExt for BytesMut {
    fn write_u8(&mut self, n: u8) -> Result<usize> {
        self.put_u8(n);
        Ok(1)
    }

    fn write_le_u16(&mut self, n: u16) -> Result<usize> {
        self.put_u16_le(n);
        Ok(2)
    }

    fn write_le_u24(&mut self, n: u32) -> Result<usize> {
        debug_assert!(n <= 0xff_ffff);
        self.put_uint_le(n as u64, 3);
        Ok(3)
    }

    fn write_le_u32(&mut self, n: u32) -> Result<usize> {
        self.put_u32_le(n);
        Ok(4)
    }

    fn write_le_u48(&mut self, n: u64) -> Result<usize> {
        debug_assert!(n <= 0xffff_ffff_ffff_u64);
        self.put_uint_le(n, 6);
        Ok(6)
    }

    fn write_le_u64(&mut self, n: u64) -> Result<usize> {
        self.put_u64_le(n);
        Ok(8)
    }
}
