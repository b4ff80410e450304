//! column catalog, per-column metadata shapes and row value decoding
use crate::error::{Error, Result};
use bytes::Bytes;
use bytes_reader::{ReadBytesExt, ReadFromBytesWithContext, ReadMyEnc};
use std::convert::TryFrom;

/// column type as tagged in a table map event
///
/// the numeric assignments are the canonical ones from
/// https://github.com/mysql/mysql-server/blob/5.7/libbinlogevents/export/binary_log_types.h
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Decimal,
    Tiny,
    Short,
    Long,
    Float,
    Double,
    Null,
    Timestamp,
    LongLong,
    Int24,
    Date,
    Time,
    DateTime,
    Year,
    NewDate,
    Varchar,
    Bit,
    NewDecimal,
    Enum,
    Set,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Blob,
    VarString,
    String,
    Geometry,
}

impl TryFrom<u8> for ColumnType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        let ct = match code {
            0x00 => ColumnType::Decimal,
            0x01 => ColumnType::Tiny,
            0x02 => ColumnType::Short,
            0x03 => ColumnType::Long,
            0x04 => ColumnType::Float,
            0x05 => ColumnType::Double,
            0x06 => ColumnType::Null,
            0x07 => ColumnType::Timestamp,
            0x08 => ColumnType::LongLong,
            0x09 => ColumnType::Int24,
            0x0a => ColumnType::Date,
            0x0b => ColumnType::Time,
            0x0c => ColumnType::DateTime,
            0x0d => ColumnType::Year,
            0x0e => ColumnType::NewDate,
            0x0f => ColumnType::Varchar,
            0x10 => ColumnType::Bit,
            0xf6 => ColumnType::NewDecimal,
            0xf7 => ColumnType::Enum,
            0xf8 => ColumnType::Set,
            0xf9 => ColumnType::TinyBlob,
            0xfa => ColumnType::MediumBlob,
            0xfb => ColumnType::LongBlob,
            0xfc => ColumnType::Blob,
            0xfd => ColumnType::VarString,
            0xfe => ColumnType::String,
            0xff => ColumnType::Geometry,
            _ => return Err(Error::InvalidColumnTypeCode(code)),
        };
        Ok(ct)
    }
}

impl From<ColumnType> for u8 {
    fn from(ct: ColumnType) -> u8 {
        match ct {
            ColumnType::Decimal => 0x00,
            ColumnType::Tiny => 0x01,
            ColumnType::Short => 0x02,
            ColumnType::Long => 0x03,
            ColumnType::Float => 0x04,
            ColumnType::Double => 0x05,
            ColumnType::Null => 0x06,
            ColumnType::Timestamp => 0x07,
            ColumnType::LongLong => 0x08,
            ColumnType::Int24 => 0x09,
            ColumnType::Date => 0x0a,
            ColumnType::Time => 0x0b,
            ColumnType::DateTime => 0x0c,
            ColumnType::Year => 0x0d,
            ColumnType::NewDate => 0x0e,
            ColumnType::Varchar => 0x0f,
            ColumnType::Bit => 0x10,
            ColumnType::NewDecimal => 0xf6,
            ColumnType::Enum => 0xf7,
            ColumnType::Set => 0xf8,
            ColumnType::TinyBlob => 0xf9,
            ColumnType::MediumBlob => 0xfa,
            ColumnType::LongBlob => 0xfb,
            ColumnType::Blob => 0xfc,
            ColumnType::VarString => 0xfd,
            ColumnType::String => 0xfe,
            ColumnType::Geometry => 0xff,
        }
    }
}

/// per-column metadata, one shape per layout family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMeta {
    None,
    /// float, double
    PackLength { size: u8 },
    Varchar { max_length: u16 },
    Bit { bits_total: u16 },
    NewDecimal { precision: u8, decimals: u8 },
    /// blob family, geometry
    LengthSize { length_size: u8 },
    /// string/var_string whose real type is not enum/set
    MaxLength { max_length: u8 },
    /// enum/set discovered through the string metadata remap
    EnumSetSize { size: u8 },
}

/// one column of a cached table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub col_type: ColumnType,
    pub nullable: bool,
    pub meta: ColumnMeta,
}

/// read one column's metadata out of the bounded metadata region
///
/// string-tagged columns carry their real type in the first metadata
/// byte; an enum/set found there replaces the column type, so the
/// final pair is returned directly instead of patching it afterwards
pub fn read_column_meta(input: &mut Bytes, col_type: ColumnType) -> Result<(ColumnType, ColumnMeta)> {
    let pair = match col_type {
        ColumnType::Float | ColumnType::Double => {
            let size = input.read_u8()?;
            (col_type, ColumnMeta::PackLength { size })
        }
        ColumnType::Varchar => {
            let max_length = input.read_le_u16()?;
            (col_type, ColumnMeta::Varchar { max_length })
        }
        ColumnType::Bit => {
            let bits = input.read_u8()?;
            let bytes = input.read_u8()?;
            (
                col_type,
                ColumnMeta::Bit {
                    bits_total: bytes as u16 * 8 + bits as u16,
                },
            )
        }
        ColumnType::NewDecimal => {
            let precision = input.read_u8()?;
            let decimals = input.read_u8()?;
            (col_type, ColumnMeta::NewDecimal { precision, decimals })
        }
        ColumnType::TinyBlob
        | ColumnType::MediumBlob
        | ColumnType::LongBlob
        | ColumnType::Blob
        | ColumnType::Geometry => {
            let length_size = input.read_u8()?;
            (col_type, ColumnMeta::LengthSize { length_size })
        }
        ColumnType::String | ColumnType::VarString => {
            let real_type = ColumnType::try_from(input.read_u8()?)?;
            let second = input.read_u8()?;
            match real_type {
                ColumnType::Enum | ColumnType::Set => {
                    (real_type, ColumnMeta::EnumSetSize { size: second })
                }
                _ => (col_type, ColumnMeta::MaxLength { max_length: second }),
            }
        }
        _ => (col_type, ColumnMeta::None),
    };
    Ok(pair)
}

/// decoded cell value of a row image
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Tiny(i8),
    Short(i16),
    Int24(i32),
    Long(i32),
    LongLong(i64),
    Float(f32),
    Double(f64),
    /// seconds since epoch
    Timestamp(u32),
    DateTime {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
    Date {
        year: u16,
        month: u8,
        day: u8,
    },
    Time {
        hours: u16,
        minutes: u8,
        seconds: u8,
    },
    Year(u16),
    Varchar(Bytes),
    VarString(Bytes),
    String(Bytes),
    /// packed value bytes, big-endian as on the wire
    Bit(Bytes),
    Enum(u64),
    Set(u64),
    /// pre-5.0 decimal, a length-encoded digit string
    Decimal(Bytes),
    /// packed decimal region, sized from (precision, decimals)
    NewDecimal(Bytes),
    Blob(Bytes),
    Geometry(Bytes),
}

impl<'c> ReadFromBytesWithContext<'c> for ColumnValue {
    type Context = &'c ColumnDescriptor;

    fn read_with_ctx(input: &mut Bytes, desc: Self::Context) -> bytes_reader::Result<Self> {
        let val = match (desc.col_type, &desc.meta) {
            (ColumnType::Null, _) => ColumnValue::Null,
            (ColumnType::Tiny, _) => ColumnValue::Tiny(input.read_i8()?),
            (ColumnType::Short, _) => ColumnValue::Short(input.read_le_i16()?),
            (ColumnType::Int24, _) => ColumnValue::Int24(input.read_le_i24()?),
            (ColumnType::Long, _) => ColumnValue::Long(input.read_le_i32()?),
            (ColumnType::LongLong, _) => ColumnValue::LongLong(input.read_le_i64()?),
            (ColumnType::Float, ColumnMeta::PackLength { size: 4 }) => {
                ColumnValue::Float(input.read_le_f32()?)
            }
            (ColumnType::Double, ColumnMeta::PackLength { size: 8 }) => {
                ColumnValue::Double(input.read_le_f64()?)
            }
            (ColumnType::Timestamp, _) => ColumnValue::Timestamp(input.read_le_u32()?),
            (ColumnType::DateTime, _) => {
                // packed decimal YYYYMMDDHHMMSS
                let packed = input.read_le_u64()?;
                let date = packed / 1_000_000;
                let time = packed % 1_000_000;
                ColumnValue::DateTime {
                    year: (date / 10_000) as u16,
                    month: ((date / 100) % 100) as u8,
                    day: (date % 100) as u8,
                    hour: (time / 10_000) as u8,
                    minute: ((time / 100) % 100) as u8,
                    second: (time % 100) as u8,
                }
            }
            (ColumnType::Date | ColumnType::NewDate, _) => {
                let packed = input.read_le_u24()?;
                ColumnValue::Date {
                    year: (packed >> 9) as u16,
                    month: ((packed >> 5) & 0x0f) as u8,
                    day: (packed & 0x1f) as u8,
                }
            }
            (ColumnType::Time, _) => {
                // packed decimal HHMMSS
                let packed = input.read_le_u24()?;
                ColumnValue::Time {
                    hours: (packed / 10_000) as u16,
                    minutes: ((packed / 100) % 100) as u8,
                    seconds: (packed % 100) as u8,
                }
            }
            (ColumnType::Year, _) => ColumnValue::Year(1900 + input.read_u8()? as u16),
            (ColumnType::Varchar, ColumnMeta::Varchar { max_length }) => {
                let len = read_var_length(input, *max_length as usize)?;
                ColumnValue::Varchar(input.read_len(len)?)
            }
            (ColumnType::VarString, ColumnMeta::MaxLength { max_length }) => {
                let len = read_var_length(input, *max_length as usize)?;
                ColumnValue::VarString(input.read_len(len)?)
            }
            (ColumnType::String, ColumnMeta::MaxLength { max_length }) => {
                let len = read_var_length(input, *max_length as usize)?;
                ColumnValue::String(input.read_len(len)?)
            }
            (ColumnType::Bit, ColumnMeta::Bit { bits_total }) => {
                ColumnValue::Bit(input.read_len((*bits_total as usize + 7) / 8)?)
            }
            (ColumnType::Enum, ColumnMeta::EnumSetSize { size }) => {
                ColumnValue::Enum(input.read_le_uint(*size as usize)?)
            }
            (ColumnType::Set, ColumnMeta::EnumSetSize { size }) => {
                ColumnValue::Set(input.read_le_uint(*size as usize)?)
            }
            (ColumnType::Decimal, _) => {
                let len = input.read_len_enc_int()?;
                ColumnValue::Decimal(input.read_len(len as usize)?)
            }
            (ColumnType::NewDecimal, ColumnMeta::NewDecimal { precision, decimals }) => {
                let size = decimal_binary_size(*precision, *decimals);
                ColumnValue::NewDecimal(input.read_len(size)?)
            }
            (
                ColumnType::TinyBlob
                | ColumnType::MediumBlob
                | ColumnType::LongBlob
                | ColumnType::Blob,
                ColumnMeta::LengthSize { length_size },
            ) => {
                let len = input.read_le_uint(*length_size as usize)?;
                ColumnValue::Blob(input.read_len(len as usize)?)
            }
            (ColumnType::Geometry, ColumnMeta::LengthSize { length_size }) => {
                let len = input.read_le_uint(*length_size as usize)?;
                ColumnValue::Geometry(input.read_len(len as usize)?)
            }
            (col_type, meta) => {
                return Err(bytes_reader::Error::Constraint(format!(
                    "cannot decode column type {:?} with metadata {:?}",
                    col_type, meta
                )))
            }
        };
        Ok(val)
    }
}

/// string-family values carry a 1-byte length when the column cannot
/// exceed 255 bytes, a 2-byte length otherwise
fn read_var_length(input: &mut Bytes, max_length: usize) -> bytes_reader::Result<usize> {
    if max_length > 255 {
        Ok(input.read_le_u16()? as usize)
    } else {
        Ok(input.read_u8()? as usize)
    }
}

/// on-disk size of a packed decimal with the given precision/scale
///
/// digits are stored in groups of nine per four bytes, with the
/// leftover group packed into the smallest sufficient integer
fn decimal_binary_size(precision: u8, decimals: u8) -> usize {
    const DIG2BYTES: [usize; 10] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 4];
    let intg = (precision - decimals) as usize;
    let frac = decimals as usize;
    (intg / 9) * 4 + DIG2BYTES[intg % 9] + (frac / 9) * 4 + DIG2BYTES[frac % 9]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(col_type: ColumnType, meta: ColumnMeta) -> ColumnDescriptor {
        ColumnDescriptor {
            col_type,
            nullable: false,
            meta,
        }
    }

    #[test]
    fn test_string_meta_remap_to_enum() -> Result<()> {
        let mut meta = Bytes::from_static(&[0xf7, 0x02]);
        let (ct, m) = read_column_meta(&mut meta, ColumnType::String)?;
        assert_eq!(ColumnType::Enum, ct);
        assert_eq!(ColumnMeta::EnumSetSize { size: 2 }, m);
        Ok(())
    }

    #[test]
    fn test_string_meta_without_remap() -> Result<()> {
        let mut meta = Bytes::from_static(&[0xfe, 0x14]);
        let (ct, m) = read_column_meta(&mut meta, ColumnType::String)?;
        assert_eq!(ColumnType::String, ct);
        assert_eq!(ColumnMeta::MaxLength { max_length: 20 }, m);
        Ok(())
    }

    #[test]
    fn test_fixed_width_meta_shapes() -> Result<()> {
        let mut meta = Bytes::from_static(&[4, 20, 0, 2, 1, 10, 2, 2]);
        assert_eq!(
            (ColumnType::Float, ColumnMeta::PackLength { size: 4 }),
            read_column_meta(&mut meta, ColumnType::Float)?
        );
        assert_eq!(
            (ColumnType::Varchar, ColumnMeta::Varchar { max_length: 20 }),
            read_column_meta(&mut meta, ColumnType::Varchar)?
        );
        assert_eq!(
            (ColumnType::Bit, ColumnMeta::Bit { bits_total: 10 }),
            read_column_meta(&mut meta, ColumnType::Bit)?
        );
        assert_eq!(
            (
                ColumnType::NewDecimal,
                ColumnMeta::NewDecimal {
                    precision: 10,
                    decimals: 2
                }
            ),
            read_column_meta(&mut meta, ColumnType::NewDecimal)?
        );
        assert_eq!(
            (ColumnType::Long, ColumnMeta::None),
            read_column_meta(&mut meta, ColumnType::Long)?
        );
        assert_eq!(
            (ColumnType::Blob, ColumnMeta::LengthSize { length_size: 2 }),
            read_column_meta(&mut meta, ColumnType::Blob)?
        );
        Ok(())
    }

    #[test]
    fn test_int_values() -> bytes_reader::Result<()> {
        let mut input = Bytes::from_static(&[0xff, 0x01, 0x00, 0x2a, 0x00, 0x00, 0x00]);
        assert_eq!(
            ColumnValue::Tiny(-1),
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::Tiny, ColumnMeta::None))?
        );
        assert_eq!(
            ColumnValue::Short(1),
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::Short, ColumnMeta::None))?
        );
        assert_eq!(
            ColumnValue::Long(42),
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::Long, ColumnMeta::None))?
        );
        Ok(())
    }

    #[test]
    fn test_varchar_length_prefix_widths() -> bytes_reader::Result<()> {
        let mut short = Bytes::from_static(b"\x05hello");
        assert_eq!(
            ColumnValue::Varchar(Bytes::from_static(b"hello")),
            ColumnValue::read_with_ctx(
                &mut short,
                &desc(ColumnType::Varchar, ColumnMeta::Varchar { max_length: 20 })
            )?
        );
        let mut wide = Bytes::from_static(b"\x05\x00hello");
        assert_eq!(
            ColumnValue::Varchar(Bytes::from_static(b"hello")),
            ColumnValue::read_with_ctx(
                &mut wide,
                &desc(ColumnType::Varchar, ColumnMeta::Varchar { max_length: 300 })
            )?
        );
        Ok(())
    }

    #[test]
    fn test_temporal_values() -> bytes_reader::Result<()> {
        // datetime 2016-01-02 12:34:56 packed as decimal
        let packed: u64 = 2016_01_02_12_34_56;
        let mut input = Bytes::copy_from_slice(&packed.to_le_bytes());
        assert_eq!(
            ColumnValue::DateTime {
                year: 2016,
                month: 1,
                day: 2,
                hour: 12,
                minute: 34,
                second: 56,
            },
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::DateTime, ColumnMeta::None))?
        );

        // date 2016-01-02: year<<9 | month<<5 | day
        let packed: u32 = (2016 << 9) | (1 << 5) | 2;
        let mut input = Bytes::copy_from_slice(&packed.to_le_bytes()[..3]);
        assert_eq!(
            ColumnValue::Date {
                year: 2016,
                month: 1,
                day: 2
            },
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::Date, ColumnMeta::None))?
        );

        let mut input = Bytes::from_static(&[116]);
        assert_eq!(
            ColumnValue::Year(2016),
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::Year, ColumnMeta::None))?
        );
        Ok(())
    }

    #[test]
    fn test_enum_and_bit_values() -> bytes_reader::Result<()> {
        let mut input = Bytes::from_static(&[0x02, 0x00]);
        assert_eq!(
            ColumnValue::Enum(2),
            ColumnValue::read_with_ctx(
                &mut input,
                &desc(ColumnType::Enum, ColumnMeta::EnumSetSize { size: 2 })
            )?
        );
        // bit(10) value 0x3ff packed big-endian into two bytes
        let mut input = Bytes::from_static(&[0x03, 0xff]);
        assert_eq!(
            ColumnValue::Bit(Bytes::from_static(&[0x03, 0xff])),
            ColumnValue::read_with_ctx(
                &mut input,
                &desc(ColumnType::Bit, ColumnMeta::Bit { bits_total: 10 })
            )?
        );
        Ok(())
    }

    #[test]
    fn test_old_decimal_and_newdate_values() -> bytes_reader::Result<()> {
        let mut input = Bytes::from_static(b"\x075.60000");
        assert_eq!(
            ColumnValue::Decimal(Bytes::from_static(b"5.60000")),
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::Decimal, ColumnMeta::None))?
        );

        let packed: u32 = (2016 << 9) | (1 << 5) | 2;
        let mut input = Bytes::copy_from_slice(&packed.to_le_bytes()[..3]);
        assert_eq!(
            ColumnValue::Date {
                year: 2016,
                month: 1,
                day: 2
            },
            ColumnValue::read_with_ctx(&mut input, &desc(ColumnType::NewDate, ColumnMeta::None))?
        );
        Ok(())
    }

    #[test]
    fn test_decimal_binary_size() {
        assert_eq!(5, decimal_binary_size(10, 2));
        assert_eq!(4, decimal_binary_size(9, 0));
        assert_eq!(1, decimal_binary_size(1, 0));
        assert_eq!(8, decimal_binary_size(18, 9));
    }

    #[test]
    fn test_blob_value() -> bytes_reader::Result<()> {
        let mut input = Bytes::from_static(b"\x03\x00abcd");
        assert_eq!(
            ColumnValue::Blob(Bytes::from_static(b"abc")),
            ColumnValue::read_with_ctx(
                &mut input,
                &desc(ColumnType::Blob, ColumnMeta::LengthSize { length_size: 2 })
            )?
        );
        Ok(())
    }
}
