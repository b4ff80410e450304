//! byte-level reading primitives for binlog decoding
//!
//! `EventReader` pulls exact-sized chunks out of a positioned byte source,
//! the extension traits decode fields out of those chunks.
pub mod bytes;
pub mod error;
pub mod my;
pub mod reader;

pub use crate::bytes::{ReadBytesExt, WriteBytesExt};
pub use crate::error::{Error, Result};
pub use crate::my::ReadMyEnc;
pub use crate::reader::EventReader;

use ::bytes::Bytes;

/// read object from a byte chunk, consuming its encoding
pub trait ReadFromBytes: Sized {
    fn read_from(input: &mut Bytes) -> Result<Self>;
}

/// read object from a byte chunk with external context
pub trait ReadFromBytesWithContext<'c>: Sized {
    type Context: 'c;

    fn read_with_ctx(input: &mut Bytes, ctx: Self::Context) -> Result<Self>;
}
