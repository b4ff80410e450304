use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("read error: {0}")]
    Read(#[from] bytes_reader::Error),
    #[error("malformed event header: declared length {event_len} below the 19-byte minimum")]
    MalformedHeader { event_len: u32 },
    #[error("rows event references unknown table id {0}")]
    UnknownTableId(u64),
    #[error("query status block exceeded its declared length")]
    OverReadStatus,
    #[error("row image exceeded event body end")]
    OverReadRowImage,
    #[error("refusing to decode event type code {0}")]
    UnsupportedEvent(u8),
    #[error("unsupported query status variable code {0:#04x}")]
    UnsupportedStatusVar(u8),
    #[error("invalid column type code {0:#04x}")]
    InvalidColumnTypeCode(u8),
    #[error("column metadata region mismatch: declared {declared} bytes, {trailing} left unread")]
    MetadataLengthMismatch { declared: u64, trailing: u64 },
    #[error("rows event declares {actual} columns but the table map carries {expected}")]
    ColumnCountMismatch { expected: usize, actual: usize },
}

impl Error {
    /// whether the underlying cause is an exhausted byte region
    pub fn is_short_read(&self) -> bool {
        matches!(self, Error::Read(e) if e.is_short_read())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Read(e.into())
    }
}
