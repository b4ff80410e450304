//! shared body of write_rows, update_rows and delete_rows events
use super::table_map::{TableMap, TableMapCache};
use crate::col::ColumnValue;
use crate::error::{Error, Result};
use bitflags::bitflags;
use bytes::{Buf, Bytes};
use bytes_reader::{ReadBytesExt, ReadFromBytesWithContext, ReadMyEnc};

bitflags! {
    pub struct RowsFlags: u16 {
        const STMT_END              = 0x0001;
        const NO_FOREIGN_KEY_CHECKS = 0x0002;
        const RELAXED_UNIQUE_CHECKS = 0x0004;
        const COMPLETE_ROWS         = 0x0008;
    }
}

/// one cell of a row image, aligned with the table's column list
#[derive(Debug, Clone, PartialEq)]
pub enum RowCell {
    /// column excluded by the columns-used bitmap
    Absent,
    Null,
    Value(ColumnValue),
}

/// decoded state of a single row; always exactly one cell per table
/// column
#[derive(Debug, Clone, PartialEq)]
pub struct RowImage {
    pub cells: Vec<RowCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRowImage {
    pub before: RowImage,
    pub after: RowImage,
}

/// Data of WriteRowsEvent and DeleteRowsEvent
///
/// the single bitmap describes the after image for writes and the
/// before image for deletes
#[derive(Debug, Clone, PartialEq)]
pub struct RowsData {
    // actually a 6-byte integer
    pub table_id: u64,
    pub flags: RowsFlags,
    pub columns_used: Vec<bool>,
    pub rows: Vec<RowImage>,
}

/// Data of UpdateRowsEvent: paired before/after images with separate
/// column bitmaps
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRowsData {
    pub table_id: u64,
    pub flags: RowsFlags,
    pub columns_used_before: Vec<bool>,
    pub columns_used_after: Vec<bool>,
    pub rows: Vec<UpdateRowImage>,
}

/// common prefix: table id, flags, cache lookup, column count
fn read_rows_prefix<'a>(
    input: &mut Bytes,
    cache: &'a TableMapCache,
) -> Result<(u64, RowsFlags, &'a TableMap, usize)> {
    let table_id = input.read_le_u48()?;
    let flags = RowsFlags::from_bits_truncate(input.read_le_u16()?);
    let table = cache
        .lookup(table_id)
        .ok_or(Error::UnknownTableId(table_id))?;
    let col_cnt = input.read_len_enc_int()? as usize;
    if col_cnt != table.columns.len() {
        return Err(Error::ColumnCountMismatch {
            expected: table.columns.len(),
            actual: col_cnt,
        });
    }
    Ok((table_id, flags, table, col_cnt))
}

pub(crate) fn read_rows(input: &mut Bytes, cache: &TableMapCache) -> Result<RowsData> {
    let (table_id, flags, table, col_cnt) = read_rows_prefix(input, cache)?;
    let columns_used = input.read_bit_array(col_cnt)?;
    let mut rows = Vec::new();
    while input.has_remaining() {
        let row = read_row_image(input, table, &columns_used).map_err(over_read_guard)?;
        rows.push(row);
    }
    Ok(RowsData {
        table_id,
        flags,
        columns_used,
        rows,
    })
}

pub(crate) fn read_update_rows(input: &mut Bytes, cache: &TableMapCache) -> Result<UpdateRowsData> {
    let (table_id, flags, table, col_cnt) = read_rows_prefix(input, cache)?;
    let columns_used_before = input.read_bit_array(col_cnt)?;
    let columns_used_after = input.read_bit_array(col_cnt)?;
    let mut rows = Vec::new();
    while input.has_remaining() {
        let before =
            read_row_image(input, table, &columns_used_before).map_err(over_read_guard)?;
        let after = read_row_image(input, table, &columns_used_after).map_err(over_read_guard)?;
        rows.push(UpdateRowImage { before, after });
    }
    Ok(UpdateRowsData {
        table_id,
        flags,
        columns_used_before,
        columns_used_after,
        rows,
    })
}

/// null bitmap spanning every table column, then one value per used,
/// non-null column
fn read_row_image(input: &mut Bytes, table: &TableMap, used: &[bool]) -> Result<RowImage> {
    let null_bitmap = input.read_bit_array(table.columns.len())?;
    let mut cells = Vec::with_capacity(table.columns.len());
    for (i, desc) in table.columns.iter().enumerate() {
        let cell = if !used[i] {
            RowCell::Absent
        } else if null_bitmap[i] {
            RowCell::Null
        } else {
            RowCell::Value(ColumnValue::read_with_ctx(input, desc)?)
        };
        cells.push(cell);
    }
    Ok(RowImage { cells })
}

/// a row image that runs out of body bytes has crossed body_end
fn over_read_guard(e: Error) -> Error {
    if e.is_short_read() {
        Error::OverReadRowImage
    } else {
        e
    }
}
