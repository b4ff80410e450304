//! table map event and the cross-event table definition cache
use crate::col::{read_column_meta, ColumnDescriptor, ColumnType};
use crate::error::{Error, Result};
use bitflags::bitflags;
use bytes::{Buf, Bytes};
use bytes_reader::{ReadBytesExt, ReadMyEnc};
use smol_str::SmolStr;
use std::collections::HashMap;
use std::convert::TryFrom;

bitflags! {
    pub struct TableMapFlags: u16 {
        const BIT_LEN_EXACT = 0x0001;
    }
}

/// cached definition of one mapped table
///
/// rows events carry only a table id; everything needed to decode
/// their row images lives here
#[derive(Debug, Clone, PartialEq)]
pub struct TableMap {
    pub db: SmolStr,
    pub table: SmolStr,
    pub columns: Vec<ColumnDescriptor>,
}

/// Data of TableMapEvent
///
/// reference: https://dev.mysql.com/doc/internals/en/table-map-event.html
#[derive(Debug, Clone, PartialEq)]
pub struct TableMapData {
    // actually a 6-byte integer
    pub table_id: u64,
    pub flags: TableMapFlags,
    pub table: TableMap,
}

impl TableMapData {
    pub fn read_from(input: &mut Bytes) -> Result<Self> {
        let table_id = input.read_le_u48()?;
        let flags = TableMapFlags::from_bits_truncate(input.read_le_u16()?);
        let db = input.read_lpstringz()?;
        let db = SmolStr::new(String::from_utf8_lossy(db.as_ref()));
        let table = input.read_lpstringz()?;
        let table = SmolStr::new(String::from_utf8_lossy(table.as_ref()));
        let col_cnt = input.read_len_enc_int()? as usize;
        let col_types = input.read_len(col_cnt)?;
        // the declared length bounds every per-column read
        let meta_len = input.read_len_enc_int()? as usize;
        let mut meta_region = input.read_len(meta_len)?;
        let mut pairs = Vec::with_capacity(col_cnt);
        for code in col_types.as_ref() {
            let col_type = ColumnType::try_from(*code)?;
            pairs.push(read_column_meta(&mut meta_region, col_type)?);
        }
        if meta_region.has_remaining() {
            return Err(Error::MetadataLengthMismatch {
                declared: meta_len as u64,
                trailing: meta_region.remaining() as u64,
            });
        }
        let nullability = input.read_bit_array(col_cnt)?;
        let columns = pairs
            .into_iter()
            .zip(nullability)
            .map(|((col_type, meta), nullable)| ColumnDescriptor {
                col_type,
                nullable,
                meta,
            })
            .collect();
        Ok(TableMapData {
            table_id,
            flags,
            table: TableMap { db, table, columns },
        })
    }
}

/// table definitions seen so far, keyed by table id
///
/// owned by a single parser instance; a later map for the same id
/// replaces the earlier one
#[derive(Debug, Default)]
pub struct TableMapCache {
    entries: HashMap<u64, TableMap>,
}

impl TableMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, table_id: u64, table: TableMap) {
        self.entries.insert(table_id, table);
    }

    pub fn lookup(&self, table_id: u64) -> Option<&TableMap> {
        self.entries.get(&table_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
