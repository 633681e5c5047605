use std::collections::BTreeMap;

use crate::error::*;
use crate::parse::Cursor;

/// Corresponds to the *"Table Directory"*
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff>
///
/// Tags are unique; the records are keyed by tag so callers look tables up
/// instead of scanning.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    pub scaler_type: u32,
    pub tables: BTreeMap<u32, TableRecord>,
}

impl TableDirectory {
    pub fn try_parse(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 12 {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::TableDirectory,
            ));
        }

        let mut cursor = Cursor::new(bytes, ErrorSource::TableDirectory);
        let scaler_type = cursor.read_u32()?;
        let num_tables = cursor.read_u16()? as usize;
        // 6..8 searchRange
        // 8..10 entrySelector
        // 10..12 rangeShift
        cursor.skip(6)?;

        if 12 + (num_tables * 16) > bytes.len() {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::TableDirectory,
            ));
        }

        let mut tables = BTreeMap::new();

        for _ in 0..num_tables {
            let record = TableRecord::try_parse(&mut cursor)?;

            if tables.insert(record.tag, record).is_some() {
                return Err(Error::new(
                    ErrorKind::MalformedHeader,
                    ErrorSource::TableDirectory,
                ));
            }
        }

        Ok(Self {
            scaler_type,
            tables,
        })
    }

    /// Record for `tag`, failing with `MissingTable` when absent.
    pub fn require(&self, tag: u32) -> Result<&TableRecord, Error> {
        self.tables.get(&tag).ok_or(Error::new(
            ErrorKind::MissingTable(tag),
            ErrorSource::TableDirectory,
        ))
    }
}

/// Corresponds to the *"Table Record"*
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: u32,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    fn try_parse(cursor: &mut Cursor) -> Result<Self, Error> {
        let tag = cursor.read_u32()?;
        let checksum = cursor.read_u32()?;
        let offset = cursor.read_u32()?;
        let length = cursor.read_u32()?;

        Ok(Self {
            tag,
            checksum,
            offset,
            length,
        })
    }
}
