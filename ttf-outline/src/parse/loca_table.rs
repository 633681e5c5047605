use std::ops::Range;

use crate::error::*;
use crate::parse::{Cursor, HeadTable};

/// Corresponds to the `loca` table.
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/loca>
///
/// Offsets are stored resolved to bytes into `glyf`; the short format's
/// half-offsets are doubled while parsing. One entry more than the glyph
/// count, so adjacent pairs bound each glyph's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaTable {
    pub offsets: Vec<u32>,
}

impl LocaTable {
    pub fn try_parse(bytes: &[u8], head_table: &HeadTable) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes, ErrorSource::LocaTable);

        let offsets = match head_table.index_to_loc_format {
            0 => {
                let mut offsets = Vec::with_capacity(bytes.len() / 2);

                for _ in 0..(bytes.len() / 2) {
                    offsets.push(cursor.read_u16()? as u32 * 2);
                }

                offsets
            },
            1 => {
                let mut offsets = Vec::with_capacity(bytes.len() / 4);

                for _ in 0..(bytes.len() / 4) {
                    offsets.push(cursor.read_u32()?);
                }

                offsets
            },
            _ => {
                return Err(Error::new(
                    ErrorKind::MalformedHeader,
                    ErrorSource::LocaTable,
                ))
            },
        };

        if offsets.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::LocaTable,
            ));
        }

        Ok(Self {
            offsets,
        })
    }

    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Byte range of the glyph's record within `glyf`. An empty range is a
    /// glyph with no outline. `None` when the index is past the table.
    pub fn glyph_range(&self, glyph_index: u16) -> Option<Range<usize>> {
        let start = *self.offsets.get(glyph_index as usize)? as usize;
        let end = *self.offsets.get(glyph_index as usize + 1)? as usize;
        Some(start..end)
    }
}
