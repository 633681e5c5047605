use crate::error::*;
use crate::parse::Cursor;

/// Corresponds to the `cmap` table, restricted to one selected format-4
/// subtable.
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/cmap>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapTable {
    pub version: u16,
    pub encoding_records: Vec<EncodingRecord>,
    pub subtable: Format4Subtable,
}

impl CmapTable {
    pub fn try_parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes, ErrorSource::CmapTable);
        let version = cursor.read_u16()?;
        let num_tables = cursor.read_u16()? as usize;

        let mut encoding_records = Vec::with_capacity(num_tables);

        for _ in 0..num_tables {
            let platform_id = cursor.read_u16()?;
            let encoding_id = cursor.read_u16()?;
            let subtable_offset = cursor.read_u32()?;

            encoding_records.push(EncodingRecord {
                platform_id,
                encoding_id,
                subtable_offset,
            });
        }

        let selected = match Self::select_record(&encoding_records) {
            Some(record) => record,
            None => {
                return Err(Error::new(
                    ErrorKind::MalformedHeader,
                    ErrorSource::CmapTable,
                ))
            },
        };

        let subtable = Format4Subtable::try_parse(bytes, selected.subtable_offset as usize)?;

        Ok(Self {
            version,
            encoding_records,
            subtable,
        })
    }

    /// Deterministic subtable preference: the Windows Unicode BMP record
    /// (platform 3, encoding 1) wins, then the first Unicode-platform record,
    /// then whatever is listed first.
    fn select_record(records: &[EncodingRecord]) -> Option<&EncodingRecord> {
        records
            .iter()
            .find(|record| record.platform_id == 3 && record.encoding_id == 1)
            .or_else(|| records.iter().find(|record| record.platform_id == 0))
            .or_else(|| records.first())
    }

    pub fn glyph_index(&self, codepoint: u32) -> u16 {
        self.subtable.glyph_index(codepoint)
    }
}

/// Corresponds to the *"Encoding Record"* of the `cmap` table; the offset is
/// relative to the start of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub subtable_offset: u32,
}

/// A format-4 subtable: segmented code-point ranges over the basic
/// multilingual plane, kept as the four parallel per-segment arrays plus the
/// trailing glyph id array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format4Subtable {
    pub language: u16,
    pub end_code: Vec<u16>,
    pub start_code: Vec<u16>,
    pub id_delta: Vec<i16>,
    pub id_range_offset: Vec<u16>,
    pub glyph_id_array: Vec<u16>,
}

impl Format4Subtable {
    pub fn try_parse(bytes: &[u8], offset: usize) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes, ErrorSource::CmapSubtable);
        cursor.skip(offset)?;

        let format = cursor.read_u16()?;

        if format != 4 {
            return Err(Error::new(
                ErrorKind::UnsupportedCmapFormat(format),
                ErrorSource::CmapSubtable,
            ));
        }

        let length = cursor.read_u16()? as usize;
        let language = cursor.read_u16()?;
        let seg_count = (cursor.read_u16()? / 2) as usize;
        // 8..10 searchRange
        // 10..12 entrySelector
        // 12..14 rangeShift
        cursor.skip(6)?;

        // header, segment arrays and the reserved pad must fit the declared
        // length; whatever remains is the glyph id array
        if seg_count == 0 || length < 16 + (seg_count * 8) {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::CmapSubtable,
            ));
        }

        let mut end_code = Vec::with_capacity(seg_count);

        for _ in 0..seg_count {
            end_code.push(cursor.read_u16()?);
        }

        if end_code.last() != Some(&0xFFFF) || end_code.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::CmapSubtable,
            ));
        }

        // reservedPad
        cursor.skip(2)?;

        let mut start_code = Vec::with_capacity(seg_count);

        for _ in 0..seg_count {
            start_code.push(cursor.read_u16()?);
        }

        let mut id_delta = Vec::with_capacity(seg_count);

        for _ in 0..seg_count {
            id_delta.push(cursor.read_i16()?);
        }

        let mut id_range_offset = Vec::with_capacity(seg_count);

        for _ in 0..seg_count {
            id_range_offset.push(cursor.read_u16()?);
        }

        let glyph_id_count = (length - 16 - (seg_count * 8)) / 2;
        let mut glyph_id_array = Vec::with_capacity(glyph_id_count);

        for _ in 0..glyph_id_count {
            glyph_id_array.push(cursor.read_u16()?);
        }

        Ok(Self {
            language,
            end_code,
            start_code,
            id_delta,
            id_range_offset,
            glyph_id_array,
        })
    }

    /// Glyph index for `codepoint`, with 0 (the missing glyph) for anything
    /// the subtable does not map.
    pub fn glyph_index(&self, codepoint: u32) -> u16 {
        if codepoint > 0xFFFF {
            // format 4 only addresses the basic multilingual plane
            return 0;
        }

        let codepoint = codepoint as u16;

        // first segment whose end code reaches the code point; the 0xFFFF
        // sentinel guarantees one exists in a valid table
        let segment = self.end_code.partition_point(|&end| end < codepoint);

        if segment == self.end_code.len() || codepoint < self.start_code[segment] {
            return 0;
        }

        let id_delta = self.id_delta[segment] as i32;
        let id_range_offset = self.id_range_offset[segment] as usize;

        if id_range_offset == 0 {
            return ((codepoint as i32 + id_delta) & 0xFFFF) as u16;
        }

        // idRangeOffset is a byte offset from its own slot into glyphIdArray;
        // subtracting the slots between it and the end of the idRangeOffset
        // array rebases the index to the start of glyphIdArray
        let stride = (id_range_offset / 2) + (codepoint - self.start_code[segment]) as usize;

        match stride
            .checked_sub(self.end_code.len() - segment)
            .and_then(|index| self.glyph_id_array.get(index))
        {
            None | Some(&0) => 0,
            Some(&glyph_id) => ((glyph_id as i32 + id_delta) & 0xFFFF) as u16,
        }
    }
}
