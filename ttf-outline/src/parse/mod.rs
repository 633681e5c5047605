//! This `mod` contains the raw parsed data of a font file.

use crate::error::*;

pub mod cmap_table;
pub mod font;
pub mod glyf_table;
pub mod head_table;
pub mod loca_table;
pub mod table_directory;

pub use cmap_table::{CmapTable, EncodingRecord, Format4Subtable};
pub use font::Font;
pub use glyf_table::{GlyfTable, GlyphFlags, Outline, OutlinePoint};
pub use head_table::HeadTable;
pub use loca_table::LocaTable;
pub use table_directory::{TableDirectory, TableRecord};

/// Read position over a byte buffer.
///
/// Every read checks the remaining bytes, decodes big-endian, and advances
/// past the value. A read past the end yields [`ErrorKind::OutOfBounds`] with
/// the position it failed at.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    source: ErrorSource,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8], source: ErrorSource) -> Self {
        Self {
            bytes,
            pos: 0,
            source,
        }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn skip(&mut self, count: usize) -> Result<(), Error> {
        self.take(count).map(|_| ())
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], Error> {
        match self.bytes.get(self.pos..(self.pos + count)) {
            Some(taken) => {
                self.pos += count;
                Ok(taken)
            },
            None => {
                Err(Error::new(
                    ErrorKind::OutOfBounds {
                        offset: self.pos,
                        needed: count,
                        available: self.remaining(),
                    },
                    self.source,
                ))
            },
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.take(1).map(|bytes| bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.take(2)
            .map(|bytes| u16::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        self.take(2)
            .map(|bytes| i16::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.take(4)
            .map(|bytes| u32::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.take(8)
            .map(|bytes| i64::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], Error> {
        self.take(count)
    }
}

pub(crate) const fn tag(bytes: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*bytes)
}

pub mod table_tag {
    use super::tag;
    pub const CMAP: u32 = tag(b"cmap");
    pub const HEAD: u32 = tag(b"head");
    pub const LOCA: u32 = tag(b"loca");
    pub const GLYF: u32 = tag(b"glyf");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_advance() {
        let bytes = [0x00, 0x41, 0xFF, 0xE3, 0x00, 0x01, 0x00, 0x00];
        let mut cursor = Cursor::new(&bytes, ErrorSource::TableDirectory);
        assert_eq!(cursor.read_u16().unwrap(), 0x0041);
        assert_eq!(cursor.read_i16().unwrap(), -29);
        assert_eq!(cursor.read_u32().unwrap(), 0x00010000);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn cursor_out_of_bounds() {
        let bytes = [0x00, 0x01, 0x02];
        let mut cursor = Cursor::new(&bytes, ErrorSource::GlyphOutline);
        cursor.skip(2).unwrap();

        assert_eq!(
            cursor.read_u32(),
            Err(Error::new(
                ErrorKind::OutOfBounds {
                    offset: 2,
                    needed: 4,
                    available: 1,
                },
                ErrorSource::GlyphOutline,
            ))
        );

        // a failed read does not advance
        assert_eq!(cursor.read_u8().unwrap(), 0x02);
    }

    #[test]
    fn table_tags() {
        assert_eq!(table_tag::GLYF, 0x676C7966);
        assert_eq!(table_tag::HEAD, 0x68656164);
    }
}
