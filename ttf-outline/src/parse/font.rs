use crate::error::*;
use crate::parse::*;

/// A font resource parsed out of raw `sfnt` bytes.
///
/// Owns every value it needs, so the source buffer can be released as soon as
/// [`Font::from_bytes`] returns. Lookups and outline decoding take `&self`
/// and share no mutable state, so a `Font` can serve threads concurrently.
#[derive(Debug, Clone)]
pub struct Font {
    directory: TableDirectory,
    cmap: CmapTable,
    head: HeadTable,
    loca: LocaTable,
    glyf: GlyfTable,
}

impl Font {
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Result<Self, Error> {
        let bytes = bytes.as_ref();
        let directory = TableDirectory::try_parse(bytes)?;

        let cmap = CmapTable::try_parse(table_slice(
            bytes,
            directory.require(table_tag::CMAP)?,
            ErrorSource::CmapTable,
        )?)?;

        let head = HeadTable::try_parse(table_slice(
            bytes,
            directory.require(table_tag::HEAD)?,
            ErrorSource::HeadTable,
        )?)?;

        let loca = LocaTable::try_parse(
            table_slice(
                bytes,
                directory.require(table_tag::LOCA)?,
                ErrorSource::LocaTable,
            )?,
            &head,
        )?;

        let glyf = GlyfTable::from_bytes(table_slice(
            bytes,
            directory.require(table_tag::GLYF)?,
            ErrorSource::GlyfTable,
        )?);

        Ok(Self {
            directory,
            cmap,
            head,
            loca,
            glyf,
        })
    }

    /// Glyph index for a Unicode code point, 0 (the missing glyph) when the
    /// font does not map it.
    pub fn glyph_index_for_codepoint(&self, codepoint: u32) -> u16 {
        self.cmap.glyph_index(codepoint)
    }

    /// Decoded outline of the glyph at `glyph_index`.
    pub fn glyph_outline(&self, glyph_index: u16) -> Result<Outline, Error> {
        self.glyf.outline(&self.loca, glyph_index)
    }

    pub fn num_glyphs(&self) -> usize {
        self.loca.num_glyphs()
    }

    pub fn table_directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn cmap_table(&self) -> &CmapTable {
        &self.cmap
    }

    pub fn head_table(&self) -> &HeadTable {
        &self.head
    }

    pub fn loca_table(&self) -> &LocaTable {
        &self.loca
    }
}

fn table_slice<'a>(
    bytes: &'a [u8],
    record: &TableRecord,
    source: ErrorSource,
) -> Result<&'a [u8], Error> {
    let start = record.offset as usize;
    let length = record.length as usize;

    bytes.get(start..(start + length)).ok_or(Error::new(
        ErrorKind::OutOfBounds {
            offset: start,
            needed: length,
            available: bytes.len().saturating_sub(start),
        },
        source,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse::head_table::head_bytes;

    const ON_XS_YS_XP_YP: u8 = 0x37;

    /// A triangle whose points land at (10, 5), (30, 11), (60, 18).
    fn triangle_glyph() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i16.to_be_bytes());

        for value in [10i16, 5, 60, 18] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }

        bytes.extend_from_slice(&2u16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&[ON_XS_YS_XP_YP; 3]);
        bytes.extend_from_slice(&[10, 20, 30, 5, 6, 7]);
        // keep the record length even so the short loca format can address it
        bytes.push(0);
        bytes
    }

    /// cmap with a single (3, 1) format-4 subtable mapping A..Z to 1..26.
    fn cmap_table() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&3u16.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&12u32.to_be_bytes());

        // format 4, two segments: 0x41..0x5A with delta -64, then sentinel
        bytes.extend_from_slice(&4u16.to_be_bytes());
        bytes.extend_from_slice(&32u16.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&4u16.to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);

        for end in [0x005Au16, 0xFFFF] {
            bytes.extend_from_slice(&end.to_be_bytes());
        }

        bytes.extend_from_slice(&0u16.to_be_bytes());

        for start in [0x0041u16, 0xFFFF] {
            bytes.extend_from_slice(&start.to_be_bytes());
        }

        for delta in [-64i16, 1] {
            bytes.extend_from_slice(&delta.to_be_bytes());
        }

        for range_offset in [0u16, 0] {
            bytes.extend_from_slice(&range_offset.to_be_bytes());
        }

        bytes
    }

    /// Assembles a whole font: glyph 0 and 1 are triangles, glyph 2 is empty.
    fn font_bytes(index_to_loc_format: u16) -> Vec<u8> {
        let cmap = cmap_table();
        let head = head_bytes(index_to_loc_format);
        let glyph = triangle_glyph();
        let glyf = [glyph.clone(), glyph.clone()].concat();

        let loca_entries = [0u32, glyph.len() as u32, glyf.len() as u32, glyf.len() as u32];
        let mut loca = Vec::new();

        for entry in loca_entries {
            if index_to_loc_format == 0 {
                loca.extend_from_slice(&((entry / 2) as u16).to_be_bytes());
            } else {
                loca.extend_from_slice(&entry.to_be_bytes());
            }
        }

        let tables: [(u32, &[u8]); 4] = [
            (table_tag::CMAP, &cmap),
            (table_tag::GLYF, &glyf),
            (table_tag::HEAD, &head),
            (table_tag::LOCA, &loca),
        ];

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x00010000u32.to_be_bytes());
        bytes.extend_from_slice(&4u16.to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);

        let mut offset = 12 + (tables.len() * 16);

        for (tag, table) in &tables {
            bytes.extend_from_slice(&tag.to_be_bytes());
            bytes.extend_from_slice(&0u32.to_be_bytes());
            bytes.extend_from_slice(&(offset as u32).to_be_bytes());
            bytes.extend_from_slice(&(table.len() as u32).to_be_bytes());
            offset += table.len();
        }

        for (_, table) in &tables {
            bytes.extend_from_slice(table);
        }

        bytes
    }

    #[test]
    fn load_index_and_outline() {
        let font = Font::from_bytes(font_bytes(1)).unwrap();

        assert_eq!(font.num_glyphs(), 3);
        assert_eq!(font.glyph_index_for_codepoint('A' as u32), 1);
        assert_eq!(font.glyph_index_for_codepoint('Z' as u32), 26);
        assert_eq!(font.glyph_index_for_codepoint('a' as u32), 0);
        assert_eq!(font.glyph_index_for_codepoint(0x1F600), 0);

        let outline = font.glyph_outline(1).unwrap();
        assert_eq!(outline.x_coordinates, vec![10, 30, 60]);
        assert_eq!(outline.y_coordinates, vec![5, 11, 18]);
        assert_eq!(outline.contour_ends, vec![2]);
    }

    #[test]
    fn outlives_the_source_buffer() {
        let font = {
            let bytes = font_bytes(1);
            Font::from_bytes(&bytes).unwrap()
            // bytes dropped here
        };

        assert_eq!(font.glyph_outline(0).unwrap().point_count(), 3);
    }

    #[test]
    fn short_and_long_loca_fonts_agree() {
        let short = Font::from_bytes(font_bytes(0)).unwrap();
        let long = Font::from_bytes(font_bytes(1)).unwrap();

        assert_eq!(short.loca_table(), long.loca_table());
        assert_eq!(short.glyph_outline(1).unwrap(), long.glyph_outline(1).unwrap());
    }

    #[test]
    fn empty_glyph_decodes_to_no_contours() {
        let font = Font::from_bytes(font_bytes(1)).unwrap();
        let outline = font.glyph_outline(2).unwrap();

        assert!(outline.is_empty());
        assert_eq!(outline.point_count(), 0);
    }

    #[test]
    fn glyph_index_past_the_font() {
        let font = Font::from_bytes(font_bytes(1)).unwrap();

        assert!(matches!(
            font.glyph_outline(40).unwrap_err().kind,
            ErrorKind::OutOfBounds { .. }
        ));
    }

    #[test]
    fn missing_required_table() {
        let mut bytes = font_bytes(1);
        // overwrite the glyf record's tag in the directory
        let position = 12 + 16;
        bytes[position..(position + 4)].copy_from_slice(b"gsub");

        assert_eq!(
            Font::from_bytes(&bytes).unwrap_err(),
            Error::new(
                ErrorKind::MissingTable(table_tag::GLYF),
                ErrorSource::TableDirectory,
            )
        );
    }

    #[test]
    fn table_range_past_the_buffer() {
        let mut bytes = font_bytes(1);
        let end = bytes.len();
        bytes.truncate(end - 4);

        let error = Font::from_bytes(&bytes).unwrap_err();
        assert!(matches!(error.kind, ErrorKind::OutOfBounds { .. }));
    }
}
