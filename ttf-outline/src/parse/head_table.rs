use crate::error::*;
use crate::parse::Cursor;

/// Corresponds to the `head` table.
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/head>
///
/// # Notes
/// - `font_revision` is kept in bytes form.
/// - `index_to_loc_format` selects the `loca` entry width and is validated
///   where the `loca` table is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTable {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: [u8; 4],
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: i64,
    pub modified: i64,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    pub index_to_loc_format: u16,
    pub glyph_data_format: i16,
}

impl HeadTable {
    pub fn try_parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes, ErrorSource::HeadTable);
        let major_version = cursor.read_u16()?;
        let minor_version = cursor.read_u16()?;

        let font_revision = cursor.read_bytes(4)?.try_into().unwrap();
        let checksum_adjustment = cursor.read_u32()?;
        let magic_number = cursor.read_u32()?;

        if magic_number != 0x5F0F3CF5 {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::HeadTable,
            ));
        }

        let flags = cursor.read_u16()?;
        let units_per_em = cursor.read_u16()?;
        let created = cursor.read_i64()?;
        let modified = cursor.read_i64()?;
        let x_min = cursor.read_i16()?;
        let y_min = cursor.read_i16()?;
        let x_max = cursor.read_i16()?;
        let y_max = cursor.read_i16()?;
        let mac_style = cursor.read_u16()?;
        let lowest_rec_ppem = cursor.read_u16()?;
        let font_direction_hint = cursor.read_i16()?;
        // 50..52 indexToLocFormat
        let index_to_loc_format = cursor.read_u16()?;
        let glyph_data_format = cursor.read_i16()?;

        Ok(Self {
            major_version,
            minor_version,
            font_revision,
            checksum_adjustment,
            magic_number,
            flags,
            units_per_em,
            created,
            modified,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_loc_format,
            glyph_data_format,
        })
    }
}

#[cfg(test)]
pub(crate) fn head_bytes(index_to_loc_format: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&[0, 1, 0, 0]);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0x5F0F3CF5u32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&1000u16.to_be_bytes());
    bytes.extend_from_slice(&0i64.to_be_bytes());
    bytes.extend_from_slice(&0i64.to_be_bytes());
    bytes.extend_from_slice(&(-100i16).to_be_bytes());
    bytes.extend_from_slice(&(-200i16).to_be_bytes());
    bytes.extend_from_slice(&900i16.to_be_bytes());
    bytes.extend_from_slice(&800i16.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&8u16.to_be_bytes());
    bytes.extend_from_slice(&2i16.to_be_bytes());
    bytes.extend_from_slice(&index_to_loc_format.to_be_bytes());
    bytes.extend_from_slice(&0i16.to_be_bytes());
    bytes
}
