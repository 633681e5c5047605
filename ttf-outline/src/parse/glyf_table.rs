use std::ops::Range;

use crate::error::*;
use crate::parse::{Cursor, LocaTable};

/// Corresponds to the `glyf` table.
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/glyf>
///
/// Keeps an owned copy of the raw table so outlines can be decoded on demand
/// after the source buffer is released.
#[derive(Debug, Clone)]
pub struct GlyfTable {
    data: Vec<u8>,
}

impl GlyfTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }

    pub fn outline(&self, loca_table: &LocaTable, glyph_index: u16) -> Result<Outline, Error> {
        let range = match loca_table.glyph_range(glyph_index) {
            Some(range) => range,
            None => {
                return Err(Error::new(
                    ErrorKind::OutOfBounds {
                        offset: glyph_index as usize,
                        needed: 1,
                        available: loca_table.num_glyphs(),
                    },
                    ErrorSource::LocaTable,
                ))
            },
        };

        // a zero length range is a glyph with no outline, e.g. a space
        if range.is_empty() {
            return Ok(Outline::empty());
        }

        let glyph_bytes = match self.data.get(range.clone()) {
            Some(bytes) => bytes,
            None => {
                return Err(Error::new(
                    ErrorKind::OutOfBounds {
                        offset: range.start,
                        needed: range.len(),
                        available: self.data.len().saturating_sub(range.start),
                    },
                    ErrorSource::GlyfTable,
                ))
            },
        };

        Outline::try_parse(glyph_bytes)
    }
}

/// The decoded outline of a simple glyph: absolute coordinates, contour
/// boundaries and the per point flags, all owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub contour_ends: Vec<u16>,
    pub instructions: Vec<u8>,
    pub flags: Vec<GlyphFlags>,
    pub x_coordinates: Vec<i16>,
    pub y_coordinates: Vec<i16>,
}

impl Outline {
    fn empty() -> Self {
        Self {
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            contour_ends: Vec::new(),
            instructions: Vec::new(),
            flags: Vec::new(),
            x_coordinates: Vec::new(),
            y_coordinates: Vec::new(),
        }
    }

    pub fn try_parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(bytes, ErrorSource::GlyphOutline);
        let number_of_contours = cursor.read_i16()?;

        if number_of_contours < 0 {
            return Err(Error::new(
                ErrorKind::CompositeGlyphUnsupported,
                ErrorSource::GlyphOutline,
            ));
        }

        let x_min = cursor.read_i16()?;
        let y_min = cursor.read_i16()?;
        let x_max = cursor.read_i16()?;
        let y_max = cursor.read_i16()?;

        let mut contour_ends = Vec::with_capacity(number_of_contours as usize);

        for _ in 0..number_of_contours {
            contour_ends.push(cursor.read_u16()?);
        }

        if contour_ends.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(Error::new(
                ErrorKind::MalformedHeader,
                ErrorSource::GlyphOutline,
            ));
        }

        let point_count = match contour_ends.last() {
            Some(last) => *last as usize + 1,
            None => 0,
        };

        let instruction_length = cursor.read_u16()? as usize;
        // never interpreted, kept for consumers that execute them
        let instructions = cursor.read_bytes(instruction_length)?.to_vec();

        let flags = read_flags(&mut cursor, point_count)?;
        let x_coordinates =
            read_coordinates(&mut cursor, &flags, GlyphFlags::x_short, GlyphFlags::x_positive)?;
        let y_coordinates =
            read_coordinates(&mut cursor, &flags, GlyphFlags::y_short, GlyphFlags::y_positive)?;

        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
            contour_ends,
            instructions,
            flags,
            x_coordinates,
            y_coordinates,
        })
    }

    pub fn point_count(&self) -> usize {
        self.x_coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contour_ends.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = OutlinePoint> + '_ {
        (0..self.point_count()).map(move |i| {
            OutlinePoint {
                x: self.x_coordinates[i],
                y: self.y_coordinates[i],
                on_curve: self.flags[i].on_curve(),
            }
        })
    }

    /// Per contour ranges of point indices.
    pub fn contours(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.contour_ends.len()).map(move |i| {
            let start = if i == 0 {
                0
            } else {
                self.contour_ends[i - 1] as usize + 1
            };

            start..(self.contour_ends[i] as usize + 1)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlinePoint {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

/// Per point flag byte of a simple glyph, read with explicit bit masks.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GlyphFlags(pub u8);

impl GlyphFlags {
    const ON_CURVE_POINT: u8 = 0x01;
    const X_SHORT_VECTOR: u8 = 0x02;
    const Y_SHORT_VECTOR: u8 = 0x04;
    const REPEAT_FLAG: u8 = 0x08;
    const X_SHORT_POSITIVE: u8 = 0x10;
    const Y_SHORT_POSITIVE: u8 = 0x20;

    pub fn on_curve(self) -> bool {
        self.0 & Self::ON_CURVE_POINT != 0
    }

    pub fn x_short(self) -> bool {
        self.0 & Self::X_SHORT_VECTOR != 0
    }

    pub fn y_short(self) -> bool {
        self.0 & Self::Y_SHORT_VECTOR != 0
    }

    pub fn repeat(self) -> bool {
        self.0 & Self::REPEAT_FLAG != 0
    }

    pub fn x_positive(self) -> bool {
        self.0 & Self::X_SHORT_POSITIVE != 0
    }

    pub fn y_positive(self) -> bool {
        self.0 & Self::Y_SHORT_POSITIVE != 0
    }
}

impl std::fmt::Debug for GlyphFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFlags")
            .field("ON_CURVE_POINT", &self.on_curve())
            .field("X_SHORT_VECTOR", &self.x_short())
            .field("Y_SHORT_VECTOR", &self.y_short())
            .field("REPEAT_FLAG", &self.repeat())
            .field("X_SHORT_POSITIVE", &self.x_positive())
            .field("Y_SHORT_POSITIVE", &self.y_positive())
            .finish()
    }
}

/// Expands the run-length compressed flag region to one flag per point.
///
/// The region must produce exactly `point_count` flags from exactly the bytes
/// it spans; running dry or expanding past the count is a corrupt run.
fn read_flags(cursor: &mut Cursor, point_count: usize) -> Result<Vec<GlyphFlags>, Error> {
    let corrupt = Error::new(ErrorKind::CorruptFlagRun, ErrorSource::GlyphOutline);
    let mut flags = Vec::with_capacity(point_count);

    while flags.len() < point_count {
        let flag = GlyphFlags(cursor.read_u8().map_err(|_| corrupt)?);
        let mut count = 1;

        if flag.repeat() {
            // the next byte is how many additional points share this flag
            count += cursor.read_u8().map_err(|_| corrupt)? as usize;
        }

        if flags.len() + count > point_count {
            return Err(corrupt);
        }

        for _ in 0..count {
            flags.push(flag);
        }
    }

    Ok(flags)
}

/// Decodes one axis of deltas into absolute coordinates, starting from 0.
///
/// Short form: one unsigned byte, negated when the positive bit is clear.
/// Long form: a signed 16-bit delta, always present.
fn read_coordinates(
    cursor: &mut Cursor,
    flags: &[GlyphFlags],
    short: impl Fn(GlyphFlags) -> bool,
    positive: impl Fn(GlyphFlags) -> bool,
) -> Result<Vec<i16>, Error> {
    let mut coordinates = Vec::with_capacity(flags.len());
    let mut previous = 0i16;

    for flag in flags.iter().copied() {
        let delta = if short(flag) {
            let value = cursor.read_u8()? as i16;

            if positive(flag) {
                value
            } else {
                -value
            }
        } else {
            cursor.read_i16()?
        };

        let coordinate = previous.wrapping_add(delta);
        coordinates.push(coordinate);
        previous = coordinate;
    }

    Ok(coordinates)
}
