#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub source: ErrorSource,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, source: ErrorSource) -> Self {
        Self {
            kind,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A fixed-layout header or array is shorter than it declares, or its
    /// contents break a structural rule of the format.
    MalformedHeader,
    /// A required table is absent from the table directory.
    MissingTable(u32),
    /// The selected `cmap` subtable is not format 4.
    UnsupportedCmapFormat(u16),
    /// The glyph is a composite and this decoder only handles simple glyphs.
    CompositeGlyphUnsupported,
    /// The flag run of a simple glyph does not expand to its point count.
    CorruptFlagRun,
    /// A read would pass the end of the buffer.
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    TableDirectory,
    CmapTable,
    CmapSubtable,
    HeadTable,
    LocaTable,
    GlyfTable,
    GlyphOutline,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.source)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHeader => write!(f, "malformed header"),
            Self::MissingTable(tag) => {
                write!(
                    f,
                    "missing required table '{}'",
                    String::from_utf8_lossy(&tag.to_be_bytes())
                )
            },
            Self::UnsupportedCmapFormat(format) => {
                write!(f, "unsupported cmap subtable format {}", format)
            },
            Self::CompositeGlyphUnsupported => write!(f, "composite glyphs are not supported"),
            Self::CorruptFlagRun => write!(f, "flag run does not match the point count"),
            Self::OutOfBounds {
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "read of {} bytes at offset {} exceeds the {} available",
                    needed, offset, available
                )
            },
        }
    }
}

impl std::fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TableDirectory => "table directory",
            Self::CmapTable => "cmap table",
            Self::CmapSubtable => "cmap subtable",
            Self::HeadTable => "head table",
            Self::LocaTable => "loca table",
            Self::GlyfTable => "glyf table",
            Self::GlyphOutline => "glyph outline",
        };

        f.write_str(name)
    }
}

impl std::error::Error for Error {}
