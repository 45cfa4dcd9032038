//! Primitive type kinds.

use std::fmt;

/// The eight value primitives. `void` is not a primitive kind; it wraps to
/// the "no type" variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Decode the one-letter binary descriptor (`Z B C S I J F D`).
    pub fn from_descriptor(c: char) -> Option<Self> {
        Some(match c {
            'Z' => PrimitiveKind::Boolean,
            'B' => PrimitiveKind::Byte,
            'C' => PrimitiveKind::Char,
            'S' => PrimitiveKind::Short,
            'I' => PrimitiveKind::Int,
            'J' => PrimitiveKind::Long,
            'F' => PrimitiveKind::Float,
            'D' => PrimitiveKind::Double,
            _ => return None,
        })
    }

    pub const fn descriptor(self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
        }
    }

    /// Source keyword.
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Plural category used in runtime factory selectors (`arrayWithInts:count:`).
    pub const fn category_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Booleans",
            PrimitiveKind::Byte => "Bytes",
            PrimitiveKind::Char => "Chars",
            PrimitiveKind::Short => "Shorts",
            PrimitiveKind::Int => "Ints",
            PrimitiveKind::Long => "Longs",
            PrimitiveKind::Float => "Floats",
            PrimitiveKind::Double => "Doubles",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
