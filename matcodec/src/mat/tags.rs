//! Level-5 data element types and array classes.
//!
//! Values are the ones fixed by the MAT-file format reference; they appear
//! verbatim in data element tags and in the array flags subelement.

use std::fmt;

/// Array flag bit marking complex data.
pub const FLAG_COMPLEX: u32 = 0x0800;

/// Array flag bit marking a global variable.
pub const FLAG_GLOBAL: u32 = 0x0400;

/// Array flag bit marking logical (boolean) data.
pub const FLAG_LOGICAL: u32 = 0x0200;

/// Data element type stored in an element tag (`miINT8`, `miDOUBLE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MatType {
    /// miINT8
    Int8 = 1,
    /// miUINT8
    UInt8 = 2,
    /// miINT16
    Int16 = 3,
    /// miUINT16
    UInt16 = 4,
    /// miINT32
    Int32 = 5,
    /// miUINT32
    UInt32 = 6,
    /// miSINGLE
    Single = 7,
    /// miDOUBLE
    Double = 9,
    /// miINT64
    Int64 = 12,
    /// miUINT64
    UInt64 = 13,
    /// miMATRIX, a whole variable
    Matrix = 14,
    /// miCOMPRESSED, a zlib stream wrapping one miMATRIX
    Compressed = 15,
    /// miUTF8
    Utf8 = 16,
    /// miUTF16
    Utf16 = 17,
    /// miUTF32
    Utf32 = 18,
    /// Reserved or unrecognized tag value
    Unknown = 0,
}

impl MatType {
    /// Create a MatType from its raw tag value, or `Unknown` if not recognized.
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => MatType::Int8,
            2 => MatType::UInt8,
            3 => MatType::Int16,
            4 => MatType::UInt16,
            5 => MatType::Int32,
            6 => MatType::UInt32,
            7 => MatType::Single,
            9 => MatType::Double,
            12 => MatType::Int64,
            13 => MatType::UInt64,
            14 => MatType::Matrix,
            15 => MatType::Compressed,
            16 => MatType::Utf8,
            17 => MatType::Utf16,
            18 => MatType::Utf32,
            _ => MatType::Unknown,
        }
    }

    /// Size in bytes of one value of this type, or 0 for non-numeric tags.
    pub const fn size_bytes(&self) -> usize {
        match self {
            MatType::Int8 | MatType::UInt8 | MatType::Utf8 => 1,
            MatType::Int16 | MatType::UInt16 | MatType::Utf16 => 2,
            MatType::Int32 | MatType::UInt32 | MatType::Single | MatType::Utf32 => 4,
            MatType::Double | MatType::Int64 | MatType::UInt64 => 8,
            MatType::Matrix | MatType::Compressed | MatType::Unknown => 0,
        }
    }
}

/// Array class stored in the array flags subelement (`mxDOUBLE_CLASS`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MatClass {
    /// Cell array
    Cell = 1,
    /// Structure
    Struct = 2,
    /// Object
    Object = 3,
    /// Character array
    Char = 4,
    /// Sparse array
    Sparse = 5,
    /// Double precision array
    Double = 6,
    /// Single precision array
    Single = 7,
    /// 8-bit signed integer array
    Int8 = 8,
    /// 8-bit unsigned integer array
    UInt8 = 9,
    /// 16-bit signed integer array
    Int16 = 10,
    /// 16-bit unsigned integer array
    UInt16 = 11,
    /// 32-bit signed integer array
    Int32 = 12,
    /// 32-bit unsigned integer array
    UInt32 = 13,
    /// 64-bit signed integer array
    Int64 = 14,
    /// 64-bit unsigned integer array
    UInt64 = 15,
    /// Function handle
    Function = 16,
    /// Opaque (MATLAB object system) value
    Opaque = 17,
    /// Unrecognized class value
    Unknown = 0,
}

impl MatClass {
    /// Create a MatClass from its raw value, or `Unknown` if not recognized.
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => MatClass::Cell,
            2 => MatClass::Struct,
            3 => MatClass::Object,
            4 => MatClass::Char,
            5 => MatClass::Sparse,
            6 => MatClass::Double,
            7 => MatClass::Single,
            8 => MatClass::Int8,
            9 => MatClass::UInt8,
            10 => MatClass::Int16,
            11 => MatClass::UInt16,
            12 => MatClass::Int32,
            13 => MatClass::UInt32,
            14 => MatClass::Int64,
            15 => MatClass::UInt64,
            16 => MatClass::Function,
            17 => MatClass::Opaque,
            _ => MatClass::Unknown,
        }
    }

    /// Check if this class holds a plain numeric array.
    pub const fn is_numeric(&self) -> bool {
        self.data_type().size_bytes() != 0
    }

    /// The data type that values of this class have once loaded.
    ///
    /// Files may store numeric payloads in a narrower type (MATLAB does
    /// this to save space); readers widen them back to the class type.
    /// Returns `Unknown` for non-numeric classes.
    pub const fn data_type(&self) -> MatType {
        match self {
            MatClass::Double => MatType::Double,
            MatClass::Single => MatType::Single,
            MatClass::Int8 => MatType::Int8,
            MatClass::UInt8 => MatType::UInt8,
            MatClass::Int16 => MatType::Int16,
            MatClass::UInt16 => MatType::UInt16,
            MatClass::Int32 => MatType::Int32,
            MatClass::UInt32 => MatType::UInt32,
            MatClass::Int64 => MatType::Int64,
            MatClass::UInt64 => MatType::UInt64,
            _ => MatType::Unknown,
        }
    }
}

impl fmt::Display for MatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatClass::Cell => "cell",
            MatClass::Struct => "struct",
            MatClass::Object => "object",
            MatClass::Char => "char",
            MatClass::Sparse => "sparse",
            MatClass::Double => "double",
            MatClass::Single => "single",
            MatClass::Int8 => "int8",
            MatClass::UInt8 => "uint8",
            MatClass::Int16 => "int16",
            MatClass::UInt16 => "uint16",
            MatClass::Int32 => "int32",
            MatClass::UInt32 => "uint32",
            MatClass::Int64 => "int64",
            MatClass::UInt64 => "uint64",
            MatClass::Function => "function",
            MatClass::Opaque => "opaque",
            MatClass::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
