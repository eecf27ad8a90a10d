//! Host element type enumeration.
//!
//! Every array handled by this crate carries one of these element types.
//! Complex types are stored interleaved (real, imaginary) in host memory.

use std::fmt;

/// Element types of host arrays.
///
/// The set mirrors what a numeric array library typically offers. Not every
/// variant can be stored in a MAT file; see [`crate::typemap`] for the
/// mapping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementType {
    /// 8-bit signed integer (i8)
    Int8,

    /// 16-bit signed integer (i16)
    Int16,

    /// 32-bit signed integer (i32)
    Int32,

    /// 64-bit signed integer (i64)
    Int64,

    /// 8-bit unsigned integer (u8)
    UInt8,

    /// 16-bit unsigned integer (u16)
    UInt16,

    /// 32-bit unsigned integer (u32)
    UInt32,

    /// 64-bit unsigned integer (u64)
    UInt64,

    /// 32-bit floating point (f32)
    Float32,

    /// 64-bit floating point (f64)
    Float64,

    /// Complex number made of two f32 values
    Complex64,

    /// Complex number made of two f64 values
    Complex128,

    /// Complex number made of two 128-bit floats
    Complex256,

    /// Unknown or unsupported type
    #[default]
    Unknown,
}

impl ElementType {
    /// Get the size in bytes of a single element of this type.
    ///
    /// # Returns
    ///
    /// The byte size, or 0 for `Unknown`.
    pub const fn item_size(&self) -> usize {
        match self {
            ElementType::Int8 | ElementType::UInt8 => 1,
            ElementType::Int16 | ElementType::UInt16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64
            | ElementType::UInt64
            | ElementType::Float64
            | ElementType::Complex64 => 8,
            ElementType::Complex128 => 16,
            ElementType::Complex256 => 32,
            ElementType::Unknown => 0,
        }
    }

    /// Check if this type stores a real and an imaginary component.
    pub const fn is_complex(&self) -> bool {
        matches!(
            self,
            ElementType::Complex64 | ElementType::Complex128 | ElementType::Complex256
        )
    }

    /// Size of one scalar component.
    ///
    /// Half the item size for complex types, the item size otherwise.
    pub const fn component_size(&self) -> usize {
        if self.is_complex() {
            self.item_size() / 2
        } else {
            self.item_size()
        }
    }

    /// Check if this type is an integer type.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            ElementType::Int8
                | ElementType::Int16
                | ElementType::Int32
                | ElementType::Int64
                | ElementType::UInt8
                | ElementType::UInt16
                | ElementType::UInt32
                | ElementType::UInt64
        )
    }

    /// Check if this type is a real floating-point type.
    pub const fn is_float(&self) -> bool {
        matches!(self, ElementType::Float32 | ElementType::Float64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Int8 => "int8",
            ElementType::Int16 => "int16",
            ElementType::Int32 => "int32",
            ElementType::Int64 => "int64",
            ElementType::UInt8 => "uint8",
            ElementType::UInt16 => "uint16",
            ElementType::UInt32 => "uint32",
            ElementType::UInt64 => "uint64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
            ElementType::Complex64 => "complex64",
            ElementType::Complex128 => "complex128",
            ElementType::Complex256 => "complex256",
            ElementType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
