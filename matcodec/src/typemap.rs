//! Translation between host element types and MAT class/storage tags.
//!
//! The two directions differ in how they fail. Writing an element type
//! with no MAT counterpart is an error; reading tags with no host
//! counterpart yields [`ElementType::Unknown`] so that scanning can go on.

use crate::data_type::ElementType;
use crate::error::{Error, Result};
use crate::mat::{MatClass, MatType, VarInfo};
use crate::type_info::TypeInfo;

/// Array class and storage type used to write `kind`.
///
/// Complex kinds map to the tags of their component type; the complex flag
/// is carried separately.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for [`ElementType::Complex256`] and
/// [`ElementType::Unknown`].
///
/// # Example
///
/// ```
/// use matcodec::typemap::to_format_tags;
/// use matcodec::mat::{MatClass, MatType};
/// use matcodec::ElementType;
///
/// assert_eq!(
///     to_format_tags(ElementType::Complex64)?,
///     (MatClass::Single, MatType::Single)
/// );
/// assert!(to_format_tags(ElementType::Complex256).is_err());
/// # Ok::<(), matcodec::Error>(())
/// ```
pub fn to_format_tags(kind: ElementType) -> Result<(MatClass, MatType)> {
    let tags = match kind {
        ElementType::Int8 => (MatClass::Int8, MatType::Int8),
        ElementType::Int16 => (MatClass::Int16, MatType::Int16),
        ElementType::Int32 => (MatClass::Int32, MatType::Int32),
        ElementType::Int64 => (MatClass::Int64, MatType::Int64),
        ElementType::UInt8 => (MatClass::UInt8, MatType::UInt8),
        ElementType::UInt16 => (MatClass::UInt16, MatType::UInt16),
        ElementType::UInt32 => (MatClass::UInt32, MatType::UInt32),
        ElementType::UInt64 => (MatClass::UInt64, MatType::UInt64),
        ElementType::Float32 | ElementType::Complex64 => (MatClass::Single, MatType::Single),
        ElementType::Float64 | ElementType::Complex128 => (MatClass::Double, MatType::Double),
        ElementType::Complex256 | ElementType::Unknown => {
            return Err(Error::unsupported_type(kind));
        }
    };
    Ok(tags)
}

/// Host element type of values stored as `storage`.
///
/// The complex flag promotes `Single` to [`ElementType::Complex64`] and
/// `Double` to [`ElementType::Complex128`]; combined with any other
/// storage type it yields [`ElementType::Unknown`], as do unrecognized tags.
pub fn from_format_tags(storage: MatType, is_complex: bool) -> ElementType {
    let base = match storage {
        MatType::Int8 => ElementType::Int8,
        MatType::Int16 => ElementType::Int16,
        MatType::Int32 => ElementType::Int32,
        MatType::Int64 => ElementType::Int64,
        MatType::UInt8 => ElementType::UInt8,
        MatType::UInt16 => ElementType::UInt16,
        MatType::UInt32 => ElementType::UInt32,
        MatType::UInt64 => ElementType::UInt64,
        MatType::Single => ElementType::Float32,
        MatType::Double => ElementType::Float64,
        _ => return ElementType::Unknown,
    };

    if !is_complex {
        return base;
    }

    match base {
        ElementType::Float32 => ElementType::Complex64,
        ElementType::Float64 => ElementType::Complex128,
        _ => ElementType::Unknown,
    }
}

/// Descriptor of a variable, from its array header alone.
///
/// Non-numeric classes give an `Unknown` element type.
pub fn type_info_of(info: &VarInfo) -> TypeInfo {
    TypeInfo::new(
        from_format_tags(info.data_type(), info.is_complex),
        info.dims.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRITABLE: [ElementType; 12] = [
        ElementType::Int8,
        ElementType::Int16,
        ElementType::Int32,
        ElementType::Int64,
        ElementType::UInt8,
        ElementType::UInt16,
        ElementType::UInt32,
        ElementType::UInt64,
        ElementType::Float32,
        ElementType::Float64,
        ElementType::Complex64,
        ElementType::Complex128,
    ];

    #[test]
    fn test_write_then_read_tags() {
        for kind in WRITABLE {
            let (class, storage) = to_format_tags(kind).unwrap();
            assert_eq!(class.data_type(), storage);
            assert_eq!(from_format_tags(storage, kind.is_complex()), kind);
        }
    }

    #[test]
    fn test_unwritable_kinds() {
        assert!(matches!(
            to_format_tags(ElementType::Complex256),
            Err(Error::UnsupportedType { .. })
        ));
        assert!(to_format_tags(ElementType::Unknown).is_err());
    }

    #[test]
    fn test_read_side_sentinel() {
        assert_eq!(from_format_tags(MatType::Utf8, false), ElementType::Unknown);
        assert_eq!(from_format_tags(MatType::Matrix, false), ElementType::Unknown);
        assert_eq!(from_format_tags(MatType::Int32, true), ElementType::Unknown);
        assert_eq!(from_format_tags(MatType::Unknown, true), ElementType::Unknown);
    }

    #[test]
    fn test_type_info_of_char_array() {
        let info = VarInfo {
            name: "label".into(),
            class: MatClass::Char,
            is_complex: false,
            is_logical: false,
            dims: vec![1, 5],
            compressed: false,
        };
        let ti = type_info_of(&info);
        assert_eq!(ti.dtype, ElementType::Unknown);
        assert!(!ti.is_valid());
    }
}
