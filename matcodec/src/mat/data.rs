//! Numeric payload decoding.
//!
//! Payload parts are converted to native byte order and to the data type
//! of the array class. MATLAB stores integer-valued payloads in the
//! narrowest type that holds them (a `double` array of small integers is
//! often written as `miUINT8`), so a part is widened back on load.

use std::io::Read;

use super::header::Endian;
use super::reader::{read_subelement, VarInfo};
use super::tags::MatType;
use crate::error::{Error, Result};

/// Column-major payload of one variable.
///
/// Values are native-endian, one part per buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Real part (always present).
    pub real: Vec<u8>,

    /// Imaginary part (only for complex data).
    pub imag: Option<Vec<u8>>,
}

/// Values of a storage type, widened to a common representation.
enum Values {
    Signed(Vec<i64>),
    Unsigned(Vec<u64>),
    Float(Vec<f64>),
}

/// Cast every value to `$t` and encode it in native byte order.
macro_rules! cast_values {
    ($values:expr, $t:ty) => {
        match $values {
            Values::Signed(v) => v.iter().flat_map(|&x| (x as $t).to_ne_bytes()).collect(),
            Values::Unsigned(v) => v.iter().flat_map(|&x| (x as $t).to_ne_bytes()).collect(),
            Values::Float(v) => v.iter().flat_map(|&x| (x as $t).to_ne_bytes()).collect(),
        }
    };
}

/// Read the real and (for complex arrays) imaginary subelements that
/// follow the array header of a level-5 variable.
pub(crate) fn read_payload<R: Read>(r: &mut R, endian: Endian, info: &VarInfo) -> Result<Payload> {
    let count = element_count(info)?;
    let target = info.data_type();

    let (storage, bytes) = read_subelement(r, endian)?;
    let real = decode_part(&bytes, storage, target, endian, count, &info.name)?;

    let imag = if info.is_complex {
        let (storage, bytes) = read_subelement(r, endian)?;
        Some(decode_part(&bytes, storage, target, endian, count, &info.name)?)
    } else {
        None
    };

    Ok(Payload { real, imag })
}

/// Number of values implied by the dimensions of `info`.
pub(crate) fn element_count(info: &VarInfo) -> Result<usize> {
    info.dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| {
            Error::invalid_format(format!("variable '{}' has too many elements", info.name))
        })
}

/// Convert `count` values stored as `storage` in `endian` order into
/// native-endian values of type `target`.
#[allow(clippy::unnecessary_cast)]
pub(crate) fn decode_part(
    bytes: &[u8],
    storage: MatType,
    target: MatType,
    endian: Endian,
    count: usize,
    name: &str,
) -> Result<Vec<u8>> {
    let size = storage.size_bytes();
    if size == 0 || !is_numeric(storage) || !is_numeric(target) {
        return Err(Error::invalid_format(format!(
            "variable '{}' stores {:?} data, which cannot be loaded as {:?}",
            name, storage, target
        )));
    }

    if count.checked_mul(size) != Some(bytes.len()) {
        return Err(Error::invalid_format(format!(
            "variable '{}' holds {} bytes of {:?} data, expected {} values",
            name,
            bytes.len(),
            storage,
            count
        )));
    }

    if storage == target {
        let mut out = bytes.to_vec();
        if endian != Endian::native() && size > 1 {
            for value in out.chunks_exact_mut(size) {
                value.reverse();
            }
        }
        return Ok(out);
    }

    let values = decode_values(bytes, storage, endian);
    Ok(match target {
        MatType::Int8 => cast_values!(values, i8),
        MatType::UInt8 => cast_values!(values, u8),
        MatType::Int16 => cast_values!(values, i16),
        MatType::UInt16 => cast_values!(values, u16),
        MatType::Int32 => cast_values!(values, i32),
        MatType::UInt32 => cast_values!(values, u32),
        MatType::Int64 => cast_values!(values, i64),
        MatType::UInt64 => cast_values!(values, u64),
        MatType::Single => cast_values!(values, f32),
        _ => cast_values!(values, f64),
    })
}

fn is_numeric(ty: MatType) -> bool {
    !matches!(
        ty,
        MatType::Matrix
            | MatType::Compressed
            | MatType::Utf8
            | MatType::Utf16
            | MatType::Utf32
            | MatType::Unknown
    )
}

/// Bytes of one value in native order.
fn native<const N: usize>(chunk: &[u8], endian: Endian) -> [u8; N] {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(chunk);
    if endian != Endian::native() {
        bytes.reverse();
    }
    bytes
}

/// Decode numeric storage values. `storage` must be numeric.
fn decode_values(bytes: &[u8], storage: MatType, endian: Endian) -> Values {
    let chunks = bytes.chunks_exact(storage.size_bytes());
    match storage {
        MatType::Int8 => Values::Signed(chunks.map(|c| i64::from(c[0] as i8)).collect()),
        MatType::Int16 => Values::Signed(
            chunks
                .map(|c| i64::from(i16::from_ne_bytes(native(c, endian))))
                .collect(),
        ),
        MatType::Int32 => Values::Signed(
            chunks
                .map(|c| i64::from(i32::from_ne_bytes(native(c, endian))))
                .collect(),
        ),
        MatType::Int64 => {
            Values::Signed(chunks.map(|c| i64::from_ne_bytes(native(c, endian))).collect())
        }
        MatType::UInt8 => Values::Unsigned(chunks.map(|c| u64::from(c[0])).collect()),
        MatType::UInt16 => Values::Unsigned(
            chunks
                .map(|c| u64::from(u16::from_ne_bytes(native(c, endian))))
                .collect(),
        ),
        MatType::UInt32 => Values::Unsigned(
            chunks
                .map(|c| u64::from(u32::from_ne_bytes(native(c, endian))))
                .collect(),
        ),
        MatType::UInt64 => {
            Values::Unsigned(chunks.map(|c| u64::from_ne_bytes(native(c, endian))).collect())
        }
        MatType::Single => Values::Float(
            chunks
                .map(|c| f64::from(f32::from_ne_bytes(native(c, endian))))
                .collect(),
        ),
        _ => Values::Float(chunks.map(|c| f64::from_ne_bytes(native(c, endian))).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swapped() -> Endian {
        match Endian::native() {
            Endian::Little => Endian::Big,
            Endian::Big => Endian::Little,
        }
    }

    #[test]
    fn test_same_type_native() {
        let bytes: Vec<u8> = [-7i32, 40000].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let out = decode_part(&bytes, MatType::Int32, MatType::Int32, Endian::native(), 2, "x")
            .unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_same_type_swapped() {
        let stored: Vec<u8> = [1.5f64, -2.25]
            .iter()
            .flat_map(|v| {
                let mut b = v.to_ne_bytes();
                b.reverse();
                b
            })
            .collect();
        let out =
            decode_part(&stored, MatType::Double, MatType::Double, swapped(), 2, "x").unwrap();
        let expected: Vec<u8> = [1.5f64, -2.25].iter().flat_map(|v| v.to_ne_bytes()).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_widen_narrow_storage() {
        // A double array stored as miUINT8, as MATLAB does for small integers.
        let out = decode_part(&[0, 7, 255], MatType::UInt8, MatType::Double, Endian::native(), 3, "x")
            .unwrap();
        let expected: Vec<u8> = [0.0f64, 7.0, 255.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
        assert_eq!(out, expected);

        // An int32 array stored as miINT16 in the other byte order.
        let stored: Vec<u8> = [-300i16, 12]
            .iter()
            .flat_map(|v| {
                let mut b = v.to_ne_bytes();
                b.reverse();
                b
            })
            .collect();
        let out = decode_part(&stored, MatType::Int16, MatType::Int32, swapped(), 2, "x").unwrap();
        let expected: Vec<u8> = [-300i32, 12].iter().flat_map(|v| v.to_ne_bytes()).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_length_mismatch() {
        let result = decode_part(&[0u8; 12], MatType::Double, MatType::Double, Endian::native(), 2, "x");
        assert!(matches!(result, Err(Error::InvalidFormat { .. })));
    }

    #[test]
    fn test_text_storage_rejected() {
        let result = decode_part(b"ab", MatType::Utf8, MatType::Double, Endian::native(), 2, "x");
        assert!(matches!(result, Err(Error::InvalidFormat { .. })));
    }
}
