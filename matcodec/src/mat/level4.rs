//! Level-4 MAT files.
//!
//! A level-4 file has no file header: it is a plain sequence of matrices,
//! each introduced by five 32-bit integers (type code `MOPT`, rows,
//! columns, imaginary flag, name length). The NUL-terminated name follows,
//! then the real part and the optional imaginary part, column-major.
//!
//! Only IEEE little- and big-endian files are read. VAX and Cray encodings
//! are rejected as unrecognized.

use std::io::{Read, Seek, SeekFrom};

use super::data::{decode_part, element_count, Payload};
use super::header::Endian;
use super::reader::{read_or_eof, truncated, word, VarInfo};
use super::tags::{MatClass, MatType};
use crate::error::{Error, Result};

/// Size of the header in front of every level-4 matrix.
pub const MATRIX_HEADER_SIZE: usize = 20;

/// Upper bound on name lengths, to tell matrix headers from arbitrary bytes.
const MAX_NAME_LEN: usize = 4096;

/// Decoded `MOPT` type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TypeCode {
    endian: Endian,
    storage: MatType,
    class: MatClass,
}

impl TypeCode {
    fn decode(mopt: i32) -> Option<Self> {
        if !(0..5000).contains(&mopt) {
            return None;
        }

        let endian = match mopt / 1000 {
            0 => Endian::Little,
            1 => Endian::Big,
            _ => return None,
        };

        // O is reserved and always zero.
        if (mopt / 100) % 10 != 0 {
            return None;
        }

        let (storage, numeric) = match (mopt / 10) % 10 {
            0 => (MatType::Double, MatClass::Double),
            1 => (MatType::Single, MatClass::Single),
            2 => (MatType::Int32, MatClass::Int32),
            3 => (MatType::Int16, MatClass::Int16),
            4 => (MatType::UInt16, MatClass::UInt16),
            5 => (MatType::UInt8, MatClass::UInt8),
            _ => return None,
        };

        let class = match mopt % 10 {
            0 => numeric,
            1 => MatClass::Char,
            2 => MatClass::Sparse,
            _ => return None,
        };

        Some(TypeCode {
            endian,
            storage,
            class,
        })
    }
}

#[derive(Debug)]
struct MatrixHeader {
    code: TypeCode,
    rows: usize,
    cols: usize,
    imag: bool,
    name_len: usize,
}

impl MatrixHeader {
    /// Parse a matrix header, trying both byte orders. The `M` digit of the
    /// type code must agree with the order it was read in.
    fn parse(raw: &[u8]) -> Option<Self> {
        let endian = [Endian::Little, Endian::Big].into_iter().find(|&endian| {
            TypeCode::decode(endian.i32(word(raw, 0))).map_or(false, |code| code.endian == endian)
        })?;
        let field = |i: usize| endian.i32(word(raw, 4 * i));

        let code = TypeCode::decode(field(0))?;
        let rows = usize::try_from(field(1)).ok()?;
        let cols = usize::try_from(field(2)).ok()?;
        let imag = match field(3) {
            0 => false,
            1 => true,
            _ => return None,
        };
        let name_len = usize::try_from(field(4))
            .ok()
            .filter(|len| (1..=MAX_NAME_LEN).contains(len))?;

        Some(MatrixHeader {
            code,
            rows,
            cols,
            imag,
            name_len,
        })
    }
}

/// Byte order of a level-4 file, judged from its first bytes.
///
/// Returns `None` if `lead` does not start with a plausible matrix header.
pub(crate) fn detect(lead: &[u8]) -> Option<Endian> {
    if lead.len() < MATRIX_HEADER_SIZE {
        return None;
    }
    MatrixHeader::parse(&lead[..MATRIX_HEADER_SIZE]).map(|header| header.code.endian)
}

/// Read the next matrix, or `None` at the end of the file.
///
/// The payload is decoded only when `with_payload` is set and the matrix is
/// numeric; otherwise it is skipped.
pub(crate) fn read_matrix<R: Read + Seek>(
    r: &mut R,
    with_payload: bool,
) -> Result<Option<(VarInfo, Option<Payload>)>> {
    let mut raw = [0u8; MATRIX_HEADER_SIZE];
    if !read_or_eof(r, &mut raw)? {
        return Ok(None);
    }

    let header = MatrixHeader::parse(&raw)
        .ok_or_else(|| Error::invalid_format("malformed level-4 matrix header"))?;

    let mut name = vec![0u8; header.name_len];
    r.read_exact(&mut name).map_err(truncated)?;
    if let Some(nul) = name.iter().position(|&b| b == 0) {
        name.truncate(nul);
    }

    let info = VarInfo {
        name: String::from_utf8_lossy(&name).into_owned(),
        class: header.code.class,
        is_complex: header.imag,
        is_logical: false,
        dims: vec![header.rows, header.cols],
        compressed: false,
    };

    let storage = header.code.storage;
    let count = element_count(&info)?;
    let part_size = count
        .checked_mul(storage.size_bytes())
        .ok_or_else(|| Error::invalid_format(format!("matrix '{}' is too large", info.name)))?;

    if !with_payload || !info.class.is_numeric() {
        let parts = if header.imag { 2 } else { 1 };
        let skip = part_size
            .checked_mul(parts)
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| Error::invalid_format(format!("matrix '{}' is too large", info.name)))?;
        r.seek(SeekFrom::Current(skip))?;
        return Ok(Some((info, None)));
    }

    let endian = header.code.endian;
    let mut read_part = || -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; part_size];
        r.read_exact(&mut bytes).map_err(truncated)?;
        decode_part(&bytes, storage, storage, endian, count, &info.name)
    };

    let real = read_part()?;
    let imag = if header.imag { Some(read_part()?) } else { None };

    Ok(Some((info, Some(Payload { real, imag }))))
}
