//! Row-major / column-major conversion of array payloads.
//!
//! Host buffers are row-major with complex values interleaved; MAT files
//! store column-major data with the real and imaginary parts in separate
//! arrays. Everything here moves bytes around without looking at values,
//! so one implementation serves every element type.

use crate::error::{Error, Result};
use crate::type_info::{TypeInfo, MAX_DIMS};

/// Column-major payload as written to or read from a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatPayload {
    /// Real part, or the whole payload for real element types.
    pub real: Vec<u8>,

    /// Imaginary part, for complex element types.
    pub imag: Option<Vec<u8>>,
}

/// Column-major strides, in elements.
fn col_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut stride = 1;
    for &d in shape {
        strides.push(stride);
        stride *= d;
    }
    strides
}

/// Call `f(row_index, col_index)` for every element, in row-major order.
///
/// The column-major offset is maintained incrementally while a multi-index
/// counter walks the shape, last dimension fastest.
fn for_each_offset(shape: &[usize], mut f: impl FnMut(usize, usize)) {
    let count: usize = shape.iter().product();
    if count == 0 {
        return;
    }

    let strides = col_strides(shape);
    let mut index = vec![0usize; shape.len()];
    let mut col = 0usize;

    for row in 0..count {
        f(row, col);

        for k in (0..shape.len()).rev() {
            index[k] += 1;
            col += strides[k];
            if index[k] < shape[k] {
                break;
            }
            col -= strides[k] * shape[k];
            index[k] = 0;
        }
    }
}

/// Reorder a row-major payload of `item_size`-byte elements to column-major.
pub fn row_to_col_order(src: &[u8], shape: &[usize], item_size: usize) -> Vec<u8> {
    let mut dst = vec![0u8; src.len()];
    for_each_offset(shape, |row, col| {
        let (r, c) = (row * item_size, col * item_size);
        dst[c..c + item_size].copy_from_slice(&src[r..r + item_size]);
    });
    dst
}

/// Reorder a column-major payload of `item_size`-byte elements into the
/// row-major buffer `dst`.
pub fn col_to_row_order(src: &[u8], dst: &mut [u8], shape: &[usize], item_size: usize) {
    for_each_offset(shape, |row, col| {
        let (r, c) = (row * item_size, col * item_size);
        dst[r..r + item_size].copy_from_slice(&src[c..c + item_size]);
    });
}

/// Split interleaved complex values into their real and imaginary parts.
pub fn split_complex(src: &[u8], component_size: usize) -> (Vec<u8>, Vec<u8>) {
    let mut real = Vec::with_capacity(src.len() / 2);
    let mut imag = Vec::with_capacity(src.len() / 2);
    for pair in src.chunks_exact(2 * component_size) {
        let (re, im) = pair.split_at(component_size);
        real.extend_from_slice(re);
        imag.extend_from_slice(im);
    }
    (real, imag)
}

/// Interleave separate real and imaginary parts into `dst`.
pub fn interleave_complex(real: &[u8], imag: &[u8], dst: &mut [u8], component_size: usize) {
    let parts = real
        .chunks_exact(component_size)
        .zip(imag.chunks_exact(component_size));
    for (pair, (re, im)) in dst.chunks_exact_mut(2 * component_size).zip(parts) {
        pair[..component_size].copy_from_slice(re);
        pair[component_size..].copy_from_slice(im);
    }
}

fn check_rank(info: &TypeInfo) -> Result<()> {
    if !(1..=MAX_DIMS).contains(&info.ndim()) {
        return Err(Error::invalid_format(format!(
            "arrays of {} dimensions are not supported (1 to {})",
            info.ndim(),
            MAX_DIMS
        )));
    }
    Ok(())
}

fn check_len(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// Convert a host payload described by `info` to file layout.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if `src` is not `info.buffer_size()` bytes
/// - [`Error::InvalidFormat`] if the rank is outside 1 to 4
///
/// # Example
///
/// ```
/// use matcodec::layout::to_format_layout;
/// use matcodec::{ElementType, TypeInfo};
///
/// // [[1, 2, 3], [4, 5, 6]] is stored as 1, 4, 2, 5, 3, 6
/// let info = TypeInfo::new(ElementType::UInt8, vec![2, 3]);
/// let payload = to_format_layout(&[1, 2, 3, 4, 5, 6], &info)?;
/// assert_eq!(payload.real, vec![1, 4, 2, 5, 3, 6]);
/// assert!(payload.imag.is_none());
/// # Ok::<(), matcodec::Error>(())
/// ```
pub fn to_format_layout(src: &[u8], info: &TypeInfo) -> Result<FormatPayload> {
    check_rank(info)?;
    check_len(src.len(), info.buffer_size())?;

    if info.dtype.is_complex() {
        let component = info.dtype.component_size();
        let (real, imag) = split_complex(src, component);
        Ok(FormatPayload {
            real: row_to_col_order(&real, &info.shape, component),
            imag: Some(row_to_col_order(&imag, &info.shape, component)),
        })
    } else {
        Ok(FormatPayload {
            real: row_to_col_order(src, &info.shape, info.dtype.item_size()),
            imag: None,
        })
    }
}

/// Convert a file payload described by `info` into the host buffer `dst`.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if a part or `dst` has the wrong length
/// - [`Error::InvalidFormat`] if the rank is outside 1 to 4, or if a complex
///   type comes without an imaginary part
pub fn from_format_layout(
    real: &[u8],
    imag: Option<&[u8]>,
    info: &TypeInfo,
    dst: &mut [u8],
) -> Result<()> {
    check_rank(info)?;
    check_len(dst.len(), info.buffer_size())?;

    if info.dtype.is_complex() {
        let component = info.dtype.component_size();
        let imag = imag.ok_or_else(|| {
            Error::invalid_format(format!("{} data without an imaginary part", info.dtype))
        })?;

        let part_size = info.num_elements() * component;
        check_len(real.len(), part_size)?;
        check_len(imag.len(), part_size)?;

        let mut re = vec![0u8; part_size];
        let mut im = vec![0u8; part_size];
        col_to_row_order(real, &mut re, &info.shape, component);
        col_to_row_order(imag, &mut im, &info.shape, component);
        interleave_complex(&re, &im, dst, component);
    } else {
        check_len(real.len(), info.buffer_size())?;
        col_to_row_order(real, dst, &info.shape, info.dtype.item_size());
    }

    Ok(())
}
