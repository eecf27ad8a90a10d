//! Typed array buffers.
//!
//! The codec never owns array memory. It reads from and writes into any
//! type implementing [`ArrayBuffer`]: a byte payload in row-major order plus
//! the [`TypeInfo`] describing it. [`Buffer`] is the owned implementation
//! shipped with this crate.

use crate::data_type::ElementType;
use crate::error::{Error, Result};
use crate::type_info::TypeInfo;

/// Contract between the codec and host array storage.
///
/// Payloads are row-major and native-endian. Complex elements are stored
/// interleaved: real component first, imaginary component second.
pub trait ArrayBuffer {
    /// Descriptor of the current contents.
    fn type_info(&self) -> &TypeInfo;

    /// Raw payload, exactly `type_info().buffer_size()` bytes long.
    fn bytes(&self) -> &[u8];

    /// Mutable raw payload.
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Re-shape the buffer to hold `info`, reallocating if it differs from
    /// the current descriptor.
    fn set(&mut self, info: &TypeInfo);
}

/// Rust scalar types that map onto an [`ElementType`].
///
/// Complex values are represented as `[re, im]` pairs.
pub trait Element: Copy {
    /// The element type this Rust type stands for.
    const ELEMENT_TYPE: ElementType;

    /// Append the native-endian encoding of `self` to `out`.
    fn extend_ne_bytes(&self, out: &mut Vec<u8>);

    /// Decode a value from exactly `ELEMENT_TYPE.item_size()` native-endian bytes.
    fn from_ne_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const ELEMENT_TYPE: ElementType = ElementType::$dtype;

                fn extend_ne_bytes(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                fn from_ne_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

macro_rules! impl_complex_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for [$ty; 2] {
                const ELEMENT_TYPE: ElementType = ElementType::$dtype;

                fn extend_ne_bytes(&self, out: &mut Vec<u8>) {
                    self[0].extend_ne_bytes(out);
                    self[1].extend_ne_bytes(out);
                }

                fn from_ne_slice(bytes: &[u8]) -> Self {
                    let (re, im) = bytes.split_at(std::mem::size_of::<$ty>());
                    [<$ty>::from_ne_slice(re), <$ty>::from_ne_slice(im)]
                }
            }
        )*
    };
}

impl_complex_element! {
    f32 => Complex64,
    f64 => Complex128,
}

/// Encode a slice of elements as native-endian bytes.
pub(crate) fn to_ne_bytes<T: Element>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::ELEMENT_TYPE.item_size());
    for v in values {
        v.extend_ne_bytes(&mut out);
    }
    out
}

/// An owned, row-major typed array.
///
/// # Example
///
/// ```
/// use matcodec::{Buffer, ElementType};
///
/// let buf = Buffer::from_elements(vec![2, 2], &[1.0f64, 2.0, 3.0, 4.0])?;
/// assert_eq!(buf.info().dtype, ElementType::Float64);
/// assert_eq!(buf.to_vec::<f64>()?, vec![1.0, 2.0, 3.0, 4.0]);
/// # Ok::<(), matcodec::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Buffer {
    info: TypeInfo,
    data: Vec<u8>,
}

impl Buffer {
    /// Allocate a zero-filled buffer for `info`.
    pub fn new(info: TypeInfo) -> Self {
        let data = vec![0u8; info.buffer_size()];
        Buffer { info, data }
    }

    /// Wrap raw native-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data` does not hold exactly
    /// `info.buffer_size()` bytes.
    pub fn from_bytes(info: TypeInfo, data: Vec<u8>) -> Result<Self> {
        if data.len() != info.buffer_size() {
            return Err(Error::ShapeMismatch {
                expected: info.buffer_size(),
                actual: data.len(),
            });
        }
        Ok(Buffer { info, data })
    }

    /// Build a buffer from typed values given in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the number of values does not
    /// match the shape.
    pub fn from_elements<T: Element>(shape: impl Into<Vec<usize>>, values: &[T]) -> Result<Self> {
        let info = TypeInfo::new(T::ELEMENT_TYPE, shape);
        Self::from_bytes(info, to_ne_bytes(values))
    }

    /// Descriptor of the buffer contents.
    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    /// Consume the buffer and return its payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Decode the payload as values of type `T`, in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `T` does not correspond to the
    /// buffer's element type.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::ELEMENT_TYPE != self.info.dtype {
            return Err(Error::type_mismatch(self.info.dtype, T::ELEMENT_TYPE));
        }
        let size = T::ELEMENT_TYPE.item_size();
        Ok(self.data.chunks_exact(size).map(T::from_ne_slice).collect())
    }
}

impl ArrayBuffer for Buffer {
    fn type_info(&self) -> &TypeInfo {
        &self.info
    }

    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn set(&mut self, info: &TypeInfo) {
        if self.info.is_compatible(info) && self.data.len() == info.buffer_size() {
            return;
        }
        self.info = info.clone();
        self.data = vec![0u8; info.buffer_size()];
    }
}

// ============================================================================
// ndarray Integration
// ============================================================================

#[cfg(feature = "ndarray")]
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn};

#[cfg(feature = "ndarray")]
impl Buffer {
    /// Copy an ndarray array into a new buffer.
    ///
    /// Elements are taken in logical (row-major) order, whatever the
    /// memory layout of the source.
    ///
    /// # Example
    ///
    /// ```
    /// use matcodec::Buffer;
    /// use ndarray::array;
    ///
    /// let buf = Buffer::from_array(&array![[1i32, 2], [3, 4]].t());
    /// assert_eq!(buf.to_vec::<i32>()?, vec![1, 3, 2, 4]);
    /// # Ok::<(), matcodec::Error>(())
    /// ```
    pub fn from_array<T, S, D>(array: &ArrayBase<S, D>) -> Self
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let info = TypeInfo::new(T::ELEMENT_TYPE, array.shape().to_vec());
        let mut data = Vec::with_capacity(info.buffer_size());
        for v in array.iter() {
            v.extend_ne_bytes(&mut data);
        }
        Buffer { info, data }
    }

    /// Decode the buffer into a dynamic-dimensional ndarray array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `T` does not match the element type.
    pub fn to_array<T: Element>(&self) -> Result<ArrayD<T>> {
        let values = self.to_vec::<T>()?;
        ArrayD::from_shape_vec(IxDyn(&self.info.shape), values)
            .map_err(|e| Error::invalid_format(format!("Shape error: {}", e)))
    }
}
