//! Array type descriptors.
//!
//! A [`TypeInfo`] pairs an [`ElementType`] with a shape. Shapes are given
//! in host (row-major) order: the last dimension varies fastest.

use std::fmt;

use crate::data_type::ElementType;

/// Maximum number of dimensions an array may have.
pub const MAX_DIMS: usize = 4;

/// Element type and shape of an array.
///
/// # Example
///
/// ```
/// use matcodec::{ElementType, TypeInfo};
///
/// let info = TypeInfo::new(ElementType::Float64, vec![2, 3]);
/// assert!(info.is_valid());
/// assert_eq!(info.num_elements(), 6);
/// assert_eq!(info.buffer_size(), 48);
/// assert_eq!(info.to_string(), "float64[2,3]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeInfo {
    /// Element type.
    pub dtype: ElementType,

    /// Extent of each dimension, outermost first.
    pub shape: Vec<usize>,
}

impl TypeInfo {
    /// Create a descriptor. No validation is performed; see [`is_valid`](Self::is_valid).
    pub fn new(dtype: ElementType, shape: impl Into<Vec<usize>>) -> Self {
        TypeInfo {
            dtype,
            shape: shape.into(),
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }

    /// Total payload size in bytes.
    pub fn buffer_size(&self) -> usize {
        self.num_elements() * self.dtype.item_size()
    }

    /// A descriptor is valid when its element type is known, it has between
    /// 1 and [`MAX_DIMS`] dimensions and no dimension is empty.
    pub fn is_valid(&self) -> bool {
        self.dtype != ElementType::Unknown
            && (1..=MAX_DIMS).contains(&self.ndim())
            && self.shape.iter().all(|&d| d > 0)
    }

    /// Two descriptors are compatible if element type and shape match exactly.
    pub fn is_compatible(&self, other: &TypeInfo) -> bool {
        self.dtype == other.dtype && self.shape == other.shape
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.dtype)?;
        for (i, d) in self.shape.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", d)?;
        }
        f.write_str("]")
    }
}
