//! # matcodec
//!
//! Store typed n-dimensional arrays in MATLAB level-5 `.mat` files, and
//! read them back. Level-4 files can be read as well.
//!
//! A `.mat` file is treated as an ordered collection of arrays: each call
//! to [`MatFile::append`] adds a variable named `array_<n>`, and
//! [`MatFile::read`] fetches one back by position. Host arrays are
//! row-major with interleaved complex values; the codec converts them to
//! and from the column-major, split-complex layout of the file.
//!
//! ## Quick Start
//!
//! ### Appending and reading arrays
//!
//! ```no_run
//! use matcodec::{Buffer, MatFile, Mode, Result};
//!
//! fn main() -> Result<()> {
//!     let mut file = MatFile::open("frames.mat", Mode::Append)?;
//!
//!     for step in 0..3 {
//!         let frame = Buffer::from_elements(vec![2, 2], &[step as f64; 4])?;
//!         let id = file.append(&frame)?;
//!         println!("Stored frame {} as array {}", step, id);
//!     }
//!
//!     for entry in file.catalog() {
//!         println!("{}: {} {}", entry.id, entry.name, entry.info);
//!     }
//!
//!     let mut frame = Buffer::default();
//!     file.read(&mut frame, 1)?;
//!     println!("Second frame: {:?}", frame.to_vec::<f64>()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Single-array files
//!
//! ```no_run
//! use matcodec::{Buffer, MatFile, Mode, Result};
//!
//! fn main() -> Result<()> {
//!     let spectrum = Buffer::from_elements(vec![3], &[[1.0f32, 0.5], [0.0, -1.0], [2.0, 0.0]])?;
//!
//!     let mut file = MatFile::open("spectrum.mat", Mode::Write)?;
//!     file.write(&spectrum)?;
//!
//!     let mut back = Buffer::default();
//!     MatFile::open("spectrum.mat", Mode::Read)?.read_all(&mut back)?;
//!     assert_eq!(back, spectrum);
//!     Ok(())
//! }
//! ```
//!
//! ### With ndarray (optional feature)
//!
//! ```no_run
//! # #[cfg(feature = "ndarray")]
//! use matcodec::{Buffer, MatFile, Mode, Result};
//! # #[cfg(feature = "ndarray")]
//! use ndarray::Array3;
//!
//! # #[cfg(feature = "ndarray")]
//! fn example() -> Result<()> {
//!     let volume = Array3::<i16>::zeros((4, 5, 6));
//!
//!     let mut file = MatFile::open("volume.mat", Mode::Write)?;
//!     file.write(&Buffer::from_array(&volume))?;
//!
//!     let mut back = Buffer::default();
//!     file.read_all(&mut back)?;
//!     println!("Shape: {:?}", back.to_array::<i16>()?.shape());
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Element Types
//!
//! | Element type | MAT class | Rust type |
//! |--------------|-----------|-----------|
//! | int8 .. int64 | int8 .. int64 | `i8` .. `i64` |
//! | uint8 .. uint64 | uint8 .. uint64 | `u8` .. `u64` |
//! | float32 | single | `f32` |
//! | float64 | double | `f64` |
//! | complex64 | single, complex | `[f32; 2]` |
//! | complex128 | double, complex | `[f64; 2]` |
//!
//! Arrays have 1 to 4 dimensions.
//!
//! ## Feature Flags
//!
//! - `ndarray`: Convert [`Buffer`] to and from `ndarray` arrays
//!
//! ## Thread Safety
//!
//! Nothing in this crate locks. A [`MatFile`] session mutates its catalog
//! through `&mut self`, and separate sessions on the same path do not
//! coordinate; concurrent writers to one file are not supported.

#![deny(missing_docs)]

// Modules
mod buffer;
mod catalog;
mod codec;
mod data_type;
mod error;
mod file;
pub mod layout;
pub mod mat;
mod options;
mod type_info;
pub mod typemap;

// Public exports
pub use buffer::{ArrayBuffer, Buffer, Element};
pub use catalog::{Catalog, CatalogEntry};
pub use codec::{ArrayFile, CodecFactory, CodecRegistry, MAT_CODEC_NAME};
pub use data_type::ElementType;
pub use error::{Error, Result};
pub use file::{MatFile, Mode, APPEND_PREFIX, SINGLE_ARRAY_NAME};
pub use options::{CodecOptions, Compression};
pub use type_info::{TypeInfo, MAX_DIMS};

// Conditional re-exports
#[cfg(feature = "ndarray")]
pub use ndarray;
