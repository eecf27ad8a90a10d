//! MAT container support.
//!
//! This module frames the on-disk structure of MATLAB files: the 128-byte
//! level-5 header, top-level data elements, the array headers of numeric
//! variables, and the matrix records of headerless level-4 files. It knows
//! nothing about catalogs or array IDs; those live in [`crate::file`].
//!
//! # Overview
//!
//! - [`MatReader`] - Sequential, metadata-only or full reading of variables
//! - [`MatWriter`] - Creating files and appending variables
//! - [`Header`] - The level-5 file header and its byte order
//! - [`MatClass`] / [`MatType`] - Array classes and storage tags
//!
//! # Example
//!
//! ```no_run
//! use matcodec::mat::{MatClass, MatReader, MatType, MatWriter, VarSpec};
//! use matcodec::CodecOptions;
//!
//! let real: Vec<u8> = [1.0f64, 2.0, 3.0]
//!     .iter()
//!     .flat_map(|v| v.to_ne_bytes())
//!     .collect();
//!
//! let mut writer = MatWriter::create("out.mat", &CodecOptions::default())?;
//! writer.write(&VarSpec {
//!     name: "x",
//!     class: MatClass::Double,
//!     data_type: MatType::Double,
//!     dims: &[3],
//!     real: &real,
//!     imag: None,
//! })?;
//! writer.finish()?;
//!
//! let mut reader = MatReader::open("out.mat")?;
//! let x = reader.read_named("x")?.expect("variable x");
//! assert_eq!(x.info.dims, vec![3]);
//! # Ok::<(), matcodec::Error>(())
//! ```
//!
//! # Supported Files
//!
//! - Level 5 MAT files (MATLAB v5, v6, v7), either byte order, for reading
//!   and writing
//! - v7 compressed elements
//! - Level 4 MAT files in IEEE byte order, for reading only
//! - Numeric arrays, real or complex
//!
//! # Not Supported
//!
//! - HDF5-based v7.3 files
//! - Appending to level 4 files
//! - Payloads of cell arrays, structs, sparse matrices and character arrays
//!   (their headers are still listed)

mod data;
mod header;
mod level4;
mod reader;
mod tags;
mod writer;

pub use data::Payload;
pub use header::{Endian, Header, Level, HEADER_SIZE, HEADER_TEXT_SIZE, VERSION_5};
pub use level4::MATRIX_HEADER_SIZE;
pub use reader::{MatReader, MatVariable, VarInfo};
pub use tags::{MatClass, MatType, FLAG_COMPLEX, FLAG_GLOBAL, FLAG_LOGICAL};
pub use writer::{MatWriter, VarSpec};
