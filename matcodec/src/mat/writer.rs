//! Writing level-5 MAT files.
//!
//! [`MatWriter`] either creates a new file (header included) or appends to
//! an existing one. Every value is written in host byte order, so appending
//! is only allowed to files whose header declares the same order.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;

use super::header::{Endian, Header, HEADER_SIZE};
use super::reader::padding;
use super::tags::{MatClass, MatType, FLAG_COMPLEX};
use crate::error::{Error, Result};
use crate::options::{CodecOptions, Compression};

/// One variable to write, payload in column-major order and host byte order.
#[derive(Debug, Clone, Copy)]
pub struct VarSpec<'a> {
    /// Variable name.
    pub name: &'a str,

    /// Array class recorded in the flags.
    pub class: MatClass,

    /// Storage type of the payload.
    pub data_type: MatType,

    /// Dimensions.
    pub dims: &'a [usize],

    /// Real part.
    pub real: &'a [u8],

    /// Imaginary part, present for complex data.
    pub imag: Option<&'a [u8]>,
}

/// Writer of variables into one MAT file.
///
/// Call [`finish`](MatWriter::finish) to flush and sync the file; dropping
/// the writer flushes on a best-effort basis only.
#[derive(Debug)]
pub struct MatWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    compression: Compression,
    written: usize,
}

impl MatWriter {
    /// Create (or truncate) a file and write its header.
    pub fn create(path: impl AsRef<Path>, options: &CodecOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::open_failed(path, e))?;

        let mut writer = BufWriter::new(file);
        writer.write_all(&Header::new(options.resolved_header_text()).to_bytes())?;

        log::debug!("Created MAT file '{}'", path.display());

        Ok(MatWriter {
            writer,
            path: path.to_path_buf(),
            compression: options.compression,
            written: 0,
        })
    }

    /// Open an existing file for appending variables at its end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the file has no valid level-5
    /// header (level-4 files included) or declares a byte order different
    /// from the host's.
    pub fn append(path: impl AsRef<Path>, options: &CodecOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::open_failed(path, e))?;

        let mut raw = [0u8; HEADER_SIZE];
        file.read_exact(&mut raw).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::invalid_format(format!(
                "'{}' has no level-5 header; only level-5 files can be appended to",
                path.display()
            )),
            _ => Error::Io(e),
        })?;

        let header = Header::parse(&raw)?;
        if header.endian != Endian::native() {
            return Err(Error::invalid_format(format!(
                "cannot append to '{}': its byte order differs from the host's",
                path.display()
            )));
        }

        file.seek(SeekFrom::End(0))?;

        Ok(MatWriter {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            compression: options.compression,
            written: 0,
        })
    }

    /// Append to `path` if it exists, create it otherwise.
    pub fn open_or_create(path: impl AsRef<Path>, options: &CodecOptions) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::append(path, options)
        } else {
            Self::create(path, options)
        }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of variables written through this writer.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Write one variable.
    ///
    /// # Errors
    ///
    /// - [`Error::ShapeMismatch`] if a payload does not match the dimensions
    /// - [`Error::InvalidFormat`] if the name is empty or the variable is too
    ///   large for the format's 32-bit fields
    pub fn write(&mut self, var: &VarSpec<'_>) -> Result<()> {
        let body = encode_array(var)?;

        match self.compression {
            Compression::None => {
                self.writer.write_all(&tag(MatType::Matrix, body.len())?)?;
                self.writer.write_all(&body)?;
            }
            Compression::Zlib(level) => {
                let mut encoder =
                    ZlibEncoder::new(Vec::new(), flate2::Compression::new(level.min(9)));
                encoder.write_all(&tag(MatType::Matrix, body.len())?)?;
                encoder.write_all(&body)?;
                let packed = encoder.finish()?;

                // Compressed elements are not padded.
                self.writer
                    .write_all(&tag(MatType::Compressed, packed.len())?)?;
                self.writer.write_all(&packed)?;
            }
        }

        self.written += 1;
        log::debug!(
            "Wrote variable '{}' ({}, {:?}) to '{}'",
            var.name,
            var.class,
            var.dims,
            self.path.display()
        );

        Ok(())
    }

    /// Flush buffered data and sync the file to disk.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}

/// Encode the body of an `miMATRIX` element (everything after its tag).
fn encode_array(var: &VarSpec<'_>) -> Result<Vec<u8>> {
    if var.name.is_empty() {
        return Err(Error::invalid_format("variable name must not be empty"));
    }

    let item_size = var.data_type.size_bytes();
    if item_size == 0 {
        return Err(Error::unsupported_type(format!("{:?}", var.data_type)));
    }

    let expected = var.dims.iter().product::<usize>() * item_size;
    if var.real.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: var.real.len(),
        });
    }
    if let Some(imag) = var.imag {
        if imag.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: imag.len(),
            });
        }
    }

    let mut body = Vec::with_capacity(64 + 2 * expected);

    let mut flags = var.class as u32;
    if var.imag.is_some() {
        flags |= FLAG_COMPLEX;
    }
    let mut flag_words = Vec::with_capacity(8);
    flag_words.extend_from_slice(&flags.to_ne_bytes());
    flag_words.extend_from_slice(&0u32.to_ne_bytes());
    push_subelement(&mut body, MatType::UInt32, &flag_words)?;

    let mut dims = Vec::with_capacity(4 * var.dims.len());
    for &d in var.dims {
        let d = i32::try_from(d)
            .map_err(|_| Error::invalid_format(format!("dimension {} exceeds i32", d)))?;
        dims.extend_from_slice(&d.to_ne_bytes());
    }
    push_subelement(&mut body, MatType::Int32, &dims)?;

    push_subelement(&mut body, MatType::Int8, var.name.as_bytes())?;

    push_subelement(&mut body, var.data_type, var.real)?;
    if let Some(imag) = var.imag {
        push_subelement(&mut body, var.data_type, imag)?;
    }

    Ok(body)
}

fn push_subelement(out: &mut Vec<u8>, ty: MatType, data: &[u8]) -> Result<()> {
    out.extend_from_slice(&tag(ty, data.len())?);
    out.extend_from_slice(data);
    let pad = padding(data.len() as u64) as usize;
    out.resize(out.len() + pad, 0);
    Ok(())
}

fn tag(ty: MatType, nbytes: usize) -> Result<[u8; 8]> {
    let nbytes = u32::try_from(nbytes).map_err(|_| {
        Error::invalid_format(format!("data element of {} bytes exceeds u32", nbytes))
    })?;

    let mut raw = [0u8; 8];
    raw[..4].copy_from_slice(&(ty as u32).to_ne_bytes());
    raw[4..].copy_from_slice(&nbytes.to_ne_bytes());
    Ok(raw)
}
