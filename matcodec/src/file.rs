//! The `.mat` file codec.
//!
//! This module provides [`MatFile`], a session bound to one path and one
//! access [`Mode`] that treats a MAT file as an ordered, appendable
//! collection of arrays.
//!
//! # Example
//!
//! ```no_run
//! use matcodec::{Buffer, MatFile, Mode};
//!
//! let mut file = MatFile::open("frames.mat", Mode::Append)?;
//! let frame = Buffer::from_elements(vec![2, 3], &[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//! let id = file.append(&frame)?;
//!
//! let mut back = Buffer::default();
//! file.read(&mut back, id)?;
//! assert_eq!(back, frame);
//! # Ok::<(), matcodec::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::buffer::ArrayBuffer;
use crate::catalog::Catalog;
use crate::data_type::ElementType;
use crate::error::{Error, Result};
use crate::layout::{from_format_layout, to_format_layout, FormatPayload};
use crate::mat::{MatClass, MatReader, MatType, MatVariable, MatWriter, VarSpec};
use crate::options::CodecOptions;
use crate::type_info::{TypeInfo, MAX_DIMS};
use crate::typemap::{to_format_tags, type_info_of};

/// Name of the variable written by [`MatFile::write`].
pub const SINGLE_ARRAY_NAME: &str = "array";

/// Prefix of variable names written by [`MatFile::append`].
pub const APPEND_PREFIX: &str = "array_";

/// Access mode of a [`MatFile`] session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// `'r'`: read only.
    Read,

    /// `'w'`: truncate (or create), then read and write.
    Write,

    /// `'a'`: read and write, creating the file on first write.
    Append,
}

impl Mode {
    /// Parse a mode character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] for anything but `'r'`, `'w'` or `'a'`.
    pub fn from_char(mode: char) -> Result<Self> {
        match mode {
            'r' => Ok(Mode::Read),
            'w' => Ok(Mode::Write),
            'a' => Ok(Mode::Append),
            other => Err(Error::InvalidMode { mode: other }),
        }
    }

    /// The mode character.
    pub fn as_char(&self) -> char {
        match self {
            Mode::Read => 'r',
            Mode::Write => 'w',
            Mode::Append => 'a',
        }
    }

    /// Check if the mode permits writes.
    pub fn is_writable(&self) -> bool {
        !matches!(self, Mode::Read)
    }
}

/// A codec session on one MAT file.
///
/// The underlying file is opened and closed within each call; nothing is
/// held open between calls. Every write is flushed and synced before the
/// call returns.
///
/// # Catalog
///
/// The session keeps a [`Catalog`] of the file's variables. It is loaded
/// when the session opens an existing file in [`Mode::Read`] or
/// [`Mode::Append`], reloaded lazily while no representative type is
/// known, and patched in place after each append. [`reload`](Self::reload)
/// forces a full rebuild.
///
/// # Thread Safety
///
/// Sessions are not synchronized. Operations that touch the catalog take
/// `&mut self`; share a session across threads behind a lock. Sessions on
/// the same path do not coordinate with each other.
#[derive(Debug)]
pub struct MatFile {
    path: PathBuf,
    mode: Mode,
    options: CodecOptions,
    catalog: Catalog,
}

impl MatFile {
    /// Open a session with default options.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedCatalog`] if an existing file opened for reading
    ///   or appending has an unusable first variable
    /// - [`Error::OpenFailed`] if an existing file cannot be removed in
    ///   [`Mode::Write`]
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<Self> {
        Self::with_options(path, mode, CodecOptions::default())
    }

    /// Open a session with explicit options.
    ///
    /// Opening a missing file in [`Mode::Read`] succeeds; later reads fail
    /// with [`Error::NotFound`].
    pub fn with_options(path: impl AsRef<Path>, mode: Mode, options: CodecOptions) -> Result<Self> {
        let mut file = MatFile {
            path: path.as_ref().to_path_buf(),
            mode,
            options,
            catalog: Catalog::empty(),
        };

        match mode {
            Mode::Read | Mode::Append => file.try_reload()?,
            Mode::Write => file.remove_existing()?,
        }

        Ok(file)
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the access mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the session options.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Current catalog projection.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of variables in the catalog.
    pub fn size(&self) -> usize {
        self.catalog.len()
    }

    /// Representative type of the file, if established.
    pub fn type_info(&self) -> Option<&TypeInfo> {
        self.catalog.representative()
    }

    /// Rebuild the catalog from the file on disk.
    ///
    /// A missing file yields an empty catalog.
    pub fn reload(&mut self) -> Result<()> {
        if self.path.exists() {
            self.catalog = Catalog::load(&self.path, &self.options)?;
        } else {
            self.catalog = Catalog::empty();
        }
        Ok(())
    }

    /// Read the first variable of the file into `buffer`.
    ///
    /// Only the first variable is ever returned, however many the file
    /// holds; use [`read`](Self::read) for the others.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the file does not exist
    /// - [`Error::UnsupportedType`] if the variable is not a numeric array
    pub fn read_all(&mut self, buffer: &mut dyn ArrayBuffer) -> Result<()> {
        self.ensure_loaded()?;

        let mut reader = MatReader::open(&self.path)?;
        let var = reader.read_next()?.ok_or_else(|| {
            Error::not_found(format!("any variable in '{}'", self.path.display()))
        })?;

        assign(var, buffer)
    }

    /// Read the variable at catalog position `index` into `buffer`.
    ///
    /// The buffer takes the variable's own type, as stored in the file.
    ///
    /// The index is checked before the file is touched. A session opened on
    /// a path that does not exist has an empty catalog, so every `read` on it
    /// fails with [`Error::IndexOutOfRange`] (`size: 0`) rather than
    /// [`Error::NotFound`]; only [`read_all`](Self::read_all) reports the
    /// missing file as such.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfRange`] if `index >= self.size()`, including on
    ///   a missing file
    /// - [`Error::NotFound`] if the file or the variable disappeared after
    ///   the catalog was loaded
    pub fn read(&mut self, buffer: &mut dyn ArrayBuffer, index: usize) -> Result<()> {
        self.ensure_loaded()?;

        let name = match self.catalog.get(index) {
            Some(entry) => entry.name.clone(),
            None => {
                return Err(Error::IndexOutOfRange {
                    index,
                    size: self.catalog.len(),
                })
            }
        };

        let mut reader = MatReader::open(&self.path)?;
        let var = reader.read_named(&name)?.ok_or_else(|| {
            Error::not_found(format!(
                "variable '{}' in '{}'",
                name,
                self.path.display()
            ))
        })?;

        assign(var, buffer)
    }

    /// Append `buffer` as a new variable and return its catalog id.
    ///
    /// The variable is named `array_<n>`, `n` being one past the largest
    /// id in the catalog. Once the file has a representative type, only
    /// buffers compatible with it are accepted.
    ///
    /// The write is synced before the catalog is updated. If the write
    /// fails midway, the catalog is left as it was and may no longer match
    /// the file; call [`reload`](Self::reload) to resynchronize.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if the buffer differs from the
    ///   representative type
    /// - [`Error::ReadOnly`] in [`Mode::Read`]
    /// - [`Error::UnsupportedType`] if the element type cannot be stored
    pub fn append(&mut self, buffer: &dyn ArrayBuffer) -> Result<usize> {
        self.ensure_loaded()?;

        if let Some(expected) = self.catalog.representative() {
            if !expected.is_compatible(buffer.type_info()) {
                return Err(Error::type_mismatch(expected, buffer.type_info()));
            }
        }

        if !self.mode.is_writable() {
            return Err(Error::read_only(&self.path));
        }

        let info = buffer.type_info().clone();
        let encoded = encode(buffer)?;

        let id = self.catalog.next_id();
        let name = format!("{}{}", APPEND_PREFIX, id);

        let mut writer = MatWriter::open_or_create(&self.path, &self.options)?;
        writer.write(&encoded.var_spec(&name, &info))?;
        writer.finish()?;

        if self.catalog.representative().is_none() {
            self.reload()?;
        } else {
            self.catalog.insert_next(name, info);
        }

        Ok(self.catalog.len() - 1)
    }

    /// Replace the whole file with `buffer`, stored as the single variable
    /// `array`.
    ///
    /// The buffer is validated before anything on disk is touched.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadOnly`] in [`Mode::Read`]
    /// - [`Error::UnsupportedType`] if the element type cannot be stored
    pub fn write(&mut self, buffer: &dyn ArrayBuffer) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(Error::read_only(&self.path));
        }

        let info = buffer.type_info().clone();
        let encoded = encode(buffer)?;

        self.remove_existing()?;

        let mut writer = MatWriter::create(&self.path, &self.options)?;
        writer.write(&encoded.var_spec(SINGLE_ARRAY_NAME, &info))?;
        writer.finish()?;

        self.catalog = Catalog::single(SINGLE_ARRAY_NAME, info);
        Ok(())
    }

    fn try_reload(&mut self) -> Result<()> {
        if self.path.exists() {
            self.catalog = Catalog::load(&self.path, &self.options)?;
        }
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.catalog.representative().is_none() {
            self.try_reload()?;
        }
        Ok(())
    }

    fn remove_existing(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| Error::open_failed(&self.path, e))?;
            log::debug!("Removed existing file '{}'", self.path.display());
        }
        Ok(())
    }
}

/// A buffer converted to file layout, ready to be written.
struct Encoded {
    class: MatClass,
    data_type: MatType,
    payload: FormatPayload,
}

impl Encoded {
    fn var_spec<'a>(&'a self, name: &'a str, info: &'a TypeInfo) -> VarSpec<'a> {
        VarSpec {
            name,
            class: self.class,
            data_type: self.data_type,
            dims: &info.shape,
            real: &self.payload.real,
            imag: self.payload.imag.as_deref(),
        }
    }
}

fn encode(buffer: &dyn ArrayBuffer) -> Result<Encoded> {
    let info = buffer.type_info();
    let (class, data_type) = to_format_tags(info.dtype)?;

    if !info.is_valid() {
        return Err(Error::invalid_format(format!(
            "cannot store {}: arrays need 1 to {} non-empty dimensions",
            info, MAX_DIMS
        )));
    }

    Ok(Encoded {
        class,
        data_type,
        payload: to_format_layout(buffer.bytes(), info)?,
    })
}

/// Copy a variable into `buffer`, reshaping it when needed.
fn assign(var: MatVariable, buffer: &mut dyn ArrayBuffer) -> Result<()> {
    let info = type_info_of(&var.info);
    if info.dtype == ElementType::Unknown {
        return Err(Error::unsupported_type(format!(
            "{}{} (variable '{}')",
            if var.info.is_complex { "complex " } else { "" },
            var.info.class,
            var.info.name
        )));
    }

    let payload = var.payload.ok_or_else(|| {
        Error::invalid_format(format!("variable '{}' has no payload", var.info.name))
    })?;

    if !buffer.type_info().is_compatible(&info) {
        buffer.set(&info);
    }

    from_format_layout(
        &payload.real,
        payload.imag.as_deref(),
        &info,
        buffer.bytes_mut(),
    )
}
