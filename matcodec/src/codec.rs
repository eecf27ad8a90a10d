//! Codec registration.
//!
//! Hosts deal with array files through the [`ArrayFile`] trait and pick an
//! implementation by file extension through a [`CodecRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use matcodec::{Buffer, CodecRegistry};
//!
//! let registry = CodecRegistry::default();
//! let mut file = registry.open("results.mat", 'a')?;
//! file.append(&Buffer::from_elements(vec![3], &[1u8, 2, 3])?)?;
//! println!("{} now holds {} arrays", file.filename().display(), file.size());
//! # Ok::<(), matcodec::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::buffer::ArrayBuffer;
use crate::error::{Error, Result};
use crate::file::{MatFile, Mode};
use crate::type_info::TypeInfo;

/// Name reported by the `.mat` codec.
pub const MAT_CODEC_NAME: &str = "matlab.mat5";

/// Operations every array file codec provides.
pub trait ArrayFile {
    /// Path the codec is bound to.
    fn filename(&self) -> &Path;

    /// Type of a single array read with [`read`](Self::read).
    fn type_info(&self) -> Option<&TypeInfo>;

    /// Type of the array produced by [`read_all`](Self::read_all).
    fn type_all(&self) -> Option<&TypeInfo>;

    /// Number of arrays in the file.
    fn size(&self) -> usize;

    /// Name of the codec.
    fn name(&self) -> &'static str;

    /// Read the whole file into `buffer`.
    fn read_all(&mut self, buffer: &mut dyn ArrayBuffer) -> Result<()>;

    /// Read the array at `index` into `buffer`.
    fn read(&mut self, buffer: &mut dyn ArrayBuffer, index: usize) -> Result<()>;

    /// Append an array, returning its index.
    fn append(&mut self, buffer: &dyn ArrayBuffer) -> Result<usize>;

    /// Replace the file contents with a single array.
    fn write(&mut self, buffer: &dyn ArrayBuffer) -> Result<()>;
}

impl ArrayFile for MatFile {
    fn filename(&self) -> &Path {
        self.path()
    }

    fn type_info(&self) -> Option<&TypeInfo> {
        MatFile::type_info(self)
    }

    fn type_all(&self) -> Option<&TypeInfo> {
        MatFile::type_info(self)
    }

    fn size(&self) -> usize {
        MatFile::size(self)
    }

    fn name(&self) -> &'static str {
        MAT_CODEC_NAME
    }

    fn read_all(&mut self, buffer: &mut dyn ArrayBuffer) -> Result<()> {
        MatFile::read_all(self, buffer)
    }

    fn read(&mut self, buffer: &mut dyn ArrayBuffer, index: usize) -> Result<()> {
        MatFile::read(self, buffer, index)
    }

    fn append(&mut self, buffer: &dyn ArrayBuffer) -> Result<usize> {
        MatFile::append(self, buffer)
    }

    fn write(&mut self, buffer: &dyn ArrayBuffer) -> Result<()> {
        MatFile::write(self, buffer)
    }
}

/// Constructor of a codec session.
pub type CodecFactory = fn(&Path, Mode) -> Result<Box<dyn ArrayFile>>;

fn make_mat_file(path: &Path, mode: Mode) -> Result<Box<dyn ArrayFile>> {
    Ok(Box::new(MatFile::open(path, mode)?))
}

#[derive(Clone)]
struct Registration {
    description: String,
    factory: CodecFactory,
}

/// Codecs by file extension.
///
/// Extensions are matched case-insensitively and include the leading dot.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: BTreeMap<String, Registration>,
}

impl CodecRegistry {
    /// A registry without any codec.
    pub fn new() -> Self {
        CodecRegistry {
            codecs: BTreeMap::new(),
        }
    }

    /// Register `factory` for `extension`, replacing any previous codec.
    ///
    /// Returns `false` if a codec was replaced.
    pub fn register(
        &mut self,
        extension: &str,
        description: impl Into<String>,
        factory: CodecFactory,
    ) -> bool {
        let key = normalize_extension(extension);
        let previous = self.codecs.insert(
            key.clone(),
            Registration {
                description: description.into(),
                factory,
            },
        );
        if previous.is_some() {
            log::warn!("Replacing codec registered for '{}'", key);
        }
        previous.is_none()
    }

    /// Registered extensions and their descriptions, in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codecs
            .iter()
            .map(|(ext, reg)| (ext.as_str(), reg.description.as_str()))
    }

    /// Check if a codec handles `extension`.
    pub fn supports(&self, extension: &str) -> bool {
        self.codecs.contains_key(&normalize_extension(extension))
    }

    /// Open `path` with the codec registered for its extension.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMode`] for an unknown mode character
    /// - [`Error::NoCodec`] if no codec handles the extension
    /// - any error from the codec itself
    pub fn open(&self, path: impl AsRef<Path>, mode: char) -> Result<Box<dyn ArrayFile>> {
        let path = path.as_ref();
        let mode = Mode::from_char(mode)?;

        let extension = path
            .extension()
            .map(|ext| normalize_extension(&ext.to_string_lossy()))
            .unwrap_or_default();

        let registration = self
            .codecs
            .get(&extension)
            .ok_or_else(|| Error::NoCodec {
                extension: extension.clone(),
            })?;

        (registration.factory)(path, mode)
    }
}

impl Default for CodecRegistry {
    /// A registry with the `.mat` codec.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(".mat", "Matlab binary files (v4 and superior)", make_mat_file);
        registry
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.extensions()).finish()
    }
}

fn normalize_extension(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
