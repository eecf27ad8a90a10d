//! The ordered list of variables held by a file.
//!
//! A [`Catalog`] is a projection of file contents: it is built by scanning
//! a file ([`Catalog::load`]) and may afterwards be patched one entry at a
//! time ([`Catalog::insert_next`]) as variables are appended. A full load
//! is authoritative; patches are only as good as the writes behind them.
//!
//! # Type caching
//!
//! Only the first variable's type is read from the file during a default
//! load. Every later variable is given that same type, which is correct
//! only when all variables share it. Set
//! [`CodecOptions::verify_types`] to derive each entry's type from its own
//! header instead.

use std::path::Path;

use crate::data_type::ElementType;
use crate::error::{Error, Result};
use crate::mat::MatReader;
use crate::options::CodecOptions;
use crate::type_info::{TypeInfo, MAX_DIMS};
use crate::typemap::type_info_of;

/// One variable of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Position in the catalog, starting at 0.
    pub id: usize,

    /// Name of the variable in the file.
    pub name: String,

    /// Descriptor of the variable.
    pub info: TypeInfo,
}

/// Ordered collection of [`CatalogEntry`] values plus the file's
/// representative type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    representative: Option<TypeInfo>,
}

impl Catalog {
    /// An empty catalog with no representative type.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A catalog holding exactly one variable, whose type becomes the
    /// representative type.
    pub fn single(name: impl Into<String>, info: TypeInfo) -> Self {
        Catalog {
            entries: vec![CatalogEntry {
                id: 0,
                name: name.into(),
                info: info.clone(),
            }],
            representative: Some(info),
        }
    }

    /// Build the catalog of an existing file.
    ///
    /// The first variable is read in full and must have a known element
    /// type, 1 to 4 dimensions and no empty dimension. Later variables are
    /// scanned header-only.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedCatalog`] if the file holds no variable or the
    ///   first variable is unusable
    /// - any error from opening or scanning the file
    pub fn load(path: &Path, options: &CodecOptions) -> Result<Self> {
        let mut reader = MatReader::open(path)?;

        let first = reader
            .next_info()?
            .ok_or_else(|| Error::malformed_catalog(path, "file holds no variables"))?;

        let representative = type_info_of(&first);
        check_representative(path, &first.name, &representative)?;

        // The first variable must also decode in full.
        reader.rewind()?;
        reader.read_next()?;

        let mut catalog = Catalog {
            entries: Vec::new(),
            representative: Some(representative.clone()),
        };
        catalog.insert_next(first.name, representative.clone());

        while let Some(info) = reader.next_info()? {
            let entry_type = if options.verify_types {
                type_info_of(&info)
            } else {
                representative.clone()
            };
            catalog.insert_next(info.name, entry_type);
        }

        log::debug!(
            "Loaded catalog of '{}': {} variables of type {}",
            path.display(),
            catalog.len(),
            representative
        );

        Ok(catalog)
    }

    /// Add an entry with the next id and return that id.
    ///
    /// Callers must only record variables that have been durably written.
    pub fn insert_next(&mut self, name: impl Into<String>, info: TypeInfo) -> usize {
        let id = self.next_id();
        let name = name.into();
        log::debug!("Catalog entry {}: '{}' ({})", id, name, info);
        self.entries.push(CatalogEntry { id, name, info });
        id
    }

    /// Id the next inserted entry will receive: one past the largest id, or
    /// 0 for an empty catalog.
    pub fn next_id(&self) -> usize {
        self.entries.last().map_or(0, |entry| entry.id + 1)
    }

    /// Get the entry at position `index`.
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type of the first variable, once known.
    pub fn representative(&self) -> Option<&TypeInfo> {
        self.representative.as_ref()
    }

    /// Iterate over entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn check_representative(path: &Path, name: &str, info: &TypeInfo) -> Result<()> {
    if info.dtype == ElementType::Unknown {
        return Err(Error::malformed_catalog(
            path,
            format!("unsupported data type ({}) for variable '{}'", info, name),
        ));
    }
    if !(1..=MAX_DIMS).contains(&info.ndim()) {
        return Err(Error::malformed_catalog(
            path,
            format!(
                "number of dimensions of variable '{}' ({}) exceeds the maximum supported ({})",
                name,
                info.ndim(),
                MAX_DIMS
            ),
        ));
    }
    if !info.is_valid() {
        return Err(Error::malformed_catalog(
            path,
            format!("variable '{}' is empty ({})", name, info),
        ));
    }
    Ok(())
}
