//! The 128-byte level-5 file header and container levels.

use crate::error::{Error, Result};

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 128;

/// Length of the descriptive text field.
pub const HEADER_TEXT_SIZE: usize = 116;

/// Version number of level-5 files.
pub const VERSION_5: u16 = 0x0100;

/// Version number written by MATLAB for HDF5-based (v7.3) files.
const VERSION_73: u16 = 0x0200;

/// Container level of a MAT file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Level 4: no file header, a sequence of fixed 20-byte matrix headers.
    V4,
    /// Level 5: 128-byte header followed by tagged data elements.
    V5,
}

/// Byte order of a MAT file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Little-endian, indicator bytes `"IM"`.
    Little,
    /// Big-endian, indicator bytes `"MI"`.
    Big,
}

impl Endian {
    /// Byte order of the running host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// Decode a `u16` in this byte order.
    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        }
    }

    /// Decode a `u32` in this byte order.
    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        }
    }

    /// Decode an `i32` in this byte order.
    pub fn i32(self, bytes: [u8; 4]) -> i32 {
        match self {
            Endian::Little => i32::from_le_bytes(bytes),
            Endian::Big => i32::from_be_bytes(bytes),
        }
    }
}

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Descriptive text, trailing padding removed.
    pub text: String,

    /// Format version, [`VERSION_5`] for every file this crate accepts.
    pub version: u16,

    /// Byte order of every multi-byte value in the file.
    pub endian: Endian,
}

impl Header {
    /// A header for a new file written by this host.
    pub fn new(text: impl Into<String>) -> Self {
        Header {
            text: text.into(),
            version: VERSION_5,
            endian: Endian::native(),
        }
    }

    /// Parse and validate a raw header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for level-4 files, HDF5-based v7.3
    /// files, and anything without a valid endian indicator.
    pub fn parse(raw: &[u8; HEADER_SIZE]) -> Result<Self> {
        let endian = match &raw[126..128] {
            b"IM" => Endian::Little,
            b"MI" => Endian::Big,
            _ => {
                return Err(Error::invalid_format(
                    "missing endian indicator, not a level-5 MAT file",
                ))
            }
        };

        if !raw.starts_with(b"MATLAB") {
            return Err(Error::invalid_format(
                "header text does not start with 'MATLAB'",
            ));
        }

        let version = endian.u16([raw[124], raw[125]]);
        match version {
            VERSION_5 => {}
            VERSION_73 => {
                return Err(Error::invalid_format(
                    "HDF5-based (v7.3) MAT files are not supported",
                ))
            }
            other => {
                return Err(Error::invalid_format(format!(
                    "unsupported MAT file version 0x{:04X}",
                    other
                )))
            }
        }

        let text = String::from_utf8_lossy(&raw[..HEADER_TEXT_SIZE])
            .trim_end_matches(&[' ', '\0'][..])
            .to_string();

        Ok(Header {
            text,
            version,
            endian,
        })
    }

    /// Encode the header. Text longer than the field is truncated.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut raw = [b' '; HEADER_SIZE];

        let text = self.text.as_bytes();
        let len = text.len().min(HEADER_TEXT_SIZE);
        raw[..len].copy_from_slice(&text[..len]);

        // Subsystem data offset: unused
        raw[116..124].fill(0);

        let (version, indicator) = match self.endian {
            Endian::Little => (self.version.to_le_bytes(), *b"IM"),
            Endian::Big => (self.version.to_be_bytes(), *b"MI"),
        };
        raw[124..126].copy_from_slice(&version);
        raw[126..128].copy_from_slice(&indicator);

        raw
    }
}
