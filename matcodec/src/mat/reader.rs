//! Sequential reading of MAT files.
//!
//! [`MatReader`] walks the variables of a file in order. It offers a cheap
//! metadata-only step ([`next_info`](MatReader::next_info)) that skips over
//! payloads, a full step ([`read_next`](MatReader::read_next)), and lookup
//! by variable name ([`read_named`](MatReader::read_named)). Level-5 files
//! and headerless level-4 files are both recognized on open.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;

use super::data::{read_payload, Payload};
use super::header::{Endian, Header, Level, HEADER_SIZE};
use super::level4;
use super::tags::{MatClass, MatType, FLAG_COMPLEX, FLAG_LOGICAL};
use crate::error::{Error, Result};

/// Metadata of one variable, as found in its array header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarInfo {
    /// Variable name.
    pub name: String,

    /// Array class.
    pub class: MatClass,

    /// Whether an imaginary part is stored.
    pub is_complex: bool,

    /// Whether the array is flagged as logical.
    pub is_logical: bool,

    /// Dimensions, as stored (column-major meaning, same order as the host shape).
    pub dims: Vec<usize>,

    /// Whether the variable sits in a compressed element.
    pub compressed: bool,
}

impl VarInfo {
    /// Data type of the values once loaded; see [`MatClass::data_type`].
    pub fn data_type(&self) -> MatType {
        self.class.data_type()
    }
}

/// A fully read variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatVariable {
    /// Array header.
    pub info: VarInfo,

    /// Decoded payload, `None` for non-numeric classes.
    pub payload: Option<Payload>,
}

/// A located variable: where its element starts and what it holds.
struct RawElement {
    start: u64,
    info: VarInfo,
    payload: Option<Payload>,
}

/// Reader over the variables of one MAT file.
///
/// # Example
///
/// ```no_run
/// use matcodec::mat::MatReader;
///
/// let mut reader = MatReader::open("data.mat")?;
/// while let Some(info) = reader.next_info()? {
///     println!("{}: {} {:?}", info.name, info.class, info.dims);
/// }
/// # Ok::<(), matcodec::Error>(())
/// ```
#[derive(Debug)]
pub struct MatReader {
    reader: BufReader<File>,
    path: PathBuf,
    level: Level,
    endian: Endian,
    header: Option<Header>,
    data_start: u64,
}

impl MatReader {
    /// Open a file and recognize its container level.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the file does not exist
    /// - [`Error::OpenFailed`] if it cannot be opened
    /// - [`Error::InvalidFormat`] if it is neither a level-5 nor a level-4
    ///   MAT file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::not_found(format!("file '{}'", path.display())),
            _ => Error::open_failed(path, e),
        })?;

        let mut reader = BufReader::new(file);
        let mut lead = Vec::with_capacity(HEADER_SIZE);
        (&mut reader).take(HEADER_SIZE as u64).read_to_end(&mut lead)?;

        let level5 = <[u8; HEADER_SIZE]>::try_from(lead.as_slice())
            .ok()
            .map(|raw| Header::parse(&raw));

        let (level, endian, header, data_start) = match level5 {
            Some(Ok(header)) => (Level::V5, header.endian, Some(header), HEADER_SIZE as u64),
            rejected => match level4::detect(&lead) {
                Some(endian) => (Level::V4, endian, None, 0),
                None => {
                    return Err(match rejected {
                        Some(Err(e)) => e,
                        _ => Error::invalid_format(format!(
                            "'{}' is not a MAT file",
                            path.display()
                        )),
                    })
                }
            },
        };

        reader.seek(SeekFrom::Start(data_start))?;
        log::debug!("Opened {:?} MAT file '{}'", level, path.display());

        Ok(MatReader {
            reader,
            path: path.to_path_buf(),
            level,
            endian,
            header,
            data_start,
        })
    }

    /// Get the level-5 file header, `None` for level-4 files.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Get the container level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Get the byte order of the file.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Go back to the first variable.
    pub fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(self.data_start))?;
        Ok(())
    }

    /// Read the header of the next variable and skip its payload.
    ///
    /// Returns `None` at the end of the file.
    pub fn next_info(&mut self) -> Result<Option<VarInfo>> {
        Ok(self.next_element(false)?.map(|element| element.info))
    }

    /// Read the next variable, payload included.
    ///
    /// Returns `None` at the end of the file.
    pub fn read_next(&mut self) -> Result<Option<MatVariable>> {
        Ok(self.next_element(true)?.map(|element| self.variable(element)))
    }

    /// Read the first variable called `name`, scanning from the start of
    /// the file. Returns `None` if no such variable exists.
    pub fn read_named(&mut self, name: &str) -> Result<Option<MatVariable>> {
        self.rewind()?;

        while let Some(element) = self.next_element(false)? {
            if element.info.name == name {
                self.reader.seek(SeekFrom::Start(element.start))?;
                return Ok(self.next_element(true)?.map(|element| self.variable(element)));
            }
        }

        Ok(None)
    }

    fn variable(&self, element: RawElement) -> MatVariable {
        if element.payload.is_none() {
            log::debug!(
                "Variable '{}' in '{}' has non-numeric class {}; payload not decoded",
                element.info.name,
                self.path.display(),
                element.info.class
            );
        }

        MatVariable {
            info: element.info,
            payload: element.payload,
        }
    }

    fn next_element(&mut self, with_payload: bool) -> Result<Option<RawElement>> {
        match self.level {
            Level::V4 => {
                let start = self.reader.stream_position()?;
                Ok(level4::read_matrix(&mut self.reader, with_payload)?
                    .map(|(info, payload)| RawElement {
                        start,
                        info,
                        payload,
                    }))
            }
            Level::V5 => self.next_level5_element(with_payload),
        }
    }

    /// Frame the next variable element, skipping anything that is not one.
    fn next_level5_element(&mut self, with_payload: bool) -> Result<Option<RawElement>> {
        let endian = self.endian;

        loop {
            let start = self.reader.stream_position()?;

            let mut tag = [0u8; 8];
            if !read_or_eof(&mut self.reader, &mut tag)? {
                return Ok(None);
            }

            let ty = MatType::from_raw(endian.u32(word(&tag, 0)));
            let nbytes = u64::from(endian.u32(word(&tag, 4)));

            match ty {
                MatType::Matrix => {
                    let end = start + 8 + nbytes + padding(nbytes);
                    let (info, payload) = read_array(
                        &mut (&mut self.reader).take(nbytes),
                        endian,
                        false,
                        with_payload,
                    )?;
                    self.reader.seek(SeekFrom::Start(end))?;
                    return Ok(Some(RawElement {
                        start,
                        info,
                        payload,
                    }));
                }
                MatType::Compressed => {
                    let mut body = vec![0u8; to_usize(nbytes)?];
                    self.reader.read_exact(&mut body).map_err(truncated)?;
                    let (info, payload) = read_array(
                        &mut ZlibDecoder::new(&body[..]),
                        endian,
                        true,
                        with_payload,
                    )?;
                    return Ok(Some(RawElement {
                        start,
                        info,
                        payload,
                    }));
                }
                other => {
                    log::warn!(
                        "Skipping top-level element of type {:?} at offset {} in '{}'",
                        other,
                        start,
                        self.path.display()
                    );
                    self.reader
                        .seek(SeekFrom::Start(start + 8 + nbytes + padding(nbytes)))?;
                }
            }
        }
    }
}

/// Read an array header and, if requested and numeric, its payload.
fn read_array<R: Read>(
    r: &mut R,
    endian: Endian,
    wrapped: bool,
    with_payload: bool,
) -> Result<(VarInfo, Option<Payload>)> {
    let info = parse_array_header(r, endian, wrapped)?;
    let payload = if with_payload && info.class.is_numeric() {
        Some(read_payload(r, endian, &info)?)
    } else {
        None
    };
    Ok((info, payload))
}

/// Parse flags, dimensions and name of an array.
///
/// `wrapped` is set when reading from an inflated `miCOMPRESSED` stream,
/// which starts with its own `miMATRIX` tag.
fn parse_array_header<R: Read>(r: &mut R, endian: Endian, wrapped: bool) -> Result<VarInfo> {
    if wrapped {
        let mut tag = [0u8; 8];
        r.read_exact(&mut tag).map_err(truncated)?;
        if MatType::from_raw(endian.u32(word(&tag, 0))) != MatType::Matrix {
            return Err(Error::invalid_format(
                "compressed element does not contain an array",
            ));
        }
    }

    let (ty, flags) = read_subelement(r, endian)?;
    if ty != MatType::UInt32 || flags.len() < 8 {
        return Err(Error::invalid_format("malformed array flags subelement"));
    }
    let flags = endian.u32(word(&flags, 0));

    let (ty, raw_dims) = read_subelement(r, endian)?;
    if ty != MatType::Int32 || raw_dims.len() % 4 != 0 {
        return Err(Error::invalid_format("malformed dimensions subelement"));
    }
    let dims = raw_dims
        .chunks_exact(4)
        .map(|chunk| {
            let d = endian.i32(word(chunk, 0));
            usize::try_from(d)
                .map_err(|_| Error::invalid_format(format!("negative dimension {}", d)))
        })
        .collect::<Result<Vec<_>>>()?;

    let (ty, name) = read_subelement(r, endian)?;
    if ty != MatType::Int8 && ty != MatType::UInt8 && ty != MatType::Utf8 {
        return Err(Error::invalid_format("malformed array name subelement"));
    }

    Ok(VarInfo {
        name: String::from_utf8_lossy(&name).into_owned(),
        class: MatClass::from_raw(flags & 0xFF),
        is_complex: flags & FLAG_COMPLEX != 0,
        is_logical: flags & FLAG_LOGICAL != 0,
        dims,
        compressed: wrapped,
    })
}

/// Read one subelement, in either the regular or the small (4-byte) form.
pub(super) fn read_subelement<R: Read>(r: &mut R, endian: Endian) -> Result<(MatType, Vec<u8>)> {
    let mut tag = [0u8; 8];
    r.read_exact(&mut tag).map_err(truncated)?;

    let first = endian.u32(word(&tag, 0));
    let small_len = (first >> 16) as usize;
    if small_len != 0 {
        if small_len > 4 {
            return Err(Error::invalid_format("small data element longer than 4 bytes"));
        }
        return Ok((MatType::from_raw(first & 0xFFFF), tag[4..4 + small_len].to_vec()));
    }

    let nbytes = u64::from(endian.u32(word(&tag, 4)));
    let mut data = vec![0u8; to_usize(nbytes)?];
    r.read_exact(&mut data).map_err(truncated)?;

    let pad = padding(nbytes);
    let skipped = io::copy(&mut r.take(pad), &mut io::sink())?;
    if skipped != pad {
        return Err(Error::invalid_format("truncated data element padding"));
    }

    Ok((MatType::from_raw(first), data))
}

/// Fill `buf`, returning `false` on a clean end of file.
pub(super) fn read_or_eof<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    match filled {
        0 => Ok(false),
        n if n == buf.len() => Ok(true),
        _ => Err(Error::invalid_format("truncated element header")),
    }
}

/// Bytes needed to pad `nbytes` to an 8-byte boundary.
pub(crate) fn padding(nbytes: u64) -> u64 {
    (8 - nbytes % 8) % 8
}

pub(super) fn word(bytes: &[u8], at: usize) -> [u8; 4] {
    let mut w = [0u8; 4];
    w.copy_from_slice(&bytes[at..at + 4]);
    w
}

fn to_usize(n: u64) -> Result<usize> {
    usize::try_from(n).map_err(|_| Error::invalid_format("data element too large"))
}

pub(super) fn truncated(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::invalid_format("truncated data element"),
        _ => Error::Io(e),
    }
}
