//! Codec configuration.

/// How variables are stored when written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain `miMATRIX` elements.
    #[default]
    None,

    /// zlib-compressed `miCOMPRESSED` elements (MAT v7 style), with the
    /// given level between 0 and 9.
    Zlib(u32),
}

/// Options shared by the file codec and the container writer.
///
/// # Example
///
/// ```
/// use matcodec::{CodecOptions, Compression};
///
/// let options = CodecOptions::new()
///     .compression(Compression::Zlib(6))
///     .verify_types(true)
///     .header_text("MATLAB 5.0 MAT-file, experiment 12");
///
/// assert!(options.verify_types);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodecOptions {
    /// Storage of newly written variables.
    pub compression: Compression,

    /// Give every catalog entry the type found in its own header instead of
    /// the type of the first variable.
    pub verify_types: bool,

    /// Text for the header of newly created files.
    pub header_text: Option<String>,
}

impl CodecOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression used for writes.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Enable or disable per-variable type verification in the catalog.
    pub fn verify_types(mut self, verify: bool) -> Self {
        self.verify_types = verify;
        self
    }

    /// Set the header text for new files.
    pub fn header_text(mut self, text: impl Into<String>) -> Self {
        self.header_text = Some(text.into());
        self
    }

    /// Header text to write, falling back to a description of this crate.
    pub fn resolved_header_text(&self) -> String {
        match &self.header_text {
            Some(text) => text.clone(),
            None => format!(
                "MATLAB 5.0 MAT-file, Platform: {}, Created by: matcodec {}",
                std::env::consts::OS,
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodecOptions::default();
        assert_eq!(options.compression, Compression::None);
        assert!(!options.verify_types);
        assert!(options.resolved_header_text().starts_with("MATLAB 5.0"));
    }

    #[test]
    fn test_builder() {
        let options = CodecOptions::new()
            .compression(Compression::Zlib(9))
            .header_text("MATLAB custom");
        assert_eq!(options.compression, Compression::Zlib(9));
        assert_eq!(options.resolved_header_text(), "MATLAB custom");
    }
}
