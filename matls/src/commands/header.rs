//! Print the file header (--header).

use anyhow::{Context, Result};

use matcodec::mat::{Endian, Level, MatReader};

use crate::cli::Args;
use crate::output;

/// Run the header command.
pub fn run(args: &Args) -> Result<()> {
    let reader = MatReader::open(&args.file)
        .with_context(|| format!("Failed to read header of {}", args.file.display()))?;

    let size = std::fs::metadata(&args.file)
        .map(|m| output::format_size(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());

    output::print_header("Header", args.quiet);
    match (reader.level(), reader.header()) {
        (Level::V5, Some(header)) => {
            output::print_kv("Format", "level 5", 2);
            output::print_kv("Text", &header.text, 2);
            output::print_kv("Version", &format!("0x{:04X}", header.version), 2);
        }
        _ => output::print_kv("Format", "level 4 (no file header)", 2),
    }
    output::print_kv(
        "Byte order",
        match reader.endian() {
            Endian::Little => "little-endian",
            Endian::Big => "big-endian",
        },
        2,
    );
    output::print_kv("Size", &size, 2);
    output::print_info("", args.quiet);

    Ok(())
}
