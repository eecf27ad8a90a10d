//! Check cached catalog types against the types stored in the file.

use anyhow::{bail, Context, Result};
use colored::Colorize;

use matcodec::{CodecOptions, MatFile, Mode};

use crate::cli::Args;
use crate::output;

/// Run the verify command.
pub fn run(args: &Args) -> Result<()> {
    let cached = MatFile::open(&args.file, Mode::Read)
        .with_context(|| format!("Failed to open MAT file: {}", args.file.display()))?;

    let options = CodecOptions::new().verify_types(true);
    let verified = MatFile::with_options(&args.file, Mode::Read, options)
        .with_context(|| format!("Failed to scan MAT file: {}", args.file.display()))?;

    output::print_header(
        &format!("Type check of '{}':", args.file.display()),
        args.quiet,
    );

    let mut mismatches = 0;
    for (entry, stored) in cached.catalog().iter().zip(verified.catalog()) {
        if entry.info != stored.info {
            mismatches += 1;
            println!(
                "  {:>4}  {}  cached {}  stored {}",
                stored.id,
                stored.name,
                entry.info.to_string().yellow(),
                stored.info.to_string().red()
            );
        }
    }

    if mismatches > 0 {
        bail!(
            "{} of {} arrays differ from the representative type",
            mismatches,
            verified.size()
        );
    }

    let representative = verified
        .type_info()
        .map(|info| info.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    output::print_success(
        &format!(
            "All {} arrays are {}",
            output::format_number(verified.size()),
            representative
        ),
        args.quiet,
    );

    Ok(())
}
