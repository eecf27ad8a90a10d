//! List the variable catalog (default mode).

use anyhow::{Context, Result};
use colored::Colorize;

use matcodec::{MatFile, Mode};

use crate::cli::Args;
use crate::output;

/// Run the list command.
pub fn run(args: &Args) -> Result<()> {
    log::debug!("Opening MAT file: {}", args.file.display());

    let file = MatFile::open(&args.file, Mode::Read)
        .with_context(|| format!("Failed to open MAT file: {}", args.file.display()))?;

    if file.size() == 0 {
        output::print_warning("No arrays found in MAT file");
        return Ok(());
    }

    output::print_header(
        &format!("Arrays in '{}':", args.file.display()),
        args.quiet,
    );
    output::print_info("", args.quiet);

    // Calculate column widths
    let catalog = file.catalog();
    let max_name = catalog.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);
    let max_id = catalog.len().saturating_sub(1).to_string().len().max(2);

    // Print header row
    output::print_info(
        &format!(
            "  {:>id_width$}  {:<width$}  {}",
            "Id",
            "Name",
            "Type",
            id_width = max_id,
            width = max_name
        ),
        args.quiet,
    );
    output::print_info(
        &format!(
            "  {:->id_width$}  {:-<width$}  ----",
            "",
            "",
            id_width = max_id,
            width = max_name
        ),
        args.quiet,
    );

    for entry in catalog {
        println!(
            "  {:>id_width$}  {:<width$}  {}",
            entry.id,
            entry.name,
            entry.info,
            id_width = max_id,
            width = max_name
        );
    }

    // Print summary
    output::print_info("", args.quiet);
    let representative = file
        .type_info()
        .map(|info| info.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    output::print_info(
        &format!(
            "{} arrays, representative type {}",
            output::format_number(file.size()),
            representative.cyan()
        ),
        args.quiet,
    );

    Ok(())
}
