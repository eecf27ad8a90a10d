//! Command-line argument definitions using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Inspect MATLAB .mat files as ordered collections of arrays.
///
/// matls lists the variable catalog of a MAT file the way the
/// matcodec library sees it, and can check cached types, dump array
/// values, or print the file header.
#[derive(Parser, Debug)]
#[command(name = "matls")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Args {
    /// Input .mat file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    // ========================================================================
    // Mode Selection
    // ========================================================================
    /// Compare each variable's stored type with the cached catalog type
    ///
    /// Exits with status 1 if any variable differs.
    #[arg(long, conflicts_with_all = ["show", "all"])]
    pub verify: bool,

    /// Print the values of the array at catalog position N
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,

    /// Print the values of the array returned by a whole-file read
    #[arg(long, conflicts_with = "show")]
    pub all: bool,

    /// Print the file header before anything else
    #[arg(long)]
    pub header: bool,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Maximum number of values printed by --show and --all
    #[arg(long, value_name = "K", default_value = "16")]
    pub max_elements: usize,

    /// Show debug logging from the codec
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress headings, summaries and codec warnings
    #[arg(short, long)]
    pub quiet: bool,
}

/// What the invocation asks for, besides the optional header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print the catalog.
    List,
    /// Check cached types against stored types.
    Verify,
    /// Print one array by position.
    Show(usize),
    /// Print the whole-file read.
    ShowAll,
}

impl Args {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        if !self.file.exists() {
            return Err(format!("Input file not found: {}", self.file.display()));
        }

        // Quiet and verbose are mutually exclusive
        if self.quiet && self.verbose {
            return Err("Cannot use both --quiet and --verbose".to_string());
        }

        Ok(())
    }

    /// Selected action.
    pub fn action(&self) -> Action {
        if self.verify {
            Action::Verify
        } else if let Some(index) = self.show {
            Action::Show(index)
        } else if self.all {
            Action::ShowAll
        } else {
            Action::List
        }
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Example usage shown in --help.
const EXAMPLES: &str = r#"
EXAMPLES:
    # List the arrays of a file
    matls frames.mat

    # Check that every array really has the cached type
    matls --verify frames.mat

    # Print the first 8 values of array 3
    matls --show 3 --max-elements 8 frames.mat

    # Print the header, then the whole-file read
    matls --header --all frames.mat

    # Show what the codec does while scanning
    matls -v frames.mat
"#;
