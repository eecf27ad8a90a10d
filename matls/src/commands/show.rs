//! Print array values (--show and --all modes).

use anyhow::{bail, Context, Result};
use colored::Colorize;

use matcodec::{Buffer, Element, ElementType, MatFile, Mode};

use crate::cli::Args;
use crate::output;

/// Run the show command: array `index`, or the whole-file read for `None`.
pub fn run(args: &Args, index: Option<usize>) -> Result<()> {
    let mut file = MatFile::open(&args.file, Mode::Read)
        .with_context(|| format!("Failed to open MAT file: {}", args.file.display()))?;

    let mut buffer = Buffer::default();
    let position = match index {
        Some(i) => {
            file.read(&mut buffer, i)
                .with_context(|| format!("Failed to read array {}", i))?;
            i
        }
        None => {
            file.read_all(&mut buffer)
                .context("Failed to read the first array")?;
            0
        }
    };

    let name = file
        .catalog()
        .get(position)
        .map(|entry| entry.name.clone())
        .unwrap_or_default();

    output::print_header(
        &format!("{} {}", name, buffer.info().to_string().cyan()),
        args.quiet,
    );

    let total = buffer.info().num_elements();
    let values = format_values(&buffer, args.max_elements)?;
    for (i, value) in values.iter().enumerate() {
        println!("  [{}] {}", i, value);
    }

    if total > values.len() {
        output::print_info(
            &format!(
                "  ... {} more values",
                output::format_number(total - values.len())
            )
            .dimmed()
            .to_string(),
            args.quiet,
        );
    }

    Ok(())
}

fn take<T: Element>(
    buffer: &Buffer,
    max: usize,
    format: impl Fn(&T) -> String,
) -> Result<Vec<String>> {
    Ok(buffer.to_vec::<T>()?.iter().take(max).map(format).collect())
}

fn format_complex(re: f64, im: f64) -> String {
    if im < 0.0 {
        format!("{}-{}i", re, -im)
    } else {
        format!("{}+{}i", re, im)
    }
}

/// Format the first `max` values of `buffer` in row-major order.
fn format_values(buffer: &Buffer, max: usize) -> Result<Vec<String>> {
    match buffer.info().dtype {
        ElementType::Int8 => take::<i8>(buffer, max, ToString::to_string),
        ElementType::Int16 => take::<i16>(buffer, max, ToString::to_string),
        ElementType::Int32 => take::<i32>(buffer, max, ToString::to_string),
        ElementType::Int64 => take::<i64>(buffer, max, ToString::to_string),
        ElementType::UInt8 => take::<u8>(buffer, max, ToString::to_string),
        ElementType::UInt16 => take::<u16>(buffer, max, ToString::to_string),
        ElementType::UInt32 => take::<u32>(buffer, max, ToString::to_string),
        ElementType::UInt64 => take::<u64>(buffer, max, ToString::to_string),
        ElementType::Float32 => take::<f32>(buffer, max, ToString::to_string),
        ElementType::Float64 => take::<f64>(buffer, max, ToString::to_string),
        ElementType::Complex64 => take::<[f32; 2]>(buffer, max, |&[re, im]| {
            format_complex(f64::from(re), f64::from(im))
        }),
        ElementType::Complex128 => {
            take::<[f64; 2]>(buffer, max, |&[re, im]| format_complex(re, im))
        }
        other => bail!("cannot print values of type {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_values_truncates() {
        let buffer = Buffer::from_elements(vec![2, 3], &[1i16, -2, 3, -4, 5, -6]).unwrap();
        assert_eq!(format_values(&buffer, 4).unwrap(), ["1", "-2", "3", "-4"]);
    }

    #[test]
    fn test_format_complex_values() {
        let buffer = Buffer::from_elements(vec![2], &[[1.5f64, -2.0], [0.0, 3.0]]).unwrap();
        assert_eq!(format_values(&buffer, 10).unwrap(), ["1.5-2i", "0+3i"]);
    }
}
