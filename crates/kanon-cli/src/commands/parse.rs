//! Parse command - show the structured form of image references

use console::style;
use kanon_core::ImageReference;

use crate::display::{self, OutputFormat};
use crate::error::{CliError, Result};

pub fn run(references: &[String], format: OutputFormat) -> Result<()> {
    let mut parsed = Vec::with_capacity(references.len());
    let mut failed = 0;

    for reference in references {
        match ImageReference::parse(reference) {
            Ok(image) => {
                if format == OutputFormat::Text {
                    display::print_reference(reference, &image);
                }
                parsed.push(image);
            }
            Err(err) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), reference, err);
            }
        }
    }

    if format != OutputFormat::Text {
        println!("{}", display::render(&parsed, format)?);
    }

    if failed > 0 {
        return Err(CliError::Parse {
            failed,
            total: references.len(),
        });
    }
    Ok(())
}
