//! Display formatting for CLI output

use clap::ValueEnum;
use console::style;
use kanon_core::ImageReference;
use kanon_kube::{CollectError, ImageInventory};
use serde::Serialize;

use crate::error::Result;

/// Output format for structured results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Serialize `value` as JSON or YAML
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Json | OutputFormat::Text => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// One line per image, grouped by container list
pub fn print_inventory(title: &str, inventory: &ImageInventory) {
    println!("{} {}", style("→").blue(), style(title).bold());
    if inventory.is_empty() {
        println!("  {}", style("no images").dim());
        return;
    }

    for (list, name, image) in inventory.iter() {
        println!(
            "  {} {} {}",
            style(format!("{}/{}", list, name)).cyan(),
            style("→").dim(),
            image
        );
        println!("      {}", style(&image.json_path).dim());
    }
}

/// Structured breakdown of a single reference
pub fn print_reference(input: &str, image: &ImageReference) {
    println!("{} {}", style("✓").green(), style(input).bold());
    println!("  canonical: {}", image);
    println!("  registry:  {}", image.registry);
    println!("  path:      {}", image.path);
    println!("  name:      {}", image.name);
    if !image.tag.is_empty() {
        println!("  tag:       {}", image.tag);
    }
    if !image.digest.is_empty() {
        println!("  digest:    {}", image.digest);
    }
}

/// Report per-container failures on stderr
pub fn warn_extraction(source: &str, err: &CollectError) {
    for failure in err.errors() {
        eprintln!(
            "{} {}: {}",
            style("⚠").yellow(),
            source,
            failure
        );
    }
}
