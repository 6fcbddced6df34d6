//! Basic usage example for the slides-to-md crate
//!
//! This example demonstrates how to open a PPTX file, convert it to Markdown and print every
//! slide's fragments on the way.
//!
//! Run with: cargo run --example basic_usage <path/to/your/presentation.pptx>

use slides_to_md::{ParserConfig, PptxContainer, Result};
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    // Get the PPTX file path from command line arguments
    let args: Vec<String> = env::args().collect();
    let pptx_path = if args.len() > 1 {
        Path::new(&args[1])
    } else {
        eprintln!("Usage: cargo run --example basic_usage <path/to/presentation.pptx>");
        return Ok(());
    };

    println!("Processing PPTX file: {}", pptx_path.display());

    // Use the config builder to build your config
    let config = ParserConfig::builder()
        .include_notes(true)
        .build();

    let mut container = PptxContainer::open(pptx_path, config)?;
    println!("Found {} slides", container.slide_count);

    let name = pptx_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "presentation".to_string());
    let presentation = container.parse_presentation(&name)?;

    for (idx, slide) in presentation.slides.iter().enumerate() {
        println!("--- slide {} ({} fragments)", idx + 1, slide.fragments(idx + 1).len());
    }

    // Write the whole document next to the working directory
    let markdown = presentation.convert_to_md();
    fs::write("output.md", &markdown)?;
    println!("{}", markdown);

    Ok(())
}
