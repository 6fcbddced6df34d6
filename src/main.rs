//! Command line front end: converts every presentation in `input/` into Markdown.

use anyhow::{Context, Result};
use clap::Parser;
use slides_to_md::{interactive_setup, resolve_working_dir, ParserConfig, Workspace, CONFIG_FILE_NAME};
use std::io;
use std::path::PathBuf;

/// Extract text from PowerPoint files to Markdown.
#[derive(Parser, Debug)]
#[command(name = "slides-to-md")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Working directory containing input/, processed/ and output/ (overrides saved settings)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Run interactive setup to choose the working directory
    #[arg(long)]
    setup: bool,

    /// Keep original files in input/ instead of moving them to processed/
    #[arg(short, long)]
    keep: bool,

    /// Leave speaker notes out of the Markdown
    #[arg(long)]
    no_notes: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let program_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let config_path = program_dir.join(CONFIG_FILE_NAME);

    if args.setup {
        let stdin = io::stdin();
        interactive_setup(&mut stdin.lock(), &mut io::stdout(), &program_dir, &config_path)
            .context("Setup failed")?;
        return Ok(());
    }

    let base_dir = resolve_working_dir(Some(args.dir.as_path()), &config_path, &program_dir);
    log::info!("Working in: {}", base_dir.display());

    let workspace = Workspace::create(&base_dir)
        .with_context(|| format!("Failed to prepare folders in {}", base_dir.display()))?;

    let config = ParserConfig::builder().include_notes(!args.no_notes).build();
    let outcomes = workspace
        .process_all(args.keep, &config)
        .with_context(|| format!("Failed to read {}", workspace.input.display()))?;

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        log::warn!("{} of {} file(s) could not be converted", failed, outcomes.len());
    }
    log::info!("Done.");

    Ok(())
}
