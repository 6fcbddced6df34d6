use crate::container::PptxContainer;
use crate::parser_config::ParserConfig;
use crate::{Error, Result};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// The folder layout the converter works in: presentations are picked up from `input/`, their
/// Markdown is written to `output/` and converted sources are moved to `processed/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub input: PathBuf,
    pub processed: PathBuf,
    pub output: PathBuf,
}

/// Result of converting one presentation.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    /// Path of the written Markdown file.
    pub result: Result<PathBuf>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Converts a single presentation file into Markdown.
///
/// The file stem is used as the document title.
pub fn convert_file(path: &Path, config: &ParserConfig) -> Result<String> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(Error::ParseError("file name is not valid UTF-8"))?;

    let mut container = PptxContainer::open(path, config.clone())?;
    let presentation = container.parse_presentation(name)?;
    Ok(presentation.convert_to_md())
}

fn is_presentation(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"));
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pptx"));

    path.is_file() && has_extension && !is_lock_file
}

/// Moves a file, copying across file systems when a rename isn't possible.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}

impl Workspace {
    /// Creates `input/`, `processed/` and `output/` below `base_dir` where missing.
    pub fn create(base_dir: &Path) -> Result<Workspace> {
        let workspace = Workspace {
            input: base_dir.join("input"),
            processed: base_dir.join("processed"),
            output: base_dir.join("output"),
        };

        for folder in [&workspace.input, &workspace.processed, &workspace.output] {
            if folder.is_dir() {
                debug!("Verified folder: {}", folder.display());
            } else {
                fs::create_dir_all(folder)?;
                info!("Created folder: {}", folder.display());
            }
        }

        Ok(workspace)
    }

    /// Lists the presentations waiting in `input/`, sorted by file name.
    ///
    /// The extension is matched case-insensitively and Office lock files (`~$...`) are skipped.
    pub fn pending_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.input)? {
            let path = entry?.path();
            if is_presentation(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Converts every pending presentation, one after another.
    ///
    /// A failing file is logged and recorded in its [`FileOutcome`]; the remaining files are
    /// still processed. Unless `keep` is set, converted sources are moved to `processed/`.
    ///
    /// # Errors
    ///
    /// Only failing to list `input/` is an error of the whole run.
    pub fn process_all(&self, keep: bool, config: &ParserConfig) -> Result<Vec<FileOutcome>> {
        let files = self.pending_files()?;
        if files.is_empty() {
            info!("No PPTX files found in {}", self.input.display());
            return Ok(Vec::new());
        }

        info!("Found {} PPTX file(s) to process", files.len());

        let mut outcomes = Vec::with_capacity(files.len());
        for source in files {
            let name = source.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            info!("Processing: {}", name);

            let result = self.process_file(&source, keep, config);
            match &result {
                Ok(output) => info!("  -> {}", output.display()),
                Err(e) => error!("{}: {}", name, e),
            }
            outcomes.push(FileOutcome { source, result });
        }

        Ok(outcomes)
    }

    fn process_file(&self, source: &Path, keep: bool, config: &ParserConfig) -> Result<PathBuf> {
        let markdown = convert_file(source, config)?;

        let stem = source.file_stem().unwrap_or_default().to_string_lossy();
        let output = self.output.join(format!("{}.md", stem));
        fs::write(&output, markdown)?;

        if keep {
            debug!("  (original kept in input)");
        } else if let Some(file_name) = source.file_name() {
            move_file(source, &self.processed.join(file_name))?;
            debug!("  -> moved to processed/");
        }

        Ok(output)
    }
}
