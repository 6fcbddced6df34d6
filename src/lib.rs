mod constants;
mod container;
mod markdown;
mod parse_rels;
mod parse_xml;
mod parser_config;
mod presentation;
mod settings;
mod slide;
mod types;
mod workspace;

pub use container::{PptxContainer, SlideIterator};
pub use markdown::{extract_shape_text, format_notes, format_paragraph, join_fragments, render_table};
pub use parse_rels::{parse_slide_rels, resolve_target, Relationship};
pub use parse_xml::{parse_notes_xml, parse_slide_xml, ParsedSlide};
pub use parser_config::{ParserConfig, ParserConfigBuilder};
pub use presentation::Presentation;
pub use settings::{default_locations, interactive_setup, resolve_working_dir, Settings, CONFIG_FILE_NAME};
pub use slide::Slide;
pub use types::*;
pub use workspace::{convert_file, FileOutcome, Workspace};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Slide not found: {0}")]
    SlideNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
