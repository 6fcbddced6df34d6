use super::{Error, Result, Slide};
use crate::constants::{NOTES_SLIDE_REL_TYPE, PRESENTATION_PATH, PRESENTATION_RELS_PATH, P_NAMESPACE, RELS_NAMESPACE, SLIDE_REL_TYPE};
use crate::parse_rels::{parse_slide_rels, resolve_target};
use crate::parse_xml::{parse_notes_xml, parse_slide_xml};
use crate::parser_config::ParserConfig;
use crate::presentation::Presentation;
use log::{debug, warn};
use roxmltree::Document;
use std::{collections::HashMap, fs::File, io::Read, path::Path};

/// Holds an opened PowerPoint (pptx) package.
///
/// `PptxContainer` knows the slide parts of the package in presentation order and loads them on
/// demand, either all at once ([`PptxContainer::parse_all`]) or one by one
/// ([`PptxContainer::iter_slides`]).
pub struct PptxContainer {
    pub config: ParserConfig,
    archive: zip::ZipArchive<File>,
    pub slide_paths: Vec<String>,
    pub slide_count: u32,
}

impl PptxContainer {
    /// Opens a PowerPoint pptx file and determines its slide order.
    ///
    /// The order comes from the slide id list of `ppt/presentation.xml`. Packages without that
    /// part fall back to every `ppt/slides/slideN.xml`, sorted by `N`.
    ///
    /// # Errors
    ///
    /// Errors are returned on file access problems, if the file is not a ZIP archive or if the
    /// presentation part is malformed.
    pub fn open(path: &Path, config: ParserConfig) -> Result<Self> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let slide_paths = if has_file(&archive, PRESENTATION_PATH) && has_file(&archive, PRESENTATION_RELS_PATH) {
            let presentation_xml = read_file(&mut archive, PRESENTATION_PATH)?;
            let rels_xml = read_file(&mut archive, PRESENTATION_RELS_PATH)?;
            ordered_slide_paths(&presentation_xml, &rels_xml)?
        } else {
            debug!("{} has no presentation part, scanning for slide parts", path.display());
            scanned_slide_paths(&archive)
        };

        let slide_count = slide_paths.len() as u32;
        debug!("{}: {} slides", path.display(), slide_count);

        Ok(Self { config, archive, slide_paths, slide_count })
    }

    /// Parses every slide of the presentation in order.
    ///
    /// # Note
    /// Parsing is synchronous and in-memory; the first slide that fails to parse aborts the call.
    pub fn parse_all(&mut self) -> Result<Vec<Slide>> {
        let slide_paths = self.slide_paths.clone();
        slide_paths.iter().map(|path| self.load_slide(path)).collect()
    }

    /// Parses every slide and wraps them into a [`Presentation`] called `name`.
    pub fn parse_presentation(&mut self, name: &str) -> Result<Presentation> {
        let slides = self.parse_all()?;
        Ok(Presentation::new(name, slides))
    }

    pub fn iter_slides(&mut self) -> SlideIterator<'_> {
        SlideIterator::new(self)
    }

    /// Loads and parses one slide part, including its speaker notes.
    ///
    /// Notes are best effort: any problem locating or reading the notes page is logged and the
    /// slide is treated as having no notes.
    ///
    /// # Errors
    ///
    /// * [`Error::SlideNotFound`] if the part doesn't exist in the package.
    /// * Any XML error of the slide part itself.
    pub fn load_slide(&mut self, slide_path: &str) -> Result<Slide> {
        if !has_file(&self.archive, slide_path) {
            return Err(Error::SlideNotFound(slide_path.to_string()));
        }

        let slide_data = self.read_file_from_archive(slide_path)?;
        let parsed = parse_slide_xml(&slide_data, self.config.max_group_depth)?;
        let slide_number = Slide::extract_slide_number(slide_path).unwrap_or(0);

        let notes = if self.config.include_notes {
            match self.read_notes(slide_path) {
                Ok(notes) => notes,
                Err(e) => {
                    debug!("Ignoring unreadable notes of {}: {}", slide_path, e);
                    None
                }
            }
        } else {
            None
        };

        debug!("Parsed {} ({} top level shapes)", slide_path, parsed.shapes.len());

        Ok(Slide::new(slide_path.to_string(), slide_number, parsed, notes, self.config.clone()))
    }

    /// Follows the slide's `notesSlide` relationship and returns the notes text, if any.
    fn read_notes(&mut self, slide_path: &str) -> Result<Option<String>> {
        let rels_path = self.get_slide_rels_path(slide_path);
        if !has_file(&self.archive, &rels_path) {
            return Ok(None);
        }

        let rels = parse_slide_rels(&self.read_file_from_archive(&rels_path)?)?;
        let Some(notes_rel) = rels.iter().find(|r| r.rel_type == NOTES_SLIDE_REL_TYPE && !r.external) else {
            return Ok(None);
        };

        let notes_path = resolve_target(slide_path, &notes_rel.target)?;
        let notes_data = self.read_file_from_archive(&notes_path)?;
        parse_notes_xml(&notes_data)
    }

    /// Reads a file from the PPTX archive by its internal path.
    pub fn read_file_from_archive(&mut self, path: &str) -> Result<Vec<u8>> {
        read_file(&mut self.archive, path)
    }

    /// Constructs the path to the relationships file for a given slide.
    ///
    /// # Example
    ///
    /// ```
    /// // For a slide path "ppt/slides/slide1.xml"
    /// // Returns "ppt/slides/_rels/slide1.xml.rels"
    /// ```
    pub fn get_slide_rels_path(&self, slide_path: &str) -> String {
        let mut rels_path = slide_path.to_string();
        if let Some(pos) = rels_path.rfind('/') {
            rels_path.insert_str(pos + 1, "_rels/");
        }
        rels_path.push_str(".rels");
        rels_path
    }
}

fn has_file(archive: &zip::ZipArchive<File>, path: &str) -> bool {
    archive.index_for_name(path).is_some()
}

fn read_file(archive: &mut zip::ZipArchive<File>, path: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
}

/// Resolves `<p:sldIdLst>` of the presentation part through its relationships.
fn ordered_slide_paths(presentation_xml: &[u8], rels_xml: &[u8]) -> Result<Vec<String>> {
    let targets: HashMap<String, String> = parse_slide_rels(rels_xml)?
        .into_iter()
        .filter(|rel| rel.rel_type == SLIDE_REL_TYPE)
        .map(|rel| (rel.id, rel.target))
        .collect();

    let xml_str = std::str::from_utf8(presentation_xml)?;
    let doc = Document::parse(xml_str)?;

    let Some(sld_id_lst) = doc
        .root_element()
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "sldIdLst" && n.tag_name().namespace() == Some(P_NAMESPACE))
    else {
        return Ok(Vec::new());
    };

    let mut slide_paths = Vec::new();
    for sld_id in sld_id_lst.children().filter(|n| n.is_element() && n.tag_name().name() == "sldId") {
        let Some(r_id) = sld_id.attribute((RELS_NAMESPACE, "id")) else {
            warn!("Slide id entry without relationship id, skipping");
            continue;
        };
        match targets.get(r_id) {
            Some(target) => slide_paths.push(resolve_target(PRESENTATION_PATH, target)?),
            None => warn!("Slide relationship {} is missing, skipping", r_id),
        }
    }

    Ok(slide_paths)
}

fn scanned_slide_paths(archive: &zip::ZipArchive<File>) -> Vec<String> {
    let mut slide_paths: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let rest = name.strip_prefix("ppt/slides/")?;
            if rest.contains('/') {
                return None;
            }
            Slide::extract_slide_number(name).map(|number| (number, name.to_string()))
        })
        .collect();

    slide_paths.sort();
    slide_paths.into_iter().map(|(_, name)| name).collect()
}

/// An iterator for streaming slides from a PPTX file.
///
/// This iterator allows processing slides one by one, which is more
/// memory-efficient than loading all slides at once. It iterates through
/// all slides in the presentation in order.
///
/// # Example
///
/// ```no_run
/// use slides_to_md::{ParserConfig, PptxContainer};
/// use std::path::Path;
///
/// # fn main() -> slides_to_md::Result<()> {
/// let mut container = PptxContainer::open(Path::new("presentation.pptx"), ParserConfig::default())?;
/// for (idx, slide_result) in container.iter_slides().enumerate() {
///     match slide_result {
///         Ok(slide) => println!("{}", slide.convert_to_md(idx + 1)),
///         Err(e) => eprintln!("Error: {}", e),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct SlideIterator<'a> {
    container: &'a mut PptxContainer,
    current_paths: Vec<String>,
    current_index: usize,
}

impl<'a> SlideIterator<'a> {
    fn new(container: &'a mut PptxContainer) -> Self {
        let current_paths = container.slide_paths.clone();
        Self {
            container,
            current_paths,
            current_index: 0,
        }
    }
}

impl<'a> Iterator for SlideIterator<'a> {
    type Item = Result<Slide>;

    /// Loads and parses the next slide of the presentation.
    fn next(&mut self) -> Option<Self::Item> {
        let slide_path = self.current_paths.get(self.current_index)?;
        self.current_index += 1;
        Some(self.container.load_slide(slide_path))
    }
}
