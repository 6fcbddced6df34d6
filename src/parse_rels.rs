use crate::{Error, Result};
use roxmltree::Document;

/// A single `<Relationship>` entry of a package relationships part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Parses relationship (`.rels`) XML data, extracting every relationship entry.
///
/// Relationships map resource IDs (`rId1`, ...) to their target parts. Callers filter the
/// result by [`Relationship::rel_type`], e.g. to find the slides of a presentation or the notes
/// page of a slide.
///
/// # Arguments
///
/// - `xml_data`: Raw relationship XML data as a byte slice.
///
/// # Errors
///
/// An error is returned if:
/// - The XML data is not valid UTF-8.
/// - Malformed or invalid XML structure is detected.
pub fn parse_slide_rels(xml_data: &[u8]) -> Result<Vec<Relationship>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let mut relationships = Vec::new();
    for rel in root.children().filter(|n| n.is_element() && n.tag_name().name() == "Relationship") {
        let (Some(id), Some(rel_type), Some(target)) =
            (rel.attribute("Id"), rel.attribute("Type"), rel.attribute("Target"))
        else {
            continue;
        };

        relationships.push(Relationship {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: rel.attribute("TargetMode") == Some("External"),
        });
    }

    Ok(relationships)
}

/// Resolves a relationship target against the part that owns the relationship.
///
/// Absolute targets (`/ppt/slides/slide1.xml`) are taken from the package root, relative ones
/// from the directory of `base_part`. `.` and `..` segments are normalised.
///
/// # Example
///
/// ```
/// use slides_to_md::resolve_target;
///
/// assert_eq!(
///     resolve_target("ppt/slides/slide1.xml", "../notesSlides/notesSlide1.xml").unwrap(),
///     "ppt/notesSlides/notesSlide1.xml"
/// );
/// ```
pub fn resolve_target(base_part: &str, target: &str) -> Result<String> {
    let mut segments: Vec<&str> = Vec::new();

    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(segments, absolute);
    }

    if let Some((dir, _)) = base_part.rsplit_once('/') {
        segments.extend(dir.split('/').filter(|s| !s.is_empty()));
    }
    normalize(segments, target)
}

fn normalize<'a>(mut segments: Vec<&'a str>, target: &'a str) -> Result<String> {
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments
                    .pop()
                    .ok_or(Error::ParseError("relationship target escapes the package root"))?;
            }
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}
