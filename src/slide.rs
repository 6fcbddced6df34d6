use crate::markdown::{extract_shape_text, format_notes, join_fragments};
use crate::parse_xml::ParsedSlide;
use crate::parser_config::ParserConfig;
use crate::types::{Shape, ShapeId};
use log::debug;

/// A single parsed slide: its shape tree, the id of its title shape and its speaker notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub rel_path: String,
    pub slide_number: u32,
    pub shapes: Vec<Shape>,
    pub title_shape_id: Option<ShapeId>,
    pub notes: Option<String>,
    pub config: ParserConfig,
}

impl Slide {
    pub fn new(
        rel_path: String,
        slide_number: u32,
        parsed: ParsedSlide,
        notes: Option<String>,
        config: ParserConfig,
    ) -> Self {
        Self {
            rel_path,
            slide_number,
            shapes: parsed.shapes,
            title_shape_id: parsed.title_shape_id,
            notes,
            config,
        }
    }

    /// Extracts `N` from a part name like `ppt/slides/slideN.xml`.
    pub(crate) fn extract_slide_number(path: &str) -> Option<u32> {
        path.split('/')
            .last()
            .and_then(|filename| filename.strip_prefix("slide").and_then(|s| s.strip_suffix(".xml")))
            .and_then(|num_str| num_str.parse::<u32>().ok())
    }

    fn is_title_shape(&self, shape: &Shape) -> bool {
        self.title_shape_id == Some(shape.id)
    }

    /// Returns the designated title shape, looked up by id among the top level shapes.
    pub fn title_shape(&self) -> Option<&Shape> {
        self.shapes.iter().find(|shape| self.is_title_shape(shape))
    }

    /// Trimmed text of the title shape, or `None` if there is no title or it is blank.
    ///
    /// Line breaks inside the title are folded into single spaces so the heading stays on one line;
    /// spacing within a line is kept as is.
    pub fn title_text(&self) -> Option<String> {
        let text = self.title_shape()?.text();
        let title = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!title.is_empty()).then_some(title)
    }

    /// The slide heading: `## {title}` or `## Slide {ordinal}` when there is no usable title.
    pub fn heading(&self, ordinal: usize) -> String {
        match self.title_text() {
            Some(title) => format!("## {}", title),
            None => format!("## Slide {}", ordinal),
        }
    }

    /// Fragments of every shape except the title shape, in shape order.
    pub fn body_fragments(&self) -> Vec<String> {
        let max_depth = self.config.max_group_depth;

        self.shapes
            .iter()
            .filter(|shape| {
                let skip = self.is_title_shape(shape);
                if skip {
                    debug!("Slide {}: shape {} is used as heading", self.slide_number, shape.id);
                }
                !skip
            })
            .flat_map(|shape| extract_shape_text(shape, max_depth))
            .collect()
    }

    /// The quoted speaker notes block, if notes are enabled and present.
    pub fn notes_fragment(&self) -> Option<String> {
        if !self.config.include_notes {
            return None;
        }
        format_notes(self.notes.as_deref())
    }

    /// All fragments of this slide: heading, body fragments and finally the notes.
    ///
    /// `ordinal` is the 1-based position of the slide in its presentation.
    pub fn fragments(&self, ordinal: usize) -> Vec<String> {
        let mut fragments = vec![self.heading(ordinal)];
        fragments.extend(self.body_fragments());
        fragments.extend(self.notes_fragment());
        fragments
    }

    /// Converts this slide into Markdown, fragments separated by a blank line.
    pub fn convert_to_md(&self, ordinal: usize) -> String {
        join_fragments(&self.fragments(ordinal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Paragraph, ShapeKind, TextElement};

    fn text_shape(id: u32, text: &str) -> Shape {
        Shape::new(id, ShapeKind::Text(TextElement { paragraphs: vec![Paragraph::new(text, 0)] }))
    }

    fn slide(shapes: Vec<Shape>, title: Option<u32>, notes: Option<&str>) -> Slide {
        Slide {
            rel_path: "ppt/slides/slide1.xml".to_string(),
            slide_number: 1,
            shapes,
            title_shape_id: title.map(ShapeId),
            notes: notes.map(str::to_string),
            config: ParserConfig::default(),
        }
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(Slide::extract_slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(Slide::extract_slide_number("ppt/slides/notes.xml"), None);
    }

    #[test]
    fn test_title_used_as_heading_and_not_repeated() {
        let slide = slide(vec![text_shape(2, " Welcome "), text_shape(3, "Body")], Some(2), None);
        assert_eq!(slide.fragments(1), vec!["## Welcome".to_string(), "Body".to_string()]);
    }

    #[test]
    fn test_identical_text_is_not_conflated_with_title() {
        let slide = slide(vec![text_shape(2, "Same"), text_shape(3, "Same")], Some(2), None);
        assert_eq!(slide.fragments(4), vec!["## Same".to_string(), "Same".to_string()]);
    }

    #[test]
    fn test_blank_title_falls_back_to_ordinal_and_is_still_skipped() {
        let slide = slide(vec![text_shape(2, "   "), text_shape(3, "Body")], Some(2), None);
        assert_eq!(slide.fragments(5), vec!["## Slide 5".to_string(), "Body".to_string()]);
    }

    #[test]
    fn test_multi_line_title_stays_on_one_line() {
        let title = Shape::new(
            2,
            ShapeKind::Text(TextElement {
                paragraphs: vec![Paragraph::new("Part one", 0), Paragraph::new("part two", 0)],
            }),
        );
        let slide = slide(vec![title], Some(2), None);
        assert_eq!(slide.heading(1), "## Part one part two");
    }

    #[test]
    fn test_title_keeps_inner_spacing() {
        let slide = slide(vec![text_shape(2, "  Q1    Results\tFY24 ")], Some(2), None);
        assert_eq!(slide.heading(1), "## Q1    Results\tFY24");
    }

    #[test]
    fn test_notes_come_last() {
        let slide = slide(vec![text_shape(3, "Body")], None, Some("Say hi"));
        assert_eq!(slide.convert_to_md(2), "## Slide 2\n\nBody\n\n**Notes:**\n> Say hi");
    }

    #[test]
    fn test_notes_can_be_disabled() {
        let mut slide = slide(vec![], None, Some("hidden"));
        slide.config = ParserConfig::builder().include_notes(false).build();
        assert_eq!(slide.fragments(1), vec!["## Slide 1".to_string()]);
    }
}
