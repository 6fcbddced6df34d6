use crate::markdown::join_fragments;
use crate::slide::Slide;

/// A whole presentation: its display name and its slides in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub name: String,
    pub slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(name: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self { name: name.into(), slides }
    }

    /// All fragments of the document: the `# {name}` title followed by every slide's fragments.
    ///
    /// Slides are numbered by their position, starting at 1.
    pub fn fragments(&self) -> Vec<String> {
        let mut fragments = vec![format!("# {}", self.name)];
        for (idx, slide) in self.slides.iter().enumerate() {
            fragments.extend(slide.fragments(idx + 1));
        }
        fragments
    }

    /// Renders the presentation into a single Markdown document.
    ///
    /// Rendering is a pure function of the parsed presentation: the same input always produces
    /// byte-identical output.
    ///
    /// # Example
    ///
    /// ```
    /// use slides_to_md::{Paragraph, ParserConfig, Presentation, Shape, ShapeKind, Slide, TextElement};
    ///
    /// let slide = Slide {
    ///     rel_path: "ppt/slides/slide1.xml".to_string(),
    ///     slide_number: 1,
    ///     shapes: vec![Shape::new(3, ShapeKind::Text(TextElement {
    ///         paragraphs: vec![Paragraph::new("Hello", 0)],
    ///     }))],
    ///     title_shape_id: None,
    ///     notes: None,
    ///     config: ParserConfig::default(),
    /// };
    ///
    /// let md = Presentation::new("Deck", vec![slide]).convert_to_md();
    /// assert_eq!(md, "# Deck\n\n## Slide 1\n\nHello");
    /// ```
    pub fn convert_to_md(&self) -> String {
        join_fragments(&self.fragments())
    }
}
