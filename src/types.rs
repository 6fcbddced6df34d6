use std::fmt;

/// Stable identifier of a shape within a slide (`p:cNvPr/@id`).
///
/// Identity, not text, decides whether a shape is the slide's title shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn new(id: u32, kind: ShapeKind) -> Self {
        Self { id: ShapeId(id), kind }
    }

    /// Plain text of a text shape, paragraphs joined by newlines.
    ///
    /// Every other kind of shape has no text of its own.
    pub fn text(&self) -> String {
        match &self.kind {
            ShapeKind::Text(text) => text
                .paragraphs
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            ShapeKind::Table(_) | ShapeKind::Group(_) | ShapeKind::Other => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Text(TextElement),
    Table(TableElement),
    Group(GroupElement),
    /// Pictures, connectors, charts and anything else without extractable text.
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextElement {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub level: u32,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, level: u32) -> Self {
        Self { text: text.into(), level }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableElement {
    pub rows: Vec<TableRow>,
}

impl TableElement {
    /// Builds a table from plain cell strings, one inner vector per row.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| TableRow {
                cells: row.into_iter().map(|text| TableCell { text: text.into() }).collect(),
            })
            .collect();
        Self { rows }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupElement {
    pub shapes: Vec<Shape>,
}
