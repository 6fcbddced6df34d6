use crate::constants::{A_NAMESPACE, MAX_PARAGRAPH_LEVEL, P_NAMESPACE, TABLE_URI};
use crate::types::{GroupElement, Paragraph, Shape, ShapeId, ShapeKind, TableCell, TableElement, TableRow, TextElement};
use crate::{Error, Result};
use log::{debug, warn};
use roxmltree::{Document, Node};

/// Shape tree of a single slide together with the id of its title shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSlide {
    pub shapes: Vec<Shape>,
    pub title_shape_id: Option<ShapeId>,
}

fn is_p(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(P_NAMESPACE)
}

fn is_a(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(A_NAMESPACE)
}

/// Locates `<p:cSld>/<p:spTree>` below the root of a slide or notes part.
fn find_sp_tree<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let c_sld = doc
        .root_element()
        .children()
        .find(|n| is_p(n, "cSld"))
        .ok_or(Error::ParseError("No <p:cSld> tag was found"))?;

    c_sld
        .children()
        .find(|n| is_p(n, "spTree"))
        .ok_or(Error::ParseError("No <p:spTree> tag was found"))
}

/// Parses raw XML slide data from a PowerPoint (pptx) file into its shape tree.
///
/// Every shape directly below `<p:spTree>` becomes a [`Shape`]: text boxes and placeholders
/// become [`ShapeKind::Text`], DrawingML tables [`ShapeKind::Table`] and group shapes
/// [`ShapeKind::Group`] with their children parsed recursively. Pictures, connectors, charts and
/// anything else become [`ShapeKind::Other`].
///
/// The title shape is the first top level placeholder whose index is `0` (or absent), which is
/// how title and centered-title placeholders are stored.
///
/// # Arguments
///
/// - `xml_data`: Byte slice containing raw XML data of a PowerPoint slide.
/// - `max_depth`: Groups nested deeper than this are kept as [`ShapeKind::Other`].
///
/// # Errors
///
/// Parsing fails if the data isn't valid UTF-8, isn't well-formed XML or lacks the
/// `<p:cSld>`/`<p:spTree>` elements.
pub fn parse_slide_xml(xml_data: &[u8], max_depth: usize) -> Result<ParsedSlide> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let sp_tree = find_sp_tree(&doc)?;

    let mut parsed = ParsedSlide::default();
    for node in sp_tree.children().filter(|n| n.is_element()) {
        let Some(shape) = parse_shape(&node, 0, max_depth) else {
            continue;
        };

        if parsed.title_shape_id.is_none() && is_title_placeholder(&node) {
            parsed.title_shape_id = Some(shape.id);
        }
        parsed.shapes.push(shape);
    }

    Ok(parsed)
}

/// Parses a notes page and returns the text of its body placeholder.
///
/// Paragraphs are joined with `\n`. Returns `None` when the page has no body placeholder.
pub fn parse_notes_xml(xml_data: &[u8]) -> Result<Option<String>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let sp_tree = find_sp_tree(&doc)?;

    let body = sp_tree.children().filter(|n| is_p(n, "sp")).find(|sp| {
        placeholder(sp).is_some_and(|ph| ph.attribute("type") == Some("body"))
    });

    let Some(tx_body) = body.and_then(|sp| sp.children().find(|n| is_p(n, "txBody"))) else {
        return Ok(None);
    };

    let text = tx_body
        .children()
        .filter(|n| is_a(n, "p"))
        .map(|p| parse_paragraph(&p).text)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Some(text))
}

/// Maps one element of a shape tree onto a [`Shape`].
///
/// Returns `None` for elements that aren't shapes at all (`<p:nvGrpSpPr>`, `<p:grpSpPr>`, ...).
fn parse_shape(node: &Node, depth: usize, max_depth: usize) -> Option<Shape> {
    if node.tag_name().namespace() != Some(P_NAMESPACE) {
        debug!("Skipping foreign element <{}> in shape tree", node.tag_name().name());
        return None;
    }

    let kind = match node.tag_name().name() {
        "sp" => parse_sp(node),
        "graphicFrame" => parse_graphic_frame(node),
        "grpSp" => parse_group(node, depth, max_depth),
        "pic" | "cxnSp" | "contentPart" => ShapeKind::Other,
        _ => return None,
    };

    Some(Shape { id: shape_id(node), kind })
}

/// Reads the stable shape id from `<p:nv*Pr>/<p:cNvPr id="..">`.
fn shape_id(node: &Node) -> ShapeId {
    let id = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name().starts_with("nv"))
        .and_then(|nv| nv.children().find(|n| is_p(n, "cNvPr")))
        .and_then(|c_nv_pr| c_nv_pr.attribute("id"))
        .and_then(|id| id.parse::<u32>().ok());

    match id {
        Some(id) => ShapeId(id),
        None => {
            warn!("Shape <{}> has no usable id, falling back to 0", node.tag_name().name());
            ShapeId(0)
        }
    }
}

/// Finds `<p:nv*Pr>/<p:nvPr>/<p:ph>` of a shape, if it is a placeholder.
fn placeholder<'a, 'input>(node: &Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name().starts_with("nv"))
        .and_then(|nv| nv.children().find(|n| is_p(n, "nvPr")))
        .and_then(|nv_pr| nv_pr.children().find(|n| is_p(n, "ph")))
}

fn is_title_placeholder(node: &Node) -> bool {
    placeholder(node).is_some_and(|ph| matches!(ph.attribute("idx"), None | Some("0")))
}

/// A `<p:sp>` carries text only if it has a `<p:txBody>`.
fn parse_sp(sp_node: &Node) -> ShapeKind {
    let Some(tx_body) = sp_node.children().find(|n| is_p(n, "txBody")) else {
        return ShapeKind::Other;
    };

    let paragraphs = tx_body.children().filter(|n| is_a(n, "p")).map(|p| parse_paragraph(&p)).collect();

    ShapeKind::Text(TextElement { paragraphs })
}

fn parse_graphic_frame(node: &Node) -> ShapeKind {
    let tbl_node = node
        .descendants()
        .find(|n| is_a(n, "graphicData") && n.attribute("uri") == Some(TABLE_URI))
        .and_then(|graphic_data| graphic_data.children().find(|n| is_a(n, "tbl")));

    match tbl_node {
        Some(tbl) => ShapeKind::Table(parse_table(&tbl)),
        None => ShapeKind::Other,
    }
}

fn parse_group(node: &Node, depth: usize, max_depth: usize) -> ShapeKind {
    if depth >= max_depth {
        warn!("Group shape nested deeper than {} levels, its content is skipped", max_depth);
        return ShapeKind::Other;
    }

    let shapes = node
        .children()
        .filter(|n| n.is_element())
        .filter_map(|child| parse_shape(&child, depth + 1, max_depth))
        .collect();

    ShapeKind::Group(GroupElement { shapes })
}

/// Parses a table node (`<a:tbl>`) row by row. Each cell's paragraphs are joined by a space so a
/// cell always stays on one Markdown line.
fn parse_table(tbl_node: &Node) -> TableElement {
    let rows = tbl_node
        .children()
        .filter(|n| is_a(n, "tr"))
        .map(|tr| TableRow {
            cells: tr.children().filter(|n| is_a(n, "tc")).map(|tc| parse_table_cell(&tc)).collect(),
        })
        .collect();

    TableElement { rows }
}

fn parse_table_cell(tc_node: &Node) -> TableCell {
    let text = tc_node
        .children()
        .find(|n| is_a(n, "txBody"))
        .map(|tx_body| {
            tx_body
                .children()
                .filter(|n| is_a(n, "p"))
                .map(|p| parse_paragraph(&p).text)
                .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    TableCell { text }
}

/// Parses a paragraph node (`<a:p>`): text of runs and fields, line breaks as `\n` and the
/// outline level from `<a:pPr lvl="..">`, capped at the deepest level DrawingML defines.
fn parse_paragraph(p_node: &Node) -> Paragraph {
    let level = p_node
        .children()
        .find(|n| is_a(n, "pPr"))
        .and_then(|p_pr| p_pr.attribute("lvl"))
        .and_then(|lvl| lvl.parse::<u32>().ok())
        .map(|lvl| lvl.min(MAX_PARAGRAPH_LEVEL))
        .unwrap_or(0);

    let mut text = String::new();
    for child in p_node.children().filter(|n| n.is_element()) {
        if is_a(&child, "r") || is_a(&child, "fld") {
            if let Some(t) = child.children().find(|n| is_a(n, "t")).and_then(|t| t.text()) {
                text.push_str(t);
            }
        } else if is_a(&child, "br") {
            text.push('\n');
        }
    }

    Paragraph { text, level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn load_xml(filename: &str) -> Vec<u8> {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("tests");
        path.push("test_data");
        path.push("xml");
        path.push(filename);
        fs::read(path).expect("Unable to read test data file")
    }

    fn ids(shapes: &[Shape]) -> Vec<u32> {
        shapes.iter().map(|s| s.id.0).collect()
    }

    #[test]
    fn test_parse_slide_shape_tree() {
        let parsed = parse_slide_xml(&load_xml("slide_with_group.xml"), 32).expect("slide should parse");

        assert_eq!(parsed.title_shape_id, Some(ShapeId(2)));
        assert_eq!(ids(&parsed.shapes), vec![2, 3, 4, 7, 8]);

        match &parsed.shapes[1].kind {
            ShapeKind::Text(text) => {
                assert_eq!(
                    text.paragraphs,
                    vec![
                        Paragraph::new("Agenda", 0),
                        Paragraph::new("Point A", 1),
                        Paragraph::new("Sub-point", 2),
                        Paragraph::new("", 0),
                    ]
                );
            }
            other => panic!("expected text shape, got {other:?}"),
        }

        match &parsed.shapes[2].kind {
            ShapeKind::Group(group) => {
                assert_eq!(ids(&group.shapes), vec![5, 6]);
                assert_eq!(group.shapes[1].kind, ShapeKind::Other);
            }
            other => panic!("expected group shape, got {other:?}"),
        }

        assert_eq!(
            parsed.shapes[3].kind,
            ShapeKind::Table(TableElement::from_rows(vec![vec!["Name", "Value"], vec!["a|b"]]))
        );
        assert_eq!(parsed.shapes[4].kind, ShapeKind::Other);
    }

    #[test]
    fn test_parse_paragraph_fields_and_breaks() {
        let parsed = parse_slide_xml(&load_xml("slide_with_group.xml"), 32).expect("slide should parse");
        match &parsed.shapes[2].kind {
            ShapeKind::Group(group) => {
                assert_eq!(group.shapes[0].text(), "Slide 7\nnext line");
            }
            other => panic!("expected group shape, got {other:?}"),
        }
    }

    #[test]
    fn test_group_depth_limit() {
        let parsed = parse_slide_xml(&load_xml("slide_with_group.xml"), 0).expect("slide should parse");
        assert_eq!(parsed.shapes[2].kind, ShapeKind::Other);
    }

    #[test]
    fn test_slide_without_title_placeholder() {
        let xml = format!(
            r#"<p:sld xmlns:a="{A_NAMESPACE}" xmlns:p="{P_NAMESPACE}"><p:cSld><p:spTree>
                <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
                <p:sp><p:nvSpPr><p:cNvPr id="4" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
                    <p:txBody><a:p><a:r><a:t>Body</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#
        );
        let parsed = parse_slide_xml(xml.as_bytes(), 32).expect("slide should parse");
        assert_eq!(parsed.title_shape_id, None);
        assert_eq!(ids(&parsed.shapes), vec![4]);
    }

    #[test]
    fn test_paragraph_level_is_capped() {
        let xml = format!(
            r#"<p:sld xmlns:a="{A_NAMESPACE}" xmlns:p="{P_NAMESPACE}"><p:cSld><p:spTree>
                <p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
                    <p:txBody>
                        <a:p><a:pPr lvl="4000000000"/><a:r><a:t>Deep</a:t></a:r></a:p>
                        <a:p><a:pPr lvl="3"/><a:r><a:t>Fine</a:t></a:r></a:p>
                    </p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#
        );
        let parsed = parse_slide_xml(xml.as_bytes(), 32).expect("slide should parse");
        match &parsed.shapes[0].kind {
            ShapeKind::Text(text) => {
                assert_eq!(
                    text.paragraphs,
                    vec![Paragraph::new("Deep", MAX_PARAGRAPH_LEVEL), Paragraph::new("Fine", 3)]
                );
            }
            other => panic!("expected text shape, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_shape_tree_is_an_error() {
        let xml = format!(r#"<p:sld xmlns:p="{P_NAMESPACE}"><p:cSld/></p:sld>"#);
        assert!(matches!(parse_slide_xml(xml.as_bytes(), 32), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_parse_notes_body() {
        let notes = parse_notes_xml(&load_xml("notes_slide.xml")).expect("notes should parse");
        assert_eq!(notes.as_deref(), Some("Remember X\nand Y"));
    }
}
