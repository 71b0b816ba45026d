use std::collections::HashMap;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use citelink_core::{Bibliography, ContentTree, InTextReference, NodeId, Paragraph};

#[derive(Error, Debug)]
pub enum JatsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("serialized output was not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize the finished content tree as a JATS `<body>` fragment.
pub fn body_to_string(
    tree: &ContentTree,
    bibliography: &Bibliography,
) -> Result<String, JatsError> {
    let mut writer = Writer::new(Vec::new());
    write_body(&mut writer, tree, bibliography)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Serialize a whole `<article>`: the body plus the `<back>` reference list.
///
/// Front-matter (metadata) extraction lives with other collaborators and is
/// not emitted here.
pub fn article_to_string(
    tree: &ContentTree,
    bibliography: &Bibliography,
) -> Result<String, JatsError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("article")))?;
    write_body(&mut writer, tree, bibliography)?;
    write_back(&mut writer, bibliography)?;
    writer.write_event(Event::End(BytesEnd::new("article")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Emit `<body>`: a depth-first walk of the tree. Nodes with a heading become
/// `<sec>` wrappers; heading-less nodes contribute their paragraphs and
/// children directly, without a wrapper.
pub fn write_body<W: std::io::Write>(
    writer: &mut Writer<W>,
    tree: &ContentTree,
    bibliography: &Bibliography,
) -> Result<(), JatsError> {
    // Section ids are assigned over the finished tree before any output:
    // siblings first, breadth-first, hierarchically dotted ("2-1").
    let ids = assign_section_ids(tree);

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    write_node(writer, tree, tree.root(), bibliography, &ids)?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    Ok(())
}

/// Emit `<back>` with the `<ref-list>` of end references.
pub fn write_back<W: std::io::Write>(
    writer: &mut Writer<W>,
    bibliography: &Bibliography,
) -> Result<(), JatsError> {
    writer.write_event(Event::Start(BytesStart::new("back")))?;
    writer.write_event(Event::Start(BytesStart::new("ref-list")))?;
    for (_, entry) in bibliography.iter() {
        let mut reference = BytesStart::new("ref");
        reference.push_attribute(("id", entry.id()));
        writer.write_event(Event::Start(reference))?;
        writer.write_event(Event::Start(BytesStart::new("mixed-citation")))?;
        writer.write_event(Event::Text(BytesText::new(entry.text())))?;
        writer.write_event(Event::End(BytesEnd::new("mixed-citation")))?;
        writer.write_event(Event::End(BytesEnd::new("ref")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ref-list")))?;
    writer.write_event(Event::End(BytesEnd::new("back")))?;
    Ok(())
}

fn write_node<W: std::io::Write>(
    writer: &mut Writer<W>,
    tree: &ContentTree,
    node: NodeId,
    bibliography: &Bibliography,
    ids: &HashMap<NodeId, String>,
) -> Result<(), JatsError> {
    let current = tree.node(node);

    if let Some(heading) = &current.heading {
        let mut sec = BytesStart::new("sec");
        if let Some(id) = ids.get(&node) {
            sec.push_attribute(("id", id.as_str()));
        }
        writer.write_event(Event::Start(sec))?;
        writer.write_event(Event::Start(BytesStart::new("title")))?;
        writer.write_event(Event::Text(BytesText::new(&heading.text)))?;
        writer.write_event(Event::End(BytesEnd::new("title")))?;
        for paragraph in &current.paragraphs {
            write_paragraph(writer, paragraph, bibliography)?;
        }
        for &child in &current.children {
            write_node(writer, tree, child, bibliography, ids)?;
        }
        writer.write_event(Event::End(BytesEnd::new("sec")))?;
    } else {
        for paragraph in &current.paragraphs {
            write_paragraph(writer, paragraph, bibliography)?;
        }
        for &child in &current.children {
            write_node(writer, tree, child, bibliography, ids)?;
        }
    }

    Ok(())
}

/// Emit a `<p>` with `<xref>` elements wrapping each registered reference's
/// bracket content. The brackets themselves stay plain text, so removing the
/// markup reproduces the original paragraph exactly.
fn write_paragraph<W: std::io::Write>(
    writer: &mut Writer<W>,
    paragraph: &Paragraph,
    bibliography: &Bibliography,
) -> Result<(), JatsError> {
    writer.write_event(Event::Start(BytesStart::new("p")))?;

    let text = paragraph.text.as_str();
    let mut cursor = 0;
    for reference in &paragraph.references {
        if reference.start > cursor {
            writer.write_event(Event::Text(BytesText::new(&text[cursor..reference.start])))?;
        }
        let mut xref = BytesStart::new("xref");
        xref.push_attribute(("ref-type", "bibr"));
        xref.push_attribute(("rid", rid_string(reference, bibliography).as_str()));
        // The alt attribute carries the cited raw references so consumers
        // that cannot resolve rids can still render something readable.
        xref.push_attribute(("alt", alt_string(reference, bibliography).as_str()));
        writer.write_event(Event::Start(xref))?;
        writer.write_event(Event::Text(BytesText::new(
            &text[reference.start..reference.end],
        )))?;
        writer.write_event(Event::End(BytesEnd::new("xref")))?;
        cursor = reference.end;
    }
    if cursor < text.len() {
        writer.write_event(Event::Text(BytesText::new(&text[cursor..])))?;
    }

    writer.write_event(Event::End(BytesEnd::new("p")))?;
    Ok(())
}

fn rid_string(reference: &InTextReference, bibliography: &Bibliography) -> String {
    reference
        .entries
        .iter()
        .filter_map(|&id| bibliography.get(id))
        .map(|entry| entry.id())
        .collect::<Vec<_>>()
        .join(" ")
}

fn alt_string(reference: &InTextReference, bibliography: &Bibliography) -> String {
    reference
        .entries
        .iter()
        .filter_map(|&id| bibliography.get(id))
        .map(|entry| entry.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ids for every node emitted as a `<sec>`, dotted by hierarchy ("2-1" is
/// the first subsection of the second section). Heading-less nodes get no id;
/// the sections below them number among their parent's effective siblings.
fn assign_section_ids(tree: &ContentTree) -> HashMap<NodeId, String> {
    let mut ids = HashMap::new();
    assign_ids_below(tree, tree.root(), "", &mut ids);
    ids
}

fn assign_ids_below(
    tree: &ContentTree,
    node: NodeId,
    prefix: &str,
    ids: &mut HashMap<NodeId, String>,
) {
    let sections = effective_sections(tree, node);
    // Number all siblings before descending into any of them.
    for (index, &section) in sections.iter().enumerate() {
        let id = if prefix.is_empty() {
            (index + 1).to_string()
        } else {
            format!("{prefix}-{}", index + 1)
        };
        ids.insert(section, id);
    }
    for &section in &sections {
        // The id was just inserted for every section in this sibling run.
        if let Some(id) = ids.get(&section).cloned() {
            assign_ids_below(tree, section, &id, ids);
        }
    }
}

/// The `<sec>` children a node's output will contain: heading-bearing
/// children directly, plus the promoted sections of heading-less children.
fn effective_sections(tree: &ContentTree, node: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    for &child in &tree.node(node).children {
        if tree.node(child).heading.is_some() {
            out.push(child);
        } else {
            out.extend(effective_sections(tree, child));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use citelink_content::{BibRecord, ContentBlock, LinkConfig, build_tree, link_citations};

    fn numeric_bibliography(len: usize) -> Bibliography {
        Bibliography::new(
            (1..=len)
                .map(|i| BibRecord {
                    text: format!("Ref {i} text"),
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_sections_and_dotted_ids() {
        let blocks = vec![
            ContentBlock::heading(1, "Intro"),
            ContentBlock::paragraph("Plain."),
            ContentBlock::heading(1, "Methods"),
            ContentBlock::heading(2, "Sampling"),
            ContentBlock::paragraph("Detail."),
        ];
        let tree = build_tree(&blocks);
        let xml = body_to_string(&tree, &numeric_bibliography(0)).unwrap();

        assert!(xml.contains(r#"<sec id="1"><title>Intro</title>"#), "{xml}");
        assert!(xml.contains(r#"<sec id="2"><title>Methods</title>"#), "{xml}");
        assert!(xml.contains(r#"<sec id="2-1"><title>Sampling</title>"#), "{xml}");
    }

    #[test]
    fn test_xref_wraps_bracket_content() {
        let blocks = vec![
            ContentBlock::heading(1, "Intro"),
            ContentBlock::paragraph("Shown in [1] and [2-3]."),
        ];
        let mut tree = build_tree(&blocks);
        let bibliography = numeric_bibliography(3);
        link_citations(&mut tree, &bibliography, &LinkConfig::default()).unwrap();

        let xml = body_to_string(&tree, &bibliography).unwrap();
        assert!(
            xml.contains(r#"[<xref ref-type="bibr" rid="R1" alt="Ref 1 text">1</xref>]"#),
            "{xml}"
        );
        assert!(xml.contains(r#"rid="R2 R3""#), "{xml}");
        assert!(xml.contains(">2-3</xref>]"), "{xml}");
    }

    #[test]
    fn test_document_part_emits_without_wrapper() {
        // Leading paragraph on the heading-less root: emitted as a bare <p>.
        let blocks = vec![
            ContentBlock::paragraph("Preamble."),
            ContentBlock::heading(1, "First"),
            ContentBlock::paragraph("Body."),
        ];
        let tree = build_tree(&blocks);
        let xml = body_to_string(&tree, &numeric_bibliography(0)).unwrap();
        assert!(xml.starts_with("<body><p>Preamble.</p><sec id=\"1\">"), "{xml}");
    }

    #[test]
    fn test_reserved_characters_escaped() {
        let blocks = vec![
            ContentBlock::heading(1, "A < B & C"),
            ContentBlock::paragraph("x < y & z"),
        ];
        let tree = build_tree(&blocks);
        let xml = body_to_string(&tree, &numeric_bibliography(0)).unwrap();
        assert!(xml.contains("A &lt; B &amp; C"), "{xml}");
        assert!(xml.contains("x &lt; y &amp; z"), "{xml}");
    }

    #[test]
    fn test_ref_list_ids_and_text() {
        let bibliography = numeric_bibliography(2);
        let tree = build_tree(&[ContentBlock::paragraph("no citations")]);
        let xml = article_to_string(&tree, &bibliography).unwrap();
        assert!(
            xml.contains(r#"<ref id="R1"><mixed-citation>Ref 1 text</mixed-citation></ref>"#),
            "{xml}"
        );
        assert!(xml.contains(r#"<ref id="R2">"#), "{xml}");
        assert!(
            xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><article><body>"#),
            "{xml}"
        );
        assert!(xml.ends_with("</back></article>"), "{xml}");
    }

    #[test]
    fn test_stripping_markup_reproduces_paragraph() {
        let blocks = vec![ContentBlock::paragraph("Mid [1] sentence [2] end.")];
        let mut tree = build_tree(&blocks);
        let bibliography = numeric_bibliography(2);
        link_citations(&mut tree, &bibliography, &LinkConfig::default()).unwrap();
        let xml = body_to_string(&tree, &bibliography).unwrap();

        // Remove all tags; the paragraph text must be intact, brackets included.
        let mut stripped = String::new();
        let mut in_tag = false;
        for c in xml.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => stripped.push(c),
                _ => {}
            }
        }
        assert_eq!(stripped, "Mid [1] sentence [2] end.");
    }
}
