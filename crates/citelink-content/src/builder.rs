use citelink_core::{ContentBlock, ContentTree, Heading, NodeId};

/// Reconstruct the hierarchical logical structure from a flat, ordered
/// sequence of classified blocks.
///
/// Processing per node: a leading heading (never at the root) becomes the
/// node's own heading, with its stored level set to the nesting depth;
/// consecutive paragraphs after it attach to the node directly; the remainder
/// is grouped into runs, each run starting at a heading whose *input* level
/// equals that of the first heading in the remainder, and each run recurses
/// as a child node one level deeper.
///
/// Heading levels are taken at face value: a level skip (h3 directly under
/// h1) simply nests deeper and is never rejected. Malformed input yields a
/// degenerate but well-formed tree; this function does not fail.
pub fn build_tree(blocks: &[ContentBlock]) -> ContentTree {
    let mut tree = ContentTree::new();
    let root = tree.root();
    build_node(&mut tree, root, blocks, 0);
    tree.set_parents();
    tree
}

fn build_node(tree: &mut ContentTree, node: NodeId, blocks: &[ContentBlock], depth: usize) {
    if blocks.is_empty() {
        return;
    }

    let mut index = 0;

    // The root (depth 0) never takes a heading of its own; a document-leading
    // heading starts the first child run instead.
    if depth > 0 {
        if let ContentBlock::Heading { text, .. } = &blocks[0] {
            tree.set_heading(
                node,
                Heading {
                    level: depth,
                    text: text.clone(),
                },
            );
            index = 1;
        }
    }

    while let Some(ContentBlock::Paragraph { text }) = blocks.get(index) {
        tree.add_paragraph(node, text.clone());
        index += 1;
    }

    if index >= blocks.len() {
        return;
    }

    let remainder = &blocks[index..];
    // Runs split at headings matching the first remaining element's level.
    // With well-formed input the first remaining element is always a heading;
    // a paragraph here (malformed input) keeps the whole remainder as a
    // single heading-less document part.
    let run_level = remainder[0].heading_level();
    let mut boundaries = vec![0];
    if run_level.is_some() {
        for (i, block) in remainder.iter().enumerate().skip(1) {
            if block.heading_level() == run_level {
                boundaries.push(i);
            }
        }
    }
    boundaries.push(remainder.len());

    for pair in boundaries.windows(2) {
        let run = &remainder[pair[0]..pair[1]];
        let child = tree.new_node();
        build_node(tree, child, run, depth + 1);
        tree.add_child(node, child);
    }
}
