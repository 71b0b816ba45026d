use crate::bib::BibId;
use crate::block::ContentBlock;
use crate::style::CitationStyle;

/// Index of a node in a [`ContentTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Address of a paragraph: its owning node plus its position in that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParagraphId {
    pub node: NodeId,
    pub index: usize,
}

/// A section heading. `level` is the nesting depth of its section, 1 = top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
}

/// A resolved in-text citation marker inside a paragraph.
///
/// `start`/`end` are byte offsets into the paragraph text delimiting the
/// bracket *content*: `start` sits just after the opening bracket and `end`
/// points at the closing bracket (exclusive). `entries` holds the resolved
/// bibliography indices in ascending order; it is never empty once the
/// reference has been registered on its paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InTextReference {
    pub start: usize,
    pub end: usize,
    pub style: CitationStyle,
    pub entries: Vec<BibId>,
}

/// A body paragraph and the in-text references resolved inside it.
///
/// `references` is kept in strictly ascending `start` order; insertion goes
/// through the reference registry, which enforces the positional invariants.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub text: String,
    pub references: Vec<InTextReference>,
}

/// One section of the reconstructed logical structure.
///
/// A node without a heading is either the document root (no parent) or a
/// "document part" produced from malformed input; both are emitted without a
/// section wrapper during output assembly.
#[derive(Debug, Clone, Default)]
pub struct ContentNode {
    pub heading: Option<Heading>,
    pub paragraphs: Vec<Paragraph>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// The hierarchical logical structure of a document.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]; the parent
/// back-references are filled by [`set_parents`](Self::set_parents) in a
/// dedicated pass after construction. Exactly one root exists, and it never
/// carries a heading.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![ContentNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &ContentNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ContentNode {
        &mut self.nodes[id.0]
    }

    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        &self.nodes[id.node.0].paragraphs[id.index]
    }

    pub fn paragraph_mut(&mut self, id: ParagraphId) -> &mut Paragraph {
        &mut self.nodes[id.node.0].paragraphs[id.index]
    }

    /// Append a fresh node to the arena. The caller links it to a parent via
    /// [`add_child`](Self::add_child).
    pub fn new_node(&mut self) -> NodeId {
        self.nodes.push(ContentNode::default());
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    pub fn set_heading(&mut self, id: NodeId, heading: Heading) {
        self.nodes[id.0].heading = Some(heading);
    }

    pub fn add_paragraph(&mut self, id: NodeId, text: impl Into<String>) -> ParagraphId {
        let node = &mut self.nodes[id.0];
        node.paragraphs.push(Paragraph {
            text: text.into(),
            references: Vec::new(),
        });
        ParagraphId {
            node: id,
            index: node.paragraphs.len() - 1,
        }
    }

    /// Fill every node's parent back-reference, recursively from the root.
    pub fn set_parents(&mut self) {
        self.set_parents_below(self.root());
    }

    fn set_parents_below(&mut self, id: NodeId) {
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.nodes[child.0].parent = Some(id);
            self.set_parents_below(child);
        }
    }

    /// All paragraph addresses in depth-first order (a node's own paragraphs
    /// before its children's).
    pub fn paragraph_ids(&self) -> Vec<ParagraphId> {
        let mut out = Vec::new();
        self.collect_paragraph_ids(self.root(), &mut out);
        out
    }

    fn collect_paragraph_ids(&self, id: NodeId, out: &mut Vec<ParagraphId>) {
        for index in 0..self.nodes[id.0].paragraphs.len() {
            out.push(ParagraphId { node: id, index });
        }
        for &child in &self.nodes[id.0].children {
            self.collect_paragraph_ids(child, out);
        }
    }

    /// All paragraph texts in depth-first order.
    pub fn all_paragraph_texts(&self) -> Vec<&str> {
        self.paragraph_ids()
            .into_iter()
            .map(|id| self.paragraph(id).text.as_str())
            .collect()
    }

    /// All headings in depth-first order.
    pub fn all_headings(&self) -> Vec<&Heading> {
        let mut out = Vec::new();
        self.collect_headings(self.root(), &mut out);
        out
    }

    fn collect_headings<'a>(&'a self, id: NodeId, out: &mut Vec<&'a Heading>) {
        if let Some(heading) = &self.nodes[id.0].heading {
            out.push(heading);
        }
        for &child in &self.nodes[id.0].children {
            self.collect_headings(child, out);
        }
    }

    pub fn heading_count(&self) -> usize {
        self.all_headings().len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_ids().len()
    }

    /// All registered in-text references in document order, with their
    /// paragraph addresses. Diagnostic surface for callers that want a flat
    /// view of what was resolved.
    pub fn all_references(&self) -> Vec<(ParagraphId, &InTextReference)> {
        let mut out = Vec::new();
        for id in self.paragraph_ids() {
            for reference in &self.paragraph(id).references {
                out.push((id, reference));
            }
        }
        out
    }

    /// Re-flatten the tree into the block sequence it was built from:
    /// depth-first, each node's heading before its paragraphs before its
    /// children.
    pub fn flatten(&self) -> Vec<ContentBlock> {
        let mut out = Vec::new();
        self.flatten_below(self.root(), &mut out);
        out
    }

    fn flatten_below(&self, id: NodeId, out: &mut Vec<ContentBlock>) {
        let node = &self.nodes[id.0];
        if let Some(heading) = &node.heading {
            out.push(ContentBlock::heading(heading.level, heading.text.clone()));
        }
        for paragraph in &node.paragraphs {
            out.push(ContentBlock::paragraph(paragraph.text.clone()));
        }
        for &child in &node.children {
            self.flatten_below(child, out);
        }
    }
}
