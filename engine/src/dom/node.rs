// DOM node facade and arena document
//
// Site rules only ever look at a handful of things on a hovered node: its tag,
// a few attributes, the inline background-image and its immediate neighbours.
// `DomNode` captures exactly that surface so a host (browser binding, test
// fixture, probe tool) can supply its own tree. `Dom` is the arena tree that
// ships with the crate.

use super::style::inline_background_image;

pub type NodeId = usize;

/// Read-only view of a DOM node as the resolver needs it.
///
/// Navigation includes text nodes, the same way `previousSibling` and
/// `firstChild` do in a browser.
pub trait DomNode: Sized + Clone {
    /// Lowercase tag name, `None` for text nodes.
    fn tag_name(&self) -> Option<String>;

    /// Attribute value by case-insensitive name.
    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Inline `background-image` as a browser serializes it
    /// (`url("...")`), or `None` when no such declaration exists.
    fn background_image(&self) -> Option<String>;

    fn parent(&self) -> Option<Self>;
    fn previous_sibling(&self) -> Option<Self>;
    fn next_sibling(&self) -> Option<Self>;
    fn first_child(&self) -> Option<Self>;
}

#[derive(Debug, Clone)]
pub enum NodeType {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub node_type: NodeType,
}

#[derive(Debug, Default)]
pub struct Dom {
    pub nodes: Vec<Node>,
}

impl Dom {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn create_element(
        &mut self,
        tag_name: &str,
        attrs: &[(&str, &str)],
        parent: Option<NodeId>,
    ) -> NodeId {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.push(
            NodeType::Element(ElementData {
                tag_name: tag_name.to_string(),
                attributes,
            }),
            parent,
        )
    }

    pub fn create_text(&mut self, text: &str, parent: Option<NodeId>) -> NodeId {
        self.push(NodeType::Text(text.to_string()), parent)
    }

    fn push(&mut self, node_type: NodeType, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            children: vec![],
            parent,
            node_type,
        });
        if let Some(pid) = parent {
            self.nodes[pid].children.push(id);
        }
        id
    }

    /// Borrow a node as a [`DomNode`]. Panics if `id` was not created by this tree.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id < self.nodes.len(), "node {} does not belong to this tree", id);
        NodeRef { dom: self, id }
    }

    fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }
}

/// A node borrowed from a [`Dom`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn element(&self) -> Option<&'a ElementData> {
        match &self.dom.nodes[self.id].node_type {
            NodeType::Element(el) => Some(el),
            NodeType::Text(_) => None,
        }
    }

    fn at(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| NodeRef { dom: self.dom, id })
    }
}

impl DomNode for NodeRef<'_> {
    fn tag_name(&self) -> Option<String> {
        self.element().map(|el| el.tag_name.to_lowercase())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element()?.attribute(name).map(str::to_string)
    }

    fn background_image(&self) -> Option<String> {
        let style = self.element()?.attribute("style")?;
        inline_background_image(style)
    }

    fn parent(&self) -> Option<Self> {
        self.at(self.dom.nodes[self.id].parent)
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.at(self.dom.sibling(self.id, -1))
    }

    fn next_sibling(&self) -> Option<Self> {
        self.at(self.dom.sibling(self.id, 1))
    }

    fn first_child(&self) -> Option<Self> {
        self.at(self.dom.nodes[self.id].children.first().copied())
    }
}
