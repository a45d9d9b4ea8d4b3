use std::collections::HashMap;

/// A node of an in-memory DOM subtree
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    /// An element with its attributes and children
    Element(ElementNode),

    /// A text node, content kept untrimmed
    Text { content: String },
}

/// Represents a DOM element node
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Lowercase tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Element attributes (e.g., title, placeholder, alt)
    pub attributes: HashMap<String, String>,

    /// Child nodes in document order
    pub children: Vec<DomNode>,
}

impl DomNode {
    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        DomNode::Text { content: content.into() }
    }
}

impl From<ElementNode> for DomNode {
    fn from(element: ElementNode) -> Self {
        DomNode::Element(element)
    }
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: add one attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DomNode::text(text));
        self
    }

    /// Builder method: append an element child
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.add_child(child);
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(DomNode::Element(child));
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Visit every text node of this subtree in pre-order, together with its
    /// parent element. Uses an explicit stack, so depth is only bounded by memory.
    pub fn walk_text<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a ElementNode, &'a str),
    {
        let mut stack: Vec<(&'a ElementNode, &'a DomNode)> =
            self.children.iter().rev().map(|child| (self, child)).collect();

        while let Some((parent, node)) = stack.pop() {
            match node {
                DomNode::Text { content } => visit(parent, content),
                DomNode::Element(element) => {
                    stack.extend(element.children.iter().rev().map(|child| (element, child)));
                }
            }
        }
    }

    /// Visit this element and all descendant elements in pre-order
    pub fn walk_elements<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a ElementNode),
    {
        let mut stack = vec![self];

        while let Some(element) = stack.pop() {
            visit(element);
            stack.extend(element.children.iter().rev().filter_map(|child| match child {
                DomNode::Element(e) => Some(e),
                DomNode::Text { .. } => None,
            }));
        }
    }
}
