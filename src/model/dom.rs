use serde::{Deserialize, Serialize};

/// Class that marks a node as visually hidden.
pub const HIDDEN_CLASS: &str = "hidden";

/// Handle into a [`Dom`] arena. Handles are never reused and stay valid
/// after the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Implicit document root; never written in an outline
    Body,
    Div,
    Form,
    Input,
    Textarea,
    Button,
    Span,
    P,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Body => "body",
            Tag::Div => "div",
            Tag::Form => "form",
            Tag::Input => "input",
            Tag::Textarea => "textarea",
            Tag::Button => "button",
            Tag::Span => "span",
            Tag::P => "p",
        }
    }

    /// Parse an outline tag name. `body` is reserved for the root.
    pub fn parse(s: &str) -> Option<Tag> {
        match s {
            "div" => Some(Tag::Div),
            "form" => Some(Tag::Form),
            "input" => Some(Tag::Input),
            "textarea" => Some(Tag::Textarea),
            "button" => Some(Tag::Button),
            "span" => Some(Tag::Span),
            "p" => Some(Tag::P),
            _ => None,
        }
    }

    /// Whether nodes of this kind carry a submittable value
    pub fn is_field(self) -> bool {
        matches!(self, Tag::Input | Tag::Textarea)
    }
}

/// A single element in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: Tag,
    /// Element id attribute
    pub id: Option<String>,
    /// Class list, in insertion order
    pub classes: Vec<String>,
    /// Form field name
    pub name: Option<String>,
    /// `type` attribute (`button`, `hidden`, `text`, ...)
    pub input_type: Option<String>,
    /// Visible text, for buttons and labels
    pub label: Option<String>,
    /// Live value as edited by the user
    pub value: String,
    /// Value as rendered by the server; the dirty-check baseline
    pub default_value: String,
    pub disabled: bool,

    #[serde(skip)]
    parent: Option<NodeId>,
    #[serde(skip)]
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(tag: Tag) -> Self {
        Node {
            tag,
            id: None,
            classes: Vec::new(),
            name: None,
            input_type: None,
            label: None,
            value: String::new(),
            default_value: String::new(),
            disabled: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_type(mut self, input_type: &str) -> Self {
        self.input_type = Some(input_type.to_string());
        self
    }

    /// Set both the live and the rendered value
    pub fn with_value(mut self, value: &str) -> Self {
        self.set_rendered_value(value);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Flip a class. Returns true if the class is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN_CLASS)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.add_class(HIDDEN_CLASS);
        } else {
            self.remove_class(HIDDEN_CLASS);
        }
    }

    /// `[type=button]`: the interior remove control of a field group
    pub fn is_remove_control(&self) -> bool {
        self.input_type.as_deref() == Some("button")
    }

    /// Equivalent of setting the `value` attribute on freshly rendered markup
    pub fn set_rendered_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.default_value = value.to_string();
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena holding every node the page has ever contained.
///
/// Nodes are addressed by [`NodeId`]. Detaching a node only unlinks it from
/// its parent; the node and its subtree stay in the arena so handles held by
/// listeners or entity lists never dangle.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        Dom {
            nodes: vec![Node::new(Tag::Body)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever created, detached ones included; the root is
    /// not counted.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Add a node to the arena without attaching it anywhere.
    pub fn create(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a node and append it under `parent`.
    pub fn create_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.create(node);
        self.append_child(parent, id);
        id
    }

    /// Append `child` as the last child of `parent`, moving it if it was
    /// attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` immediately before `reference`, which must be a child
    /// of `parent`. Returns false (and leaves the tree untouched) otherwise.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        if self.parent(reference) != Some(parent) || child == reference {
            return false;
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let Some(pos) = siblings.iter().position(|&c| c == reference) else {
            return false;
        };
        siblings.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
        true
    }

    /// Unlink a node from its parent. Returns false if it had no parent.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        true
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(&self.root)
    }

    /// The node itself followed by its ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// First descendant of `id` (document order) matching `pred`.
    pub fn find_descendant(&self, id: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.descendants(id).into_iter().find(|&d| pred(self.node(d)))
    }

    /// First attached element carrying the given id attribute.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.find_descendant(self.root, |n| n.id.as_deref() == Some(element_id))
    }

    /// All attached elements carrying the given class, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&d| self.node(d).has_class(class))
            .collect()
    }

    /// Deep-copy the subtree rooted at `id`. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.create(self.node(id).clone());
        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }
}
