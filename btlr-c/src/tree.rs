//! Parse trees.
//!
//! During parsing the driver allocates nodes in a [`NodePool`], an
//! append-only arena shared by every path the parser explores; the parser's
//! value stack only holds [`NodeId`]s into it, so a checkpoint never copies
//! a subtree. Nodes built on paths that later die simply stay unused.
//!
//! Each accepted candidate is then copied out of the pool into its own
//! [`Tree`]: a compact arena in preorder with parent links, which is what the
//! disambiguator and callers work with.

use crate::grammar::CGrammar;
use crate::token::Token;
use btlr::Span;
use smartstring::alias::String;
use std::fmt::Write as _;

/// Index of a node in a [`NodePool`] or a [`Tree`].
pub type NodeId = usize;

/// A name introduced by a declarator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declared {
    /// The identifier as written.
    pub name: String,
    /// Index of the identifier token.
    pub token: usize,
    /// Range of the identifier.
    pub span: Span,
}

/// Count of type specifiers below a specifier list, and whether one of them
/// is a typedef name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecSummary {
    /// Type specifiers seen.
    pub types: u32,
    /// One of them is a typedef name.
    pub named: bool,
}

impl SpecSummary {
    /// Summary of a list that contains both.
    pub fn add(self, other: SpecSummary) -> SpecSummary {
        SpecSummary {
            types: self.types + other.types,
            named: self.named || other.named,
        }
    }

    /// A typedef name cannot be combined with any other type specifier.
    pub fn is_consistent(&self) -> bool {
        !self.named || self.types == 1
    }
}

/// Facts computed bottom-up while reducing, kept so scope analysis does not
/// have to rediscover them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// The specifier list contains `typedef`.
    pub typedef: bool,
    /// Names this declarator (list) declares.
    pub declares: Vec<Declared>,
    /// Parameters of the outermost function declarator, if any.
    pub params: Option<Vec<Declared>>,
    /// Type specifiers below this node.
    pub spec: SpecSummary,
}

/// What a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A shifted token.
    Terminal { token: usize },
    /// A reduced production.
    NonTerminal { production: usize },
}

/// A node as the driver builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolNode {
    pub kind: NodeKind,
    /// Child nodes in source order.
    pub children: Vec<NodeId>,
    /// Range covered by the node; for an empty production the default span.
    pub span: Span,
    pub annotations: Annotations,
}

/// Append-only node arena filled by the parser driver.
#[derive(Debug, Clone, Default)]
pub struct NodePool {
    nodes: Vec<PoolNode>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` and return its id.
    pub fn push(&mut self, node: PoolNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: NodeId) -> &PoolNode {
        &self.nodes[id]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copy the subtree rooted at `root` into a standalone [`Tree`].
    pub fn materialize(&self, root: NodeId) -> Tree {
        let mut nodes: Vec<Node> = Vec::new();
        // (pool id, parent in the new tree)
        let mut work = vec![(root, None)];
        while let Some((id, parent)) = work.pop() {
            let src = &self.nodes[id];
            let new_id = nodes.len();
            nodes.push(Node {
                kind: src.kind,
                parent,
                children: Vec::with_capacity(src.children.len()),
                span: src.span,
                annotations: src.annotations.clone(),
            });
            if let Some(p) = parent {
                nodes[p].children.push(new_id);
            }
            for &child in src.children.iter().rev() {
                work.push((child, Some(new_id)));
            }
        }
        Tree { nodes }
    }
}

/// A node of a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// `None` for the root only.
    pub parent: Option<NodeId>,
    /// Child nodes in source order.
    pub children: Vec<NodeId>,
    pub span: Span,
    /// Facts the driver computed while reducing.
    pub annotations: Annotations,
}

impl Node {
    /// Production index of a non-terminal node.
    pub fn production(&self) -> Option<usize> {
        match self.kind {
            NodeKind::NonTerminal { production } => Some(production),
            NodeKind::Terminal { .. } => None,
        }
    }

    /// Token index of a leaf.
    pub fn token(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Terminal { token } => Some(token),
            NodeKind::NonTerminal { .. } => None,
        }
    }
}

/// One parse tree; nodes are stored in preorder, the root is node 0.
///
/// ```
/// use btlr_c::{FrontConfig, FrontEnd};
///
/// let front = FrontEnd::new(FrontConfig::default()).unwrap();
/// let unit = front.parse("int f(int a, int b) { return a*b; }").unwrap();
/// let tree = &unit.tree;
/// let product = tree.find(front.grammar(), "multiply").next().unwrap();
/// for &operand in tree.children(product) {
///     assert_eq!(tree.parent(operand), Some(product));
/// }
/// assert_eq!(tree.ancestors(product).last(), Some(tree.root()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        0
    }

    /// The node `id`; panics if it is out of range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Child nodes of `id` in source order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in preorder.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Parent chain of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, move |&p| self.nodes[p].parent)
    }

    /// Nodes built from the production labelled `label`.
    pub fn find<'a>(&'a self, grammar: &'a CGrammar, label: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes().filter_map(move |(id, n)| match n.production() {
            Some(p) if grammar.label(p) == label => Some(id),
            _ => None,
        })
    }

    /// Parenthesized rendering: `(label child ...)` for productions, the
    /// token text for terminals. Unit productions are shown too.
    pub fn to_sexpr(&self, grammar: &CGrammar, tokens: &[Token]) -> std::string::String {
        let mut out = std::string::String::new();
        self.write_sexpr(self.root(), grammar, tokens, &mut out);
        out
    }

    fn write_sexpr(&self, id: NodeId, grammar: &CGrammar, tokens: &[Token], out: &mut std::string::String) {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Terminal { token } => out.push_str(&tokens[token].text),
            NodeKind::NonTerminal { production } => {
                let _ = write!(out, "({}", grammar.label(production));
                for &child in &node.children {
                    out.push(' ');
                    self.write_sexpr(child, grammar, tokens, out);
                }
                out.push(')');
            }
        }
    }
}
