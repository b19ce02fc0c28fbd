//! An explicit game tree with fixed static values.
//!
//! Nodes without children are horizon leaves, not game ends: they offer a
//! single pass move back onto themselves so a search deeper than the tree
//! keeps seeing the same static value. Only nodes marked terminal have no
//! legal moves.

use std::sync::Arc;

use super::{GameState, SearchMove, Value};

pub const ROOT: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeMove {
    pub from: usize,
    pub to: usize,
}

impl SearchMove for TreeMove {
    type Square = usize;
    fn origin(&self) -> usize { self.from }
    fn target(&self) -> usize { self.to }
}

#[derive(Clone, Debug, Default)]
struct Node {
    children: Vec<usize>,
    value: Value,
    terminal: bool,
    capture: bool,
    no_progress: u32,
}

#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new(root_value: Value) -> Self {
        Self { nodes: vec![Node { value: root_value, ..Node::default() }] }
    }

    /// Appends a child under `parent`; children are generated in insertion order.
    pub fn child(&mut self, parent: usize, value: Value) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { value, ..Node::default() });
        self.nodes[parent].children.push(id);
        id
    }

    /// The side to move at `node` has no legal moves.
    pub fn terminal(&mut self, node: usize) -> &mut Self {
        self.nodes[node].terminal = true;
        self
    }

    /// Every move out of `node` counts as a capture.
    pub fn capture(&mut self, node: usize) -> &mut Self {
        self.nodes[node].capture = true;
        self
    }

    pub fn no_progress(&mut self, node: usize, turns: u32) -> &mut Self {
        self.nodes[node].no_progress = turns;
        self
    }

    pub fn build(self) -> TreeState {
        TreeState { nodes: Arc::new(self.nodes), node: ROOT, ply: 0 }
    }
}

/// Complete tree with `branching` children per node and the given leaf values
/// left to right. Interior nodes have static value 0.
pub fn uniform(branching: usize, leaves: &[Value]) -> TreeState {
    assert!(branching >= 2, "branching factor must be at least 2");
    let mut depth = 0;
    let mut width = 1;
    while width < leaves.len() { width *= branching; depth += 1; }
    assert_eq!(width, leaves.len(), "leaf count must be a power of the branching factor");

    let mut b = TreeBuilder::new(0.0);
    let mut frontier = vec![ROOT];
    for level in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * branching);
        for &parent in &frontier {
            for _ in 0..branching {
                next.push(b.child(parent, 0.0));
            }
        }
        if level + 1 == depth {
            for (&id, &v) in next.iter().zip(leaves) { b.nodes[id].value = v; }
        }
        frontier = next;
    }
    b.build()
}

#[derive(Clone, Debug)]
pub struct TreeState {
    nodes: Arc<Vec<Node>>,
    node: usize,
    ply: u32,
}

impl TreeState {
    pub fn node(&self) -> usize { self.node }
    pub fn ply(&self) -> u32 { self.ply }
    pub fn static_value(&self) -> Value { self.nodes[self.node].value }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
}

impl GameState for TreeState {
    type Move = TreeMove;
    type Player = Side;

    fn legal_moves(&self) -> Vec<TreeMove> {
        let n = &self.nodes[self.node];
        if n.terminal { return Vec::new(); }
        if n.children.is_empty() { return vec![TreeMove { from: self.node, to: self.node }]; }
        n.children.iter().map(|&to| TreeMove { from: self.node, to }).collect()
    }

    fn capture_moves(&self) -> Vec<TreeMove> {
        if self.nodes[self.node].capture { self.legal_moves() } else { Vec::new() }
    }

    fn apply(&self, mv: &TreeMove) -> Self {
        Self { nodes: Arc::clone(&self.nodes), node: mv.to, ply: self.ply + 1 }
    }

    fn current_player(&self) -> Side {
        if self.ply % 2 == 0 { Side::First } else { Side::Second }
    }

    fn no_progress_count(&self) -> u32 { self.nodes[self.node].no_progress }
}
