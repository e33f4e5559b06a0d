use std::collections::BTreeMap;

use crate::{alphabet::Symbol, state::StateId};

/// One destination of a transition, together with the output token emitted
/// when taking it (Mealy mode only)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub to: StateId,
    pub out: Option<Symbol>,
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(to: StateId, out: Option<Symbol>) -> Self { Self { to, out } }

    #[inline]
    #[must_use]
    pub fn silent(to: StateId) -> Self { Self { to, out: None } }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    nil: Vec<Edge>,
    map: BTreeMap<Symbol, Vec<Edge>>,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn nil_edges(&self) -> &[Edge] { &self.nil }

    /// All edge lists leaving this node, epsilon first
    pub fn edges(&self) -> impl Iterator<Item = (Option<&Symbol>, &[Edge])> {
        (!self.nil.is_empty())
            .then_some((None, self.nil.as_slice()))
            .into_iter()
            .chain(self.map.iter().map(|(k, v)| (Some(k), v.as_slice())))
    }

    fn is_empty(&self) -> bool { self.nil.is_empty() && self.map.is_empty() }
}

/// Mapping from `(state, symbol)` to an ordered, duplicate-free list of
/// edges.  A `None` symbol denotes an epsilon edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transitions(BTreeMap<StateId, Node>);

impl Transitions {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Insert an edge unless an identical one is already present.  Returns
    /// whether anything changed.
    pub fn connect(&mut self, from: StateId, by: Option<Symbol>, edge: Edge) -> bool {
        let node = self.0.entry(from).or_default();
        let list = match by {
            Some(sym) => node.map.entry(sym).or_default(),
            None => &mut node.nil,
        };

        if list.contains(&edge) {
            false
        } else {
            list.push(edge);
            true
        }
    }

    #[inline]
    #[must_use]
    pub fn node(&self, from: StateId) -> Option<&Node> { self.0.get(&from) }

    /// The edges taken from `from` on reading `sym`
    #[must_use]
    pub fn step(&self, from: StateId, sym: &str) -> &[Edge] {
        self.0
            .get(&from)
            .and_then(|n| n.map.get(sym))
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn nil(&self, from: StateId) -> &[Edge] {
        self.0.get(&from).map_or(&[][..], |n| n.nil.as_slice())
    }

    /// Every `(source, symbol, edges)` entry in the relation
    pub fn iter(&self) -> impl Iterator<Item = (StateId, Option<&Symbol>, &[Edge])> {
        self.0
            .iter()
            .flat_map(|(&s, n)| n.edges().map(move |(k, v)| (s, k, v)))
    }

    /// Number of `(source, symbol)` keys
    #[must_use]
    pub fn len(&self) -> usize { self.iter().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.values().all(Node::is_empty) }

    #[must_use]
    pub fn edge_count(&self) -> usize { self.iter().map(|(_, _, v)| v.len()).sum() }

    #[must_use]
    pub fn has_epsilon(&self) -> bool { self.0.values().any(|n| !n.nil.is_empty()) }

    /// Rebuild the relation with every state handle passed through `f`.
    /// Entries whose source maps to `None` are dropped, as are individual
    /// edges whose destination maps to `None`.
    #[must_use]
    pub fn remap(&self, f: impl Fn(StateId) -> Option<StateId>) -> Self {
        let mut out = Self::new();

        for (from, by, edges) in self.iter() {
            let Some(from) = f(from) else { continue };

            for edge in edges {
                if let Some(to) = f(edge.to) {
                    out.connect(from, by.cloned(), Edge::new(to, edge.out.clone()));
                }
            }
        }

        out
    }

    pub(crate) fn absorb(&mut self, other: Transitions, offset: usize) {
        for (from, node) in other.0 {
            let from = StateId(from.0 + offset);
            let shift = |e: Edge| Edge::new(StateId(e.to.0 + offset), e.out);

            for edge in node.nil {
                self.connect(from, None, shift(edge));
            }

            for (sym, edges) in node.map {
                for edge in edges {
                    self.connect(from, Some(sym.clone()), shift(edge));
                }
            }
        }
    }
}
