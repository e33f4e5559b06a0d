use std::collections::BTreeSet;

use hashbrown::HashSet;

use super::{Automaton, Edge, Node, Transitions};
use crate::{closure_builder::ClosureBuilder, state::StateId};

impl Automaton {
    /// The states reachable from `state` along epsilon edges alone,
    /// including `state` itself
    #[must_use]
    pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
        self.epsilon_closure_of([state])
    }

    pub(crate) fn epsilon_closure_of<I: IntoIterator<Item = StateId>>(
        &self,
        seed: I,
    ) -> BTreeSet<StateId> {
        let mut closure = ClosureBuilder::default();
        closure.init(seed);
        closure.solve(BTreeSet::new(), |s| self.trans.nil(s).iter().map(|e| e.to))
    }

    /// Replace every epsilon edge by the direct symbol edges it enables, then
    /// prune everything unreachable from the initial states
    ///
    /// State `s` gains an edge on `x` to `t` whenever some state in its
    /// epsilon-closure has an edge on `x` to `t`; the edge keeps its output
    /// token.  A state becomes final if its closure contains a final state.
    ///
    /// Automata with strong iteration are Büchi automata, where a final
    /// state only counts when a run actually passes through it.  There the
    /// edge on `x` also reaches every state in the epsilon-closure of `t`,
    /// and finality is not spread backwards along epsilon edges: only the
    /// original finals stay final, plus initial states with no incoming
    /// edges whose closure is final.  Those are visited at most once.
    pub fn remove_epsilon(&mut self) {
        let before = self.trans.edge_count();
        let buchi = self.mode.has_strong_iteration();
        let closures: Vec<_> = self.state_ids().map(|s| self.epsilon_closure(s)).collect();
        let mut trans = Transitions::new();
        let mut finals = vec![];
        let mut entry_finals = vec![];

        for (state, closure) in self.state_ids().zip(&closures) {
            for &member in closure {
                for (by, edges) in self.trans.node(member).into_iter().flat_map(Node::edges) {
                    let Some(by) = by else { continue };

                    for edge in edges {
                        if buchi {
                            for &to in &closures[edge.to.index()] {
                                trans.connect(
                                    state,
                                    Some(by.clone()),
                                    Edge::new(to, edge.out.clone()),
                                );
                            }
                        } else {
                            trans.connect(state, Some(by.clone()), edge.clone());
                        }
                    }
                }
            }

            let reaches_final = closure.iter().any(|&c| self.is_final(c));
            if (!buchi && reaches_final) || self.is_final(state) {
                finals.push(state);
            } else if reaches_final && self.is_initial(state) {
                entry_finals.push(state);
            }
        }

        if !entry_finals.is_empty() {
            let entered: HashSet<_> = trans
                .iter()
                .flat_map(|(_, _, edges)| edges.iter().map(|e| e.to))
                .collect();
            finals.extend(entry_finals.into_iter().filter(|s| !entered.contains(s)));
        }

        tracing::trace!(before, after = trans.edge_count(), buchi, "Eliminated epsilon edges");

        self.trans = trans;
        self.finals = finals;
        self.prune_unreachable();
    }

    /// The states reachable from any initial state
    #[must_use]
    pub fn reachable(&self) -> HashSet<StateId> {
        let mut closure = ClosureBuilder::default();
        closure.init(self.initial.iter().copied());
        closure.solve(HashSet::new(), |s| {
            self.trans
                .node(s)
                .into_iter()
                .flat_map(Node::edges)
                .flat_map(|(_, v)| v.iter().map(|e| e.to))
        })
    }

    /// Discard unreachable states, transitions out of them, and edges into
    /// them
    pub fn prune_unreachable(&mut self) {
        let reachable = self.reachable();
        self.retain(|s| reachable.contains(&s));
    }
}
