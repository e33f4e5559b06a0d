//! The automaton model shared by every dialect

use std::{collections::BTreeSet, ops::Index};

use crate::{
    alphabet::{Alphabet, Symbol},
    state::{State, StateId},
};

pub mod builder;
mod epsilon;
mod run;
mod text;
mod transitions;

pub use run::QueryError;
pub use transitions::{Edge, Node, Transitions};

/// Which dialect an automaton was built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Plain NFA over single-character symbols
    #[default]
    Plain,
    /// Mealy machine: every transition carries an output token
    Mealy,
    /// Büchi automaton; enables strong iteration (`^`)
    Omega,
}

impl Mode {
    #[inline]
    #[must_use]
    pub fn has_outputs(self) -> bool { matches!(self, Self::Mealy) }

    #[inline]
    #[must_use]
    pub fn has_strong_iteration(self) -> bool { matches!(self, Self::Omega) }
}

/// A nondeterministic automaton over an arena of states
///
/// Initial and final states are views into the arena; every state they or
/// the transition relation mention lives in [`Self::states`].
#[derive(Debug, Clone)]
pub struct Automaton {
    mode: Mode,
    alphabet: Alphabet,
    outputs: Alphabet,
    states: Vec<State>,
    initial: Vec<StateId>,
    finals: Vec<StateId>,
    trans: Transitions,
}

impl Index<StateId> for Automaton {
    type Output = State;

    #[inline]
    fn index(&self, id: StateId) -> &State { &self.states[id.0] }
}

impl Automaton {
    pub(crate) fn new(mode: Mode) -> Self {
        Self {
            mode,
            alphabet: Alphabet::new(),
            outputs: Alphabet::new(),
            states: vec![],
            initial: vec![],
            finals: vec![],
            trans: Transitions::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode { self.mode }

    #[inline]
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet { &self.alphabet }

    #[inline]
    #[must_use]
    pub fn output_alphabet(&self) -> &Alphabet { &self.outputs }

    pub fn states(&self) -> impl ExactSizeIterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    #[inline]
    pub fn state_ids(&self) -> impl ExactSizeIterator<Item = StateId> + use<> {
        (0..self.states.len()).map(StateId)
    }

    #[inline]
    #[must_use]
    pub fn state_count(&self) -> usize { self.states.len() }

    #[inline]
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&State> { self.states.get(id.0) }

    pub fn state_names(&self) -> impl Iterator<Item = String> {
        self.states.iter().map(State::name)
    }

    #[inline]
    #[must_use]
    pub fn initial_states(&self) -> &[StateId] { &self.initial }

    /// The first initial state
    ///
    /// # Panics
    /// Panics if the automaton has no initial state, which never happens for
    /// automata produced by this crate.
    #[must_use]
    pub fn initial_state(&self) -> StateId {
        *self
            .initial
            .first()
            .unwrap_or_else(|| unreachable!("Automaton has no initial state"))
    }

    #[inline]
    #[must_use]
    pub fn final_states(&self) -> &[StateId] { &self.finals }

    #[inline]
    #[must_use]
    pub fn is_initial(&self, id: StateId) -> bool { self.initial.contains(&id) }

    #[inline]
    #[must_use]
    pub fn is_final(&self, id: StateId) -> bool { self.finals.contains(&id) }

    #[inline]
    #[must_use]
    pub fn transitions(&self) -> &Transitions { &self.trans }

    /// The states reachable from `from` by reading `sym`
    #[must_use]
    pub fn step(&self, from: StateId, sym: &str) -> Vec<StateId> {
        let mut out = vec![];
        for edge in self.trans.step(from, sym) {
            if !out.contains(&edge.to) {
                out.push(edge.to);
            }
        }
        out
    }

    /// True if no `(state, symbol)` key leads to more than one state and
    /// there are no epsilon edges
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.trans.iter().all(|(_, by, edges)| {
            by.is_some() && edges.iter().map(|e| e.to).collect::<BTreeSet<_>>().len() <= 1
        })
    }

    /// Find the state whose identity is exactly the given integer set
    #[must_use]
    pub fn find_elementary(&self, set: &BTreeSet<u64>) -> Option<StateId> {
        self.states()
            .find(|(_, s)| s.key().elementary_set().as_ref() == Some(set))
            .map(|(i, _)| i)
    }

    /// The largest integer used by any state identity
    #[must_use]
    pub fn max_tag(&self) -> Option<u64> { self.tags().max() }

    pub(crate) fn tags(&self) -> impl Iterator<Item = u64> {
        self.states.iter().flat_map(|s| s.key().tags())
    }

    pub(crate) fn alphabet_mut(&mut self) -> &mut Alphabet { &mut self.alphabet }

    pub(crate) fn output_alphabet_mut(&mut self) -> &mut Alphabet { &mut self.outputs }

    pub(crate) fn push_state(&mut self, state: State) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(state);
        id
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut State { &mut self.states[id.0] }

    pub(crate) fn set_initial(&mut self, initial: Vec<StateId>) { self.initial = initial; }

    pub(crate) fn set_finals(&mut self, finals: Vec<StateId>) { self.finals = finals; }

    pub(crate) fn add_initial(&mut self, id: StateId) {
        if !self.initial.contains(&id) {
            self.initial.push(id);
        }
    }

    pub(crate) fn add_final(&mut self, id: StateId) {
        if !self.finals.contains(&id) {
            self.finals.push(id);
        }
    }

    pub(crate) fn set_transitions(&mut self, trans: Transitions) { self.trans = trans; }

    pub(crate) fn connect(
        &mut self,
        from: StateId,
        by: Option<Symbol>,
        to: StateId,
        out: Option<Symbol>,
    ) -> bool {
        debug_assert!(from.0 < self.states.len() && to.0 < self.states.len());
        self.trans.connect(from, by, Edge::new(to, out))
    }

    #[inline]
    pub(crate) fn connect_nil(&mut self, from: StateId, to: StateId) -> bool {
        self.connect(from, None, to, None)
    }

    /// Move every state and transition of `other` into `self`, unioning the
    /// alphabets.  Returns `other`'s initial and final states, rebased onto
    /// the merged arena.
    pub(crate) fn absorb(&mut self, other: Automaton) -> (Vec<StateId>, Vec<StateId>) {
        let Automaton {
            mode: _,
            alphabet,
            outputs,
            states,
            initial,
            finals,
            trans,
        } = other;

        let offset = self.states.len();
        let rebase = |v: Vec<StateId>| v.into_iter().map(|s| StateId(s.0 + offset)).collect();

        self.states.extend(states);
        self.trans.absorb(trans, offset);
        self.alphabet.extend(alphabet.iter().cloned());
        self.outputs.extend(outputs.iter().cloned());

        (rebase(initial), rebase(finals))
    }

    /// Drop every state for which `keep` is false, along with any transition
    /// touching it, and reissue handles for the survivors in arena order
    pub(crate) fn retain(&mut self, keep: impl Fn(StateId) -> bool) {
        let mut map = vec![None; self.states.len()];
        let mut states = Vec::with_capacity(self.states.len());

        for (i, state) in std::mem::take(&mut self.states).into_iter().enumerate() {
            if keep(StateId(i)) {
                map[i] = Some(StateId(states.len()));
                states.push(state);
            }
        }

        let removed = map.len() - states.len();
        self.states = states;
        self.trans = self.trans.remap(|s| map[s.0]);
        self.initial = self.initial.iter().filter_map(|s| map[s.0]).collect();
        self.finals = self.finals.iter().filter_map(|s| map[s.0]).collect();

        if removed > 0 {
            tracing::debug!(removed, remaining = self.states.len(), "Dropped states");
        }
    }

    /// Shift every state identity up by `by`.  Only handles are used as map
    /// keys, so identities may change freely.
    pub(crate) fn retag(&mut self, by: u64) {
        for state in &mut self.states {
            *state = state.shifted(by);
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let n = self.states.len();
        assert!(!self.initial.is_empty(), "No initial state");
        assert!(self.initial.iter().all(|s| s.0 < n));
        assert!(self.finals.iter().all(|s| s.0 < n));

        for (from, by, edges) in self.trans.iter() {
            assert!(from.0 < n, "Dangling source {from}");
            assert!(!edges.is_empty());
            assert!(by.is_none_or(|b| self.alphabet.contains(b.as_str())));

            for edge in edges {
                assert!(edge.to.0 < n, "Dangling destination {}", edge.to);
                if by.is_some() {
                    assert_eq!(edge.out.is_some(), self.mode.has_outputs());
                } else {
                    assert!(edge.out.is_none(), "Epsilon edges are silent");
                }
            }
        }
    }
}
