use std::collections::{BTreeMap, BTreeSet};

use super::{Automaton, Mode};
use crate::{
    alphabet::{Alphabet, Symbol},
    state::StateId,
};

impl Automaton {
    /// Deterministic text form of the automaton, keyed by section name
    ///
    /// Each transition renders as `from/input/outputs/destinations`, where
    /// the outputs are concatenated in edge order and the destinations are
    /// sorted by name and joined with commas.  Epsilon renders as `ε`.
    #[must_use]
    pub fn to_text(&self) -> BTreeMap<&'static str, Vec<String>> {
        let names = |v: &[StateId]| v.iter().map(|&s| self[s].name()).collect::<Vec<_>>();
        let symbols = |a: &Alphabet| a.iter().map(ToString::to_string).collect::<Vec<_>>();

        let transitions = self
            .trans
            .iter()
            .map(|(from, by, edges)| {
                let outs: String = edges
                    .iter()
                    .filter_map(|e| e.out.as_ref().map(Symbol::as_str))
                    .collect();
                let dests: BTreeSet<_> = edges.iter().map(|e| self[e.to].name()).collect();

                format!(
                    "{}/{}/{outs}/{}",
                    self[from].name(),
                    by.map_or("ε", Symbol::as_str),
                    dests.into_iter().collect::<Vec<_>>().join(","),
                )
            })
            .collect();

        BTreeMap::from([
            ("inputAlphabet", symbols(&self.alphabet)),
            ("outputAlphabet", symbols(&self.outputs)),
            (
                match self.mode {
                    Mode::Mealy => "initialState",
                    Mode::Plain | Mode::Omega => "initialStates",
                },
                names(self.initial.as_slice()),
            ),
            ("finalStates", names(self.finals.as_slice())),
            ("states", self.state_names().collect()),
            ("transitions", transitions),
        ])
    }
}
