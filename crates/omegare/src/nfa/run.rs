use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;

use super::Automaton;
use crate::{closure_builder::ClosureBuilder, state::StateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Acceptance cannot be checked for an empty word")]
    EmptyWord,
    #[error("No input symbol matches at byte {pos}")]
    UnknownSymbol { pos: usize },
    #[error("Output queries require a Mealy machine")]
    NotMealy,
}

impl Automaton {
    fn start_set(&self) -> BTreeSet<StateId> { self.epsilon_closure_of(self.initial.iter().copied()) }

    fn advance(&self, from: &BTreeSet<StateId>, sym: &str) -> BTreeSet<StateId> {
        self.epsilon_closure_of(
            from.iter()
                .flat_map(|&s| self.trans.step(s, sym))
                .map(|e| e.to),
        )
    }

    fn any_final(&self, set: &BTreeSet<StateId>) -> bool { set.iter().any(|&s| self.is_final(s)) }

    /// Check whether `text` spells a word of the language.  Every way of
    /// splitting `text` into input symbols is considered; text that cannot be
    /// split is rejected.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        let mut frontier = BTreeMap::from([(0, self.start_set())]);

        while let Some((pos, states)) = frontier.pop_first() {
            if pos == text.len() {
                return self.any_final(&states);
            }

            for sym in &self.alphabet {
                if sym.is_empty() || !text[pos..].starts_with(sym.as_str()) {
                    continue;
                }

                let next = self.advance(&states, sym.as_str());
                if !next.is_empty() {
                    frontier
                        .entry(pos + sym.as_str().len())
                        .or_insert_with(BTreeSet::new)
                        .extend(next);
                }
            }
        }

        false
    }

    /// Check whether the given sequence of input symbols is accepted
    ///
    /// # Errors
    /// Returns [`QueryError::EmptyWord`] if `word` has no symbols.
    pub fn accepts_word<S: AsRef<str>>(&self, word: &[S]) -> Result<bool, QueryError> {
        if word.is_empty() {
            return Err(QueryError::EmptyWord);
        }

        let mut states = self.start_set();
        for sym in word {
            states = self.advance(&states, sym.as_ref());
            if states.is_empty() {
                return Ok(false);
            }
        }

        Ok(self.any_final(&states))
    }

    /// Collect every output string produced by an accepting run over `text`
    ///
    /// # Errors
    /// Fails if this is not a Mealy machine, or if a reachable position in
    /// `text` starts with no input symbol at all.
    pub fn outputs(&self, text: &str) -> Result<BTreeSet<String>, QueryError> {
        if !self.mode.has_outputs() {
            return Err(QueryError::NotMealy);
        }

        let closure = |seed: BTreeSet<(StateId, String)>| {
            let mut closure = ClosureBuilder::default();
            closure.init(seed);
            closure.solve(BTreeSet::new(), |(s, o): (StateId, String)| {
                self.trans
                    .nil(s)
                    .iter()
                    .map(move |e| (e.to, o.clone()))
                    .collect::<Vec<_>>()
            })
        };

        let start = self.initial.iter().map(|&s| (s, String::new())).collect();
        let mut frontier = BTreeMap::from([(0, closure(start))]);
        let mut stuck = None;

        while let Some((pos, configs)) = frontier.pop_first() {
            if pos == text.len() {
                let outs: BTreeSet<_> = configs
                    .into_iter()
                    .filter(|(s, _)| self.is_final(*s))
                    .map(|(_, o)| o)
                    .collect();

                return match (outs.is_empty(), stuck) {
                    (true, Some(pos)) => Err(QueryError::UnknownSymbol { pos }),
                    _ => Ok(outs),
                };
            }

            let mut matched = false;
            for sym in &self.alphabet {
                if sym.is_empty() || !text[pos..].starts_with(sym.as_str()) {
                    continue;
                }
                matched = true;

                let next: BTreeSet<_> = configs
                    .iter()
                    .flat_map(|(s, o)| {
                        self.trans.step(*s, sym.as_str()).iter().map(move |e| {
                            let mut o = o.clone();
                            o.extend(e.out.as_ref().map(|t| t.as_str()));
                            (e.to, o)
                        })
                    })
                    .collect();

                if !next.is_empty() {
                    frontier
                        .entry(pos + sym.as_str().len())
                        .or_insert_with(BTreeSet::new)
                        .extend(closure(next));
                }
            }

            if !matched {
                stuck.get_or_insert(pos);
            }
        }

        stuck.map_or_else(|| Ok(BTreeSet::new()), |pos| Err(QueryError::UnknownSymbol { pos }))
    }

    /// [`outputs`](Self::outputs) with every output string reversed
    ///
    /// # Errors
    /// Fails under the same conditions as [`outputs`](Self::outputs).
    pub fn outputs_reversed(&self, text: &str) -> Result<BTreeSet<String>, QueryError> {
        self.outputs(text)
            .map(|outs| outs.into_iter().map(|o| o.chars().rev().collect()).collect())
    }

    /// Büchi acceptance of the ultimately periodic word `prefix · cycle^ω`:
    /// some run visits a final state infinitely often.  An empty cycle
    /// denotes no infinite word and is rejected.
    ///
    /// Epsilon edges are followed, but visits to final states are only
    /// counted for states a run rests in after reading a symbol, so the
    /// check is exact for epsilon-free automata.
    #[must_use]
    pub fn accepts_lasso<S: AsRef<str>, T: AsRef<str>>(&self, prefix: &[S], cycle: &[T]) -> bool {
        if cycle.is_empty() {
            return false;
        }

        let mut start = self.start_set();
        for sym in prefix {
            start = self.advance(&start, sym.as_ref());
        }

        let n = cycle.len();
        let succ = |(s, i): (StateId, usize)| {
            self.advance(&[s].into_iter().collect(), cycle[i].as_ref())
                .into_iter()
                .map(move |t| (t, (i + 1) % n))
        };

        let mut closure = ClosureBuilder::default();
        closure.init(start.into_iter().map(|s| (s, 0)));
        let reachable = closure.solve(HashSet::new(), succ);

        reachable
            .iter()
            .filter(|(s, _)| self.is_final(*s))
            .any(|&node| {
                let mut closure = ClosureBuilder::default();
                closure.init(succ(node));
                closure.solve(HashSet::new(), succ).contains(&node)
            })
    }
}
