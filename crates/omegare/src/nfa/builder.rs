//! Declare automata from literal state and transition tables

use hashbrown::HashMap;

use super::{Automaton, Mode};
use crate::{
    alphabet::{EPSILON_CHAR, Symbol},
    state::{State, StateId, StateKey},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Transition {index} pairs {outputs} outputs with {inputs} inputs")]
    OutputIndex {
        index: usize,
        inputs: usize,
        outputs: usize,
    },
    #[error("Transition {index} attaches an output to an epsilon edge")]
    EpsilonOutput { index: usize },
    #[error("Input symbol {0:?} is not in the alphabet")]
    UnknownInput(String),
    #[error("Output symbol {0:?} is not in the output alphabet")]
    UnknownOutput(String),
    #[error("No initial state was declared")]
    NoInitial,
}

#[derive(Debug)]
struct Row {
    from: StateId,
    inputs: Vec<String>,
    to: StateId,
    outputs: Vec<String>,
}

/// Deduplicating factory for automata
///
/// States are interned by their [`StateKey`], so the same key always refers
/// to the same state no matter how often it is mentioned.  The input `"\0"`
/// declares an epsilon edge.
#[derive(Debug)]
pub struct AutomatonBuilder {
    aut: Automaton,
    interned: HashMap<StateKey, StateId>,
    rows: Vec<Row>,
}

impl AutomatonBuilder {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            aut: Automaton::new(mode),
            interned: HashMap::new(),
            rows: vec![],
        }
    }

    fn intern<K: Into<StateKey>>(&mut self, key: K) -> StateId {
        let key = key.into();
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }

        let id = self.aut.push_state(State::new(key.clone()));
        self.interned.insert(key, id);
        id
    }

    #[must_use]
    pub fn states<I: IntoIterator<Item = K>, K: Into<StateKey>>(mut self, keys: I) -> Self {
        for key in keys {
            self.intern(key);
        }
        self
    }

    #[must_use]
    pub fn initial<I: IntoIterator<Item = K>, K: Into<StateKey>>(mut self, keys: I) -> Self {
        for key in keys {
            let id = self.intern(key);
            self.aut.add_initial(id);
        }
        self
    }

    #[must_use]
    pub fn finals<I: IntoIterator<Item = K>, K: Into<StateKey>>(mut self, keys: I) -> Self {
        for key in keys {
            let id = self.intern(key);
            self.aut.add_final(id);
        }
        self
    }

    #[must_use]
    pub fn name<K: Into<StateKey>, S: Into<String>>(mut self, key: K, name: S) -> Self {
        let id = self.intern(key);
        self.aut.state_mut(id).set_name(name);
        self
    }

    #[must_use]
    pub fn alphabet<I: IntoIterator<Item = S>, S: Into<Symbol>>(mut self, syms: I) -> Self {
        self.aut.alphabet_mut().extend(syms);
        self
    }

    #[must_use]
    pub fn output_alphabet<I: IntoIterator<Item = S>, S: Into<Symbol>>(mut self, syms: I) -> Self {
        self.aut.output_alphabet_mut().extend(syms);
        self
    }

    /// Declare edges from `from` to `to`, one per input symbol
    ///
    /// With a single input every output becomes its own edge; with several
    /// inputs the `i`th output belongs to the `i`th input.
    #[must_use]
    pub fn transition<F: Into<StateKey>, T: Into<StateKey>>(
        mut self,
        from: F,
        inputs: &[&str],
        to: T,
        outputs: &[&str],
    ) -> Self {
        let from = self.intern(from);
        let to = self.intern(to);
        self.rows.push(Row {
            from,
            inputs: inputs.iter().map(ToString::to_string).collect(),
            to,
            outputs: outputs.iter().map(ToString::to_string).collect(),
        });
        self
    }

    fn check_output(&self, out: &str) -> Result<Option<Symbol>, BuildError> {
        if !out.is_empty() && !self.aut.output_alphabet().contains(out) {
            return Err(BuildError::UnknownOutput(out.into()));
        }

        Ok(Some(out.into()))
    }

    /// Validate every declared transition and produce the automaton
    ///
    /// # Errors
    /// Fails if a transition mentions an undeclared symbol, pairs outputs
    /// with inputs inconsistently, or if no initial state was declared.
    pub fn build(mut self) -> Result<Automaton, BuildError> {
        if self.aut.initial_states().is_empty() {
            return Err(BuildError::NoInitial);
        }

        let mealy = self.aut.mode().has_outputs();

        for (index, row) in std::mem::take(&mut self.rows).into_iter().enumerate() {
            let Row {
                from,
                inputs,
                to,
                outputs,
            } = row;

            if inputs.len() > 1 && !outputs.is_empty() && outputs.len() != inputs.len() {
                return Err(BuildError::OutputIndex {
                    index,
                    inputs: inputs.len(),
                    outputs: outputs.len(),
                });
            }

            for (i, input) in inputs.iter().enumerate() {
                let by = if input.len() == 1 && input.starts_with(EPSILON_CHAR) {
                    if !outputs.is_empty() {
                        return Err(BuildError::EpsilonOutput { index });
                    }
                    None
                } else if self.aut.alphabet().contains(input) {
                    Some(Symbol::new(input))
                } else {
                    return Err(BuildError::UnknownInput(input.clone()));
                };

                let outs = match (by.is_some(), inputs.len(), outputs.as_slice()) {
                    (false, ..) => vec![None],
                    (true, _, []) => vec![mealy.then(|| Symbol::new(""))],
                    (true, 1, outs) => outs
                        .iter()
                        .map(|o| self.check_output(o))
                        .collect::<Result<_, _>>()?,
                    (true, _, outs) => vec![self.check_output(&outs[i])?],
                };

                for out in outs {
                    self.aut.connect(from, by.clone(), to, out);
                }
            }
        }

        Ok(self.aut)
    }
}

#[cfg(test)]
mod test {
    use super::{AutomatonBuilder, BuildError};
    use crate::{nfa::Mode, state::StateKey};

    #[test]
    fn interns_states_by_key() {
        let a = AutomatonBuilder::new(Mode::Plain)
            .alphabet(["x", "y"])
            .states([StateKey::composite([[0]]), StateKey::composite([[1], [2]])])
            .initial([StateKey::composite([[0]])])
            .finals([StateKey::composite([[1], [2]])])
            .transition(StateKey::composite([[0]]), &["x", "y"], StateKey::composite([[1], [2]]), &[])
            .transition(StateKey::composite([[1], [2]]), &["x"], StateKey::composite([[1], [2]]), &[])
            .build()
            .unwrap();

        a.assert_consistent();
        assert_eq!(a.state_count(), 2);
        assert!(a.accepts("yxx"));
        assert!(!a.accepts("yy"));
        assert!(a.is_deterministic());
    }

    #[test]
    fn mealy_outputs_pair_with_inputs() {
        let a = AutomatonBuilder::new(Mode::Mealy)
            .alphabet(["x", "y"])
            .output_alphabet(["a", "b"])
            .initial([0_u64])
            .finals([1_u64])
            .transition(0_u64, &["x", "y"], 1_u64, &["a", "b"])
            .transition(1_u64, &["x"], 1_u64, &["a", "b"])
            .build()
            .unwrap();

        assert_eq!(a.outputs("y").unwrap().into_iter().collect::<Vec<_>>(), ["b"]);
        assert_eq!(
            a.outputs("xx").unwrap().into_iter().collect::<Vec<_>>(),
            ["aa", "ab"]
        );
    }

    #[test]
    fn rejects_malformed_tables() {
        let base = || {
            AutomatonBuilder::new(Mode::Mealy)
                .alphabet(["x", "y"])
                .output_alphabet(["a"])
                .initial([0_u64])
        };

        assert_eq!(
            base().transition(0_u64, &["x", "y"], 1_u64, &["a"]).build().unwrap_err(),
            BuildError::OutputIndex {
                index: 0,
                inputs: 2,
                outputs: 1
            }
        );
        assert_eq!(
            base().transition(0_u64, &["z"], 1_u64, &[]).build().unwrap_err(),
            BuildError::UnknownInput("z".into())
        );
        assert_eq!(
            base().transition(0_u64, &["x"], 1_u64, &["q"]).build().unwrap_err(),
            BuildError::UnknownOutput("q".into())
        );
        assert_eq!(
            base().transition(0_u64, &["\0"], 1_u64, &["a"]).build().unwrap_err(),
            BuildError::EpsilonOutput { index: 0 }
        );
        assert_eq!(
            AutomatonBuilder::new(Mode::Plain).build().unwrap_err(),
            BuildError::NoInitial
        );
    }

    #[test]
    fn epsilon_rows() {
        let mut a = AutomatonBuilder::new(Mode::Plain)
            .alphabet(["x"])
            .initial([0_u64])
            .finals([2_u64])
            .transition(0_u64, &["\0"], 1_u64, &[])
            .transition(1_u64, &["x"], 2_u64, &[])
            .build()
            .unwrap();

        assert!(a.transitions().has_epsilon());
        assert!(a.accepts("x"));
        a.remove_epsilon();
        assert!(!a.transitions().has_epsilon());
        assert!(a.accepts("x"));
    }
}
