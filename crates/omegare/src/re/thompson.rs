use super::Converter;
use crate::{alphabet::Symbol, nfa::Automaton};

/// Thompson-style combinators.  Each consumes its operands and reuses their
/// states; only branching and looping operators allocate glue states.
impl Converter {
    /// `{input}`, emitting `output` in Mealy mode (the empty token if none)
    ///
    /// # Panics
    /// Panics if `input` contains the reserved epsilon character.
    #[must_use]
    pub fn elementary(&mut self, input: &str, output: Option<&str>) -> Automaton {
        let mut aut = Automaton::new(self.mode);
        let head = self.push_fresh(&mut aut);
        let tail = self.push_fresh(&mut aut);

        aut.alphabet_mut().insert(input);
        let out = self.mode.has_outputs().then(|| {
            let out = output.unwrap_or_default();
            if !out.is_empty() {
                aut.output_alphabet_mut().insert(out);
            }
            Symbol::new(out)
        });

        aut.connect(head, Some(input.into()), tail, out);
        aut.set_initial(vec![head]);
        aut.set_finals(vec![tail]);
        aut
    }

    /// `{ε}`: one state, both initial and final
    #[must_use]
    pub fn empty_word(&mut self) -> Automaton {
        let mut aut = Automaton::new(self.mode);
        let state = self.push_fresh(&mut aut);
        aut.set_initial(vec![state]);
        aut.set_finals(vec![state]);
        aut
    }

    /// `lhs | rhs`
    #[must_use]
    pub fn disjunction(&mut self, lhs: Automaton, rhs: Automaton) -> Automaton {
        let mut aut = Automaton::new(self.mode);
        let (l_init, l_fin) = aut.absorb(lhs);
        let (r_init, r_fin) = aut.absorb(rhs);
        let head = self.push_fresh(&mut aut);
        let tail = self.push_fresh(&mut aut);

        for init in l_init.into_iter().chain(r_init) {
            aut.connect_nil(head, init);
        }

        for fin in l_fin.into_iter().chain(r_fin) {
            aut.connect_nil(fin, tail);
        }

        aut.set_initial(vec![head]);
        aut.set_finals(vec![tail]);
        tracing::trace!(states = aut.state_count(), "Built disjunction");
        aut
    }

    /// `lhs · rhs`, wiring `lhs`'s final states straight into `rhs`
    #[must_use]
    pub fn concatenation(&mut self, lhs: Automaton, rhs: Automaton) -> Automaton {
        let mut aut = lhs;
        let (r_init, r_fin) = aut.absorb(rhs);

        for fin in aut.final_states().to_vec() {
            for &init in &r_init {
                aut.connect_nil(fin, init);
            }
        }

        aut.set_finals(r_fin);
        aut
    }

    /// `inner*`
    #[must_use]
    pub fn kleene_star(&mut self, inner: Automaton) -> Automaton {
        let mut aut = inner;
        let init = aut.initial_states().to_vec();
        let fin = aut.final_states().to_vec();
        let head = self.push_fresh(&mut aut);
        let tail = self.push_fresh(&mut aut);

        aut.connect_nil(head, tail);
        for &i in &init {
            aut.connect_nil(head, i);
        }

        for &f in &fin {
            aut.connect_nil(f, tail);
            for &i in &init {
                aut.connect_nil(f, i);
            }
        }

        aut.set_initial(vec![head]);
        aut.set_finals(vec![tail]);
        tracing::trace!(states = aut.state_count(), "Built Kleene star");
        aut
    }

    /// `inner^ω`
    ///
    /// A fresh hub becomes the only initial state, loops to itself, enters
    /// `inner` and is re-entered from each of `inner`'s final states.  The
    /// final states are left as they are and serve as the Büchi accepting
    /// states.
    #[must_use]
    pub fn strong_iteration(&mut self, inner: Automaton) -> Automaton {
        let mut aut = inner;
        let init = aut.initial_states().to_vec();
        let hub = self.push_fresh(&mut aut);

        for &i in &init {
            aut.connect_nil(hub, i);
        }

        for f in aut.final_states().to_vec() {
            aut.connect_nil(f, hub);
        }

        aut.connect_nil(hub, hub);
        aut.set_initial(vec![hub]);
        tracing::trace!(states = aut.state_count(), "Built strong iteration");
        aut
    }
}
