use super::{Converter, syntax::ParseError};
use crate::nfa::Automaton;

impl Automaton {
    /// Reduce to exactly one initial and one final state
    ///
    /// A state that is both initial and final becomes the only pole if one
    /// exists; otherwise the first initial and the first final state do.
    /// Edges touching any other initial or final state are redirected onto
    /// the matching pole, and the orphaned states are pruned.
    ///
    /// Merging states can enlarge the language when a demoted state has
    /// outgoing edges of its own.
    pub fn make_two_pole(&mut self) {
        let (Some(&first_init), Some(&first_fin)) =
            (self.initial_states().first(), self.final_states().first())
        else {
            return;
        };

        let (init, fin) = self
            .initial_states()
            .iter()
            .copied()
            .find(|&s| self.is_final(s))
            .map_or((first_init, first_fin), |s| (s, s));

        if self.initial_states() == [init] && self.final_states() == [fin] {
            return;
        }

        let redirect = |s| {
            if s == init || s == fin {
                s
            } else if self.is_initial(s) {
                init
            } else if self.is_final(s) {
                fin
            } else {
                s
            }
        };

        let trans = self.transitions().remap(|s| Some(redirect(s)));
        tracing::trace!(
            initial = self.initial_states().len(),
            finals = self.final_states().len(),
            "Collapsing to two poles"
        );

        self.set_transitions(trans);
        self.set_initial(vec![init]);
        self.set_finals(vec![fin]);
        self.prune_unreachable();
    }
}

impl Converter {
    /// Star, then strong iteration, then epsilon elimination: the Büchi
    /// automaton for infinite repetitions of `aut`'s language
    ///
    /// The hub stays the initial state but is not final.  The operand's
    /// finals are the accepting states, and each of them loops back
    /// through the hub.
    #[must_use]
    pub fn make_omega_automaton(&mut self, aut: Automaton) -> Automaton {
        let star = self.kleene_star(aut);
        let mut omega = self.strong_iteration(star);
        omega.remove_epsilon();
        omega
    }

    /// Concatenate two automata that may come from different converters
    ///
    /// Both operands are reduced to two poles first.  If their state tags
    /// overlap, `rhs` is re-tagged above `lhs`; either way this converter's
    /// counter moves past every tag in use.
    ///
    /// The result's accepting states are those of `rhs`, so an infinite
    /// word is accepted only if it eventually stays inside `rhs`.
    #[must_use]
    pub fn make_concatenated_automaton(
        &mut self,
        mut lhs: Automaton,
        mut rhs: Automaton,
    ) -> Automaton {
        lhs.make_two_pole();
        rhs.make_two_pole();

        if let Some(max) = lhs.max_tag() {
            let used: hashbrown::HashSet<_> = lhs.tags().collect();
            if rhs.tags().any(|t| used.contains(&t)) {
                tracing::debug!(by = max + 1, "Re-tagging right operand");
                rhs.retag(max + 1);
            }
        }

        self.free.rebase(lhs.tags().chain(rhs.tags()));

        let mut aut = self.concatenation(lhs, rhs);
        aut.remove_epsilon();
        aut
    }

    /// Convert both expressions with this converter and concatenate the
    /// results, as in `lhs · rhs` where `rhs` typically ends in `^`
    ///
    /// # Errors
    /// Fails if either expression does not parse.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn omega_concat(&mut self, lhs: &str, rhs: &str) -> Result<Automaton, ParseError> {
        let lhs = self.convert(lhs)?;
        let rhs = self.convert(rhs)?;
        Ok(self.make_concatenated_automaton(lhs, rhs))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        nfa::{Automaton, Mode},
        re::Converter,
        state::State,
    };

    /// 0(initial) -x-> 1(final), 0 -y-> 2(final), 3(initial) -z-> 1
    fn forked() -> Automaton {
        let mut a = Automaton::new(Mode::Omega);
        let s: Vec<_> = (0..4).map(|i| a.push_state(State::atomic(i))).collect();
        a.alphabet_mut().extend(["x", "y", "z"]);
        a.connect(s[0], Some("x".into()), s[1], None);
        a.connect(s[0], Some("y".into()), s[2], None);
        a.connect(s[3], Some("z".into()), s[1], None);
        a.set_initial(vec![s[0], s[3]]);
        a.set_finals(vec![s[1], s[2]]);
        a
    }

    #[test]
    fn two_pole_redirects_onto_first_poles() {
        let mut a = forked();
        a.make_two_pole();
        a.assert_consistent();

        assert_eq!(a.state_names().collect::<Vec<_>>(), ["0", "1"]);
        assert_eq!(a.initial_states().len(), 1);
        assert_eq!(a.final_states().len(), 1);
        for w in ["x", "y", "z"] {
            assert!(a.accepts(w), "{w:?}");
        }
        assert!(!a.accepts("xx"));
    }

    #[test]
    fn two_pole_prefers_an_initial_final_state() {
        let mut a = forked();
        let s3 = a.initial_states()[1];
        a.add_final(s3);
        a.make_two_pole();

        assert_eq!(a.state_count(), 1);
        assert_eq!(a.initial_state(), a.final_states()[0]);
        assert!(a.accepts("xyz"));
    }

    #[test]
    fn two_pole_can_enlarge_the_language() {
        let mut a = forked();
        let (s1, s2) = (a.final_states()[0], a.final_states()[1]);
        a.connect(s2, Some("z".into()), s1, None);
        assert!(a.accepts("yz"));
        assert!(!a.accepts("xz"));

        a.make_two_pole();
        a.assert_consistent();
        assert_eq!(a.state_count(), 2);
        assert!(a.accepts("yz"));
        assert!(a.accepts("xz"));
        assert!(a.accepts("xzz"));
    }

    #[test]
    fn two_pole_is_idempotent() {
        let mut conv = Converter::new(Mode::Omega);
        let mut a = conv.convert("x(x)*y").unwrap();
        let before = a.to_text();
        a.make_two_pole();
        assert_eq!(a.to_text(), before);
    }

    #[test]
    fn omega_automaton_repeats_forever() {
        let mut conv = Converter::new(Mode::Omega);
        let x = conv.elementary("x", None);
        let aut = conv.make_omega_automaton(x);
        aut.assert_consistent();

        let hub = aut.initial_state();
        assert!(!aut.transitions().has_epsilon());
        assert!(!aut.is_final(hub));
        assert!(aut.step(hub, "x").contains(&hub));
        assert!(aut.accepts_lasso(&["x"], &["x"]));
        assert!(
            aut.final_states()
                .iter()
                .any(|&f| aut.step(f, "x").contains(&f))
        );
    }

    #[test]
    fn concatenation_examples() {
        let mut conv = Converter::new(Mode::Omega);

        let a = conv.omega_concat("(x(x)*y)", "(xy)^").unwrap();
        a.assert_consistent();
        assert!(a.accepts_lasso(&["x", "x", "y"], &["x", "y"]));
        assert!(a.accepts_lasso(&["x", "y"], &["x", "y"]));
        assert!(!a.accepts_lasso(&["y"], &["x", "y"]));
        assert!(!a.accepts_lasso(&["x", "y"], &["x"]));

        let a = conv.omega_concat("x|y", "y(x)^").unwrap();
        assert!(a.accepts_lasso(&["x", "y"], &["x"]));
        assert!(a.accepts_lasso(&["y", "y"], &["x"]));
        assert!(!a.accepts_lasso(&["x"], &["x"]));
        assert!(!a.accepts_lasso(&["x", "y"], &["y"]));

        let a = conv.omega_concat("a(b|c)", "(c|d)a^").unwrap();
        assert!(a.accepts_lasso(&["a", "b", "c"], &["a"]));
        assert!(a.accepts_lasso(&["a", "c", "d"], &["a"]));
        assert!(!a.accepts_lasso(&["a", "b"], &["a"]));
        assert!(!a.accepts_lasso(&["a", "d", "c"], &["a"]));

        let a = conv.omega_concat("xy", "z^").unwrap();
        assert!(a.accepts_lasso(&["x", "y"], &["z"]));
        assert!(!a.accepts_lasso(&["x"], &["z"]));
        assert!(!a.accepts_lasso(&["x", "y"], &["y"]));
    }

    #[test]
    fn prefix_loops_are_not_accepting() {
        let none: [&str; 0] = [];
        let mut conv = Converter::new(Mode::Omega);

        let a = conv.convert("x*y^").unwrap();
        assert!(!a.accepts_lasso(&none, &["x"]));
        assert!(a.accepts_lasso(&none, &["y"]));
        assert!(a.accepts_lasso(&["x", "x"], &["y"]));
        assert!(!a.accepts_lasso(&["y"], &["x"]));

        let a = conv.omega_concat("x*", "y^").unwrap();
        a.assert_consistent();
        assert!(!a.accepts_lasso(&none, &["x"]));
        assert!(a.accepts_lasso(&none, &["y"]));
        assert!(a.accepts_lasso(&["x"], &["y"]));

        let a = conv.omega_concat("(xz)*", "y^").unwrap();
        assert!(!a.accepts_lasso(&none, &["x", "z"]));
        assert!(a.accepts_lasso(&["x", "z"], &["y"]));
        assert!(!a.accepts_lasso(&["x"], &["y"]));
    }

    #[test]
    fn foreign_operands_are_retagged() {
        let lhs = Converter::new(Mode::Omega).convert("xy").unwrap();
        let rhs = Converter::new(Mode::Omega).convert("z(z)^").unwrap();
        let lhs_max = lhs.max_tag().unwrap();

        let mut conv = Converter::new(Mode::Omega);
        let aut = conv.make_concatenated_automaton(lhs, rhs);

        let mut tags: Vec<_> = aut.tags().collect();
        let n = tags.len();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), n, "tags must stay unique");
        assert!(aut.max_tag().unwrap() > lhs_max);
        assert!(conv.free.peek() > aut.max_tag().unwrap());
        assert!(aut.accepts_lasso(&["x", "y", "z"], &["z"]));
        assert!(!aut.accepts_lasso(&["x"], &["z"]));
    }
}
