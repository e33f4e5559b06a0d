//! Compile expressions into automata

use crate::{
    free::Free,
    nfa::{Automaton, Mode},
    state::{State, StateId},
};

mod omega;
pub mod syntax;
mod thompson;

use syntax::{ParseError, Parser};

/// Expression compiler for one dialect
///
/// A converter owns the counter that tags fresh states, so automata built by
/// the same converter never share a tag and can be composed directly.  Give
/// each thread its own converter.
#[derive(Debug, Default)]
pub struct Converter {
    mode: Mode,
    free: Free,
}

impl Converter {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            free: Free::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode { self.mode }

    /// Parse `text` into an automaton that still has its epsilon edges
    ///
    /// # Errors
    /// Fails if `text` is not a well-formed expression for this dialect.
    pub fn parse(&mut self, text: &str) -> Result<Automaton, ParseError> {
        Parser::new(self, text).parse()
    }

    /// Parse `text` and eliminate epsilon edges.  Every state of the result
    /// is reachable from its initial state.
    ///
    /// # Errors
    /// Fails if `text` is not a well-formed expression for this dialect.
    #[tracing::instrument(level = "debug", skip(self), fields(mode = ?self.mode))]
    pub fn convert(&mut self, text: &str) -> Result<Automaton, ParseError> {
        let mut aut = self.parse(text)?;
        aut.remove_epsilon();

        tracing::debug!(
            states = aut.state_count(),
            edges = aut.transitions().edge_count(),
            "Converted expression"
        );
        Ok(aut)
    }

    fn push_fresh(&mut self, aut: &mut Automaton) -> StateId {
        aut.push_state(State::atomic(self.free.fresh()))
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::Converter;
    use crate::{
        nfa::{Automaton, Mode},
        prop::{Regex, re, words},
    };

    const WORD_LEN: usize = 4;

    fn plain(text: &str) -> Automaton { Converter::new(Mode::Plain).convert(text).unwrap() }

    fn assert_same_language(a: &Automaton, b: &Automaton, alphabet: &[char]) {
        for w in words(alphabet, WORD_LEN) {
            assert_eq!(a.accepts(&w), b.accepts(&w), "Languages differ on {w:?}");
        }
    }

    #[test]
    fn plus_like_repetition() {
        let a = plain("x(x)*y");
        assert!(a.accepts("xxxy"));
        assert!(a.accepts("xy"));
        assert!(!a.accepts("y"));
        assert!(!a.accepts("xxx"));
        assert!(a.is_deterministic());
    }

    #[test]
    fn alternation() {
        let a = plain("x|y");
        assert!(a.accepts("x"));
        assert!(a.accepts("y"));
        assert!(!a.accepts("xy"));
        assert!(!a.accepts(""));
    }

    #[test]
    fn mealy_pairs() {
        let a = Converter::new(Mode::Mealy).convert("[x/a][x/b]").unwrap();
        a.assert_consistent();

        assert_eq!(a.outputs("xx").unwrap().into_iter().collect::<Vec<_>>(), [
            "ab"
        ]);
        assert!(a.outputs("x").unwrap().is_empty());

        let text = a.to_text();
        assert_eq!(text["initialState"].len(), 1);
        assert_eq!(text["outputAlphabet"], ["a", "b"]);
    }

    #[test]
    fn conversions_share_the_counter() {
        let mut conv = Converter::new(Mode::Plain);
        let a = conv.convert("xy").unwrap();
        let b = conv.convert("xy").unwrap();

        assert!(b.tags().min() > a.max_tag());
    }

    fn xy() -> impl Strategy<Value = char> { prop_oneof![Just('x'), Just('y')] }

    fn check_converted(expr: &Regex) -> Automaton {
        let aut = plain(&expr.to_string());
        aut.assert_consistent();
        assert!(!aut.transitions().has_epsilon());
        assert_eq!(aut.reachable().len(), aut.state_count());
        aut
    }

    proptest! {
        #[test]
        fn conversion_matches_reference(expr in re(4, 16, 3, xy())) {
            let aut = check_converted(&expr);

            for w in words(&['x', 'y'], WORD_LEN) {
                let chars: Vec<_> = w.chars().collect();
                assert_eq!(aut.accepts(&w), expr.matches(&chars), "{expr} on {w:?}");
            }
        }

        #[test]
        fn disjunction_commutes(
            l in re(3, 8, 3, xy()),
            r in re(3, 8, 3, xy()),
        ) {
            let a = check_converted(&Regex::Alt(vec![l.clone(), r.clone()]));
            let b = check_converted(&Regex::Alt(vec![r, l]));
            assert_same_language(&a, &b, &['x', 'y']);
        }

        #[test]
        fn concatenation_associates(
            a in re(2, 6, 2, xy()),
            b in re(2, 6, 2, xy()),
            c in re(2, 6, 2, xy()),
        ) {
            let l = check_converted(&Regex::Cat(vec![
                Regex::Cat(vec![a.clone(), b.clone()]),
                c.clone(),
            ]));
            let r = check_converted(&Regex::Cat(vec![a, Regex::Cat(vec![b, c])]));
            assert_same_language(&l, &r, &['x', 'y']);
        }

        #[test]
        fn star_is_closed_under_concatenation(
            expr in re(3, 8, 3, xy()),
        ) {
            let star = Regex::Star(expr.into());
            let once = check_converted(&star);
            let twice = check_converted(&Regex::Cat(vec![star.clone(), star]));

            assert!(once.accepts(""));
            assert_same_language(&once, &twice, &['x', 'y']);
        }

        #[test]
        fn two_pole_preserves_dead_end_finals(
            l in re(3, 8, 3, xy()),
            r in re(3, 8, 3, xy()),
        ) {
            // every final state is entered by the trailing z and has no way out
            let expr = Regex::Alt(vec![
                Regex::Cat(vec![l, Regex::Lit('z')]),
                Regex::Cat(vec![r, Regex::Lit('z')]),
            ]);
            let aut = check_converted(&expr);
            let mut two_pole = aut.clone();
            two_pole.make_two_pole();

            two_pole.assert_consistent();
            assert_eq!(two_pole.initial_states().len(), 1);
            assert_eq!(two_pole.final_states().len(), 1);
            assert_same_language(&aut, &two_pole, &['x', 'y', 'z']);
        }
    }
}
