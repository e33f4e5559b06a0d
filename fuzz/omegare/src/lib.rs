use arbitrary::Arbitrary;
use omegare::{Automaton, Converter, Mode, ParseError};

#[derive(Debug, Clone, Copy, Arbitrary)]
pub enum Dialect {
    Plain,
    Mealy,
    Omega,
}

impl From<Dialect> for Mode {
    fn from(d: Dialect) -> Self {
        match d {
            Dialect::Plain => Mode::Plain,
            Dialect::Mealy => Mode::Mealy,
            Dialect::Omega => Mode::Omega,
        }
    }
}

#[derive(Debug, Arbitrary)]
pub struct Input {
    dialect: Dialect,
    lhs: String,
    rhs: String,
}

fn check(aut: &Automaton) {
    assert!(!aut.transitions().has_epsilon());
    assert_eq!(aut.reachable().len(), aut.state_count());
    assert!(aut.initial_states().iter().all(|&s| aut.state(s).is_some()));
    assert!(aut.final_states().iter().all(|&s| aut.state(s).is_some()));

    for (from, by, edges) in aut.transitions().iter() {
        assert!(aut.state(from).is_some());
        assert!(by.is_some_and(|b| aut.alphabet().contains(b.as_str())));
        assert!(edges.iter().all(|e| aut.state(e.to).is_some()));
    }
}

impl Input {
    /// Conversion either fails with a parse error or yields an epsilon-free,
    /// fully reachable automaton
    pub fn run_convert(self) {
        let mut conv = Converter::new(self.dialect.into());

        match conv.convert(&self.lhs) {
            Ok(aut) => {
                check(&aut);
                let _ = aut.to_text();
            },
            Err(ParseError { pos, .. }) => assert!(pos <= self.lhs.len()),
        }
    }

    pub fn run_omega_concat(self) {
        let mut conv = Converter::new(Mode::Omega);

        if let Ok(aut) = conv.omega_concat(&self.lhs, &self.rhs) {
            check(&aut);
            assert_eq!(aut.initial_states().len(), 1);
        }
    }
}
