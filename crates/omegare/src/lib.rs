//! Compile regular and omega-regular expressions into finite automata
//!
//! Three dialects share one construction: plain NFAs over single-character
//! symbols, Mealy machines over `[input/output]` pairs, and Büchi automata
//! with the strong-iteration operator `^`.

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alphabet;
mod closure_builder;
mod free;
pub mod nfa;
pub mod re;
pub mod state;

#[cfg(any(test, feature = "proptest"))]
pub mod prop;

pub use alphabet::{Alphabet, Symbol};
pub use nfa::{
    Automaton, Mode, QueryError,
    builder::{AutomatonBuilder, BuildError},
};
pub use re::{
    Converter,
    syntax::{ParseError, ParseErrorKind},
};
pub use state::{State, StateId, StateKey};
