//! Recursive-descent parser for the expression grammar
//!
//! ```text
//! expr   := term ('|' term)*
//! term   := factor*
//! factor := base ('*' | '^')*
//! base   := '(' expr ')' | 'EPS' | symbol | '[' input '/' output ']'
//! ```
//!
//! An empty term denotes the empty word.  Plain and omega expressions use
//! single characters as symbols; Mealy expressions use bracketed pairs.

use super::Converter;
use crate::{alphabet::EPSILON_CHAR, nfa::Automaton};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// An unclosed `(` or a stray `)`
    #[error("Mismatched parentheses")]
    MismatchedParens,
    /// A Mealy pair missing one of its delimiters
    #[error("Malformed pair, expected {expected:?}")]
    MalformedPair { expected: char },
    /// A Mealy pair with nothing before the `/`
    #[error("Pair has an empty input symbol")]
    EmptyInput,
    #[error("Missing operand for {0:?}")]
    MissingOperand(char),
    /// A character not allowed here in the current mode
    #[error("Unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("Parentheses nested more than {} deep", MAX_NESTING)]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {pos}")]
pub struct ParseError {
    pub pos: usize,
    pub kind: ParseErrorKind,
}

pub type ParseResult = Result<Automaton, ParseError>;

const EPS: &str = "EPS";

/// Deepest parenthesis nesting accepted by the parser
pub const MAX_NESTING: usize = 256;

#[inline]
fn fail<T>(pos: usize, kind: ParseErrorKind) -> Result<T, ParseError> { Err(ParseError { pos, kind }) }

pub(super) struct Parser<'a, 'c> {
    text: &'a str,
    pos: usize,
    depth: usize,
    conv: &'c mut Converter,
}

impl<'a, 'c> Parser<'a, 'c> {
    pub fn new(conv: &'c mut Converter, text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
            conv,
        }
    }

    #[inline]
    fn rest(&self) -> &'a str { &self.text[self.pos..] }

    #[inline]
    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    #[inline]
    fn bump(&mut self, c: char) { self.pos += c.len_utf8(); }

    /// Parse the whole input as one expression
    pub fn parse(mut self) -> ParseResult {
        let aut = self.expr()?;

        match self.peek() {
            None => Ok(aut),
            // term and expr only ever stop early on a ')'
            Some(_) => fail(self.pos, ParseErrorKind::MismatchedParens),
        }
    }

    fn expr(&mut self) -> ParseResult {
        let mut aut = self.term()?;

        while self.peek() == Some('|') {
            self.bump('|');
            let rhs = self.term()?;
            aut = self.conv.disjunction(aut, rhs);
        }

        Ok(aut)
    }

    fn term(&mut self) -> ParseResult {
        let mut aut = None;

        while let Some(c) = self.peek() {
            if matches!(c, '|' | ')') {
                break;
            }

            let rhs = self.factor()?;
            aut = Some(match aut {
                Some(lhs) => self.conv.concatenation(lhs, rhs),
                None => rhs,
            });
        }

        Ok(aut.unwrap_or_else(|| self.conv.empty_word()))
    }

    fn factor(&mut self) -> ParseResult {
        let mut aut = self.base()?;

        while let Some(c) = self.peek() {
            match c {
                '*' => aut = self.conv.kleene_star(aut),
                '^' if self.conv.mode().has_strong_iteration() => {
                    let star = self.conv.kleene_star(aut);
                    aut = self.conv.strong_iteration(star);
                },
                _ => break,
            }
            self.bump(c);
        }

        Ok(aut)
    }

    fn base(&mut self) -> ParseResult {
        let start = self.pos;

        if self.rest().starts_with(EPS) {
            self.pos += EPS.len();
            return Ok(self.conv.empty_word());
        }

        let Some(c) = self.peek() else {
            unreachable!("Factor parsed at end of input")
        };

        match c {
            '(' => {
                if self.depth == MAX_NESTING {
                    return fail(start, ParseErrorKind::TooDeep);
                }

                self.bump(c);
                self.depth += 1;
                let aut = self.expr()?;
                self.depth -= 1;

                if self.peek() == Some(')') {
                    self.bump(')');
                    Ok(aut)
                } else {
                    fail(start, ParseErrorKind::MismatchedParens)
                }
            },
            '*' => fail(start, ParseErrorKind::MissingOperand(c)),
            '^' if self.conv.mode().has_strong_iteration() => {
                fail(start, ParseErrorKind::MissingOperand(c))
            },
            EPSILON_CHAR | '^' => fail(start, ParseErrorKind::UnexpectedChar(c)),
            '[' if self.conv.mode().has_outputs() => {
                let (input, output) = self.pair()?;
                Ok(self.conv.elementary(input, Some(output)))
            },
            c if self.conv.mode().has_outputs() => {
                fail(start, ParseErrorKind::UnexpectedChar(c))
            },
            c => {
                self.bump(c);
                let mut buf = [0; 4];
                Ok(self.conv.elementary(c.encode_utf8(&mut buf), None))
            },
        }
    }

    /// Consume text up to (not including) `delim`, stopping with an error at
    /// end of input or at any character in `stop`
    fn until(&mut self, delim: char, stop: &[char]) -> Result<&'a str, ParseError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c == delim {
                let seg = &self.text[start..self.pos];
                self.bump(c);
                return Ok(seg);
            }

            if stop.contains(&c) {
                break;
            }

            if c == EPSILON_CHAR {
                return fail(self.pos, ParseErrorKind::UnexpectedChar(c));
            }

            self.bump(c);
        }

        fail(self.pos, ParseErrorKind::MalformedPair { expected: delim })
    }

    fn pair(&mut self) -> Result<(&'a str, &'a str), ParseError> {
        debug_assert_eq!(self.peek(), Some('['));
        self.bump('[');

        let at = self.pos;
        let input = self.until('/', &['[', ']'])?;
        if input.is_empty() {
            return fail(at, ParseErrorKind::EmptyInput);
        }

        let output = self.until(']', &['[', '/'])?;
        Ok((input, output))
    }
}
