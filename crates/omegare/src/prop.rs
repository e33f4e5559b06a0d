//! Proptest strategies for expressions, plus a naive matcher to check
//! compiled automata against

use std::fmt;

use proptest::prelude::*;

/// Expression tree over single-character symbols
#[derive(Debug, Clone, PartialEq)]
pub enum Regex {
    Alt(Vec<Regex>),
    Cat(Vec<Regex>),
    Star(Box<Regex>),
    Lit(char),
    Eps,
}

/// Renders in the plain-mode grammar, parenthesizing every operand
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alt(v) => {
                f.write_str("(")?;
                for (i, re) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{re}")?;
                }
                f.write_str(")")
            },
            Self::Cat(v) => v.iter().try_for_each(|re| write!(f, "({re})")),
            Self::Star(re) => write!(f, "({re})*"),
            Self::Lit(c) => write!(f, "{c}"),
            Self::Eps => f.write_str("EPS"),
        }
    }
}

impl Regex {
    /// Backtracking membership test
    #[must_use]
    pub fn matches(&self, word: &[char]) -> bool {
        match self {
            Self::Alt(v) => v.iter().any(|re| re.matches(word)),
            Self::Cat(v) => Self::matches_cat(v, word),
            Self::Star(re) => {
                word.is_empty()
                    || (1..=word.len()).any(|i| re.matches(&word[..i]) && self.matches(&word[i..]))
            },
            Self::Lit(c) => word == [*c],
            Self::Eps => word.is_empty(),
        }
    }

    fn matches_cat(v: &[Regex], word: &[char]) -> bool {
        match v.split_first() {
            None => word.is_empty(),
            Some((head, tail)) => (0..=word.len())
                .any(|i| head.matches(&word[..i]) && Self::matches_cat(tail, &word[i..])),
        }
    }
}

pub fn re(
    depth: u32,
    tree_size: u32,
    branch_size: u32,
    chr: impl Strategy<Value = char> + 'static,
) -> impl Strategy<Value = Regex> {
    prop_oneof![4 => chr.prop_map(Regex::Lit), 1 => Just(Regex::Eps)].prop_recursive(
        depth,
        tree_size,
        branch_size,
        move |s| {
            let size = 1..=usize::try_from(branch_size).unwrap();
            prop_oneof![
                prop::collection::vec(s.clone(), size.clone()).prop_map(Regex::Alt),
                prop::collection::vec(s.clone(), size).prop_map(Regex::Cat),
                s.prop_map(|r| Regex::Star(r.into())),
            ]
        },
    )
}

/// Every word over `alphabet` of at most `max_len` symbols, shortest first
#[must_use]
pub fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut layer = vec![String::new()];
    let mut out = layer.clone();

    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|w| {
                alphabet.iter().map(move |&c| {
                    let mut w = w.clone();
                    w.push(c);
                    w
                })
            })
            .collect();
        out.extend(layer.iter().cloned());
    }

    out
}

#[cfg(test)]
mod test {
    use super::{Regex, words};

    #[test]
    fn rendering() {
        let re = Regex::Cat(vec![
            Regex::Lit('x'),
            Regex::Star(Regex::Alt(vec![Regex::Lit('y'), Regex::Eps]).into()),
        ]);
        assert_eq!(re.to_string(), "(x)(((y|EPS))*)");
    }

    #[test]
    fn reference_matcher() {
        let re = Regex::Cat(vec![
            Regex::Lit('x'),
            Regex::Star(Regex::Lit('x').into()),
            Regex::Lit('y'),
        ]);
        assert!(re.matches(&['x', 'x', 'y']));
        assert!(!re.matches(&['y']));
        assert!(Regex::Cat(vec![]).matches(&[]));
        assert!(!Regex::Alt(vec![]).matches(&[]));
    }

    #[test]
    fn word_enumeration() {
        let w = words(&['x', 'y'], 2);
        assert_eq!(w, ["", "x", "y", "xx", "xy", "yx", "yy"]);
    }
}
