//! Input and output symbols, and insertion-ordered sets of them

use std::{
    borrow::Borrow,
    fmt::{self, Display},
    sync::Arc,
};

use indexmap::IndexSet;

/// The character reserved for epsilon edges.  It never appears inside a
/// [`Symbol`] held by an [`Alphabet`].
pub const EPSILON_CHAR: char = '\0';

/// An atomic input or output token, compared by value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Symbol(Arc<str>);

impl Symbol {
    #[inline]
    #[must_use]
    pub fn new(s: &str) -> Self { Self(s.into()) }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline]
    #[must_use]
    pub fn is_reserved(&self) -> bool { self.0.contains(EPSILON_CHAR) }
}

impl Borrow<str> for Symbol {
    #[inline]
    fn borrow(&self) -> &str { &self.0 }
}

impl AsRef<str> for Symbol {
    #[inline]
    fn as_ref(&self) -> &str { &self.0 }
}

impl From<&str> for Symbol {
    #[inline]
    fn from(s: &str) -> Self { Self::new(s) }
}

impl From<String> for Symbol {
    #[inline]
    fn from(s: String) -> Self { Self(s.into()) }
}

impl From<char> for Symbol {
    #[inline]
    fn from(c: char) -> Self { Self(c.to_string().into()) }
}

impl Display for Symbol {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// An ordered set of distinct symbols
///
/// Iteration follows insertion order, so automata built from the same
/// expression always list their symbols the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet(IndexSet<Symbol>);

impl Alphabet {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add a symbol if it is not yet present.  Returns whether it was added.
    ///
    /// # Panics
    /// Panics if the symbol contains the reserved epsilon character.
    pub fn insert<S: Into<Symbol>>(&mut self, sym: S) -> bool {
        let sym = sym.into();
        assert!(
            !sym.is_reserved(),
            "Epsilon cannot be part of an alphabet: {sym:?}"
        );
        self.0.insert(sym)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, sym: &str) -> bool { self.0.contains(sym) }

    #[inline]
    #[must_use]
    pub fn get(&self, sym: &str) -> Option<&Symbol> { self.0.get(sym) }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline]
    pub fn iter(&self) -> indexmap::set::Iter<'_, Symbol> { self.0.iter() }

    /// Order-preserving union; symbols already in `self` keep their position
    #[must_use]
    pub fn union(mut self, other: &Alphabet) -> Self {
        self.0.extend(other.0.iter().cloned());
        self
    }

    /// Find the longest symbol that prefixes `s`
    #[must_use]
    pub fn longest_match(&self, s: &str) -> Option<&Symbol> {
        self.0
            .iter()
            .filter(|sym| !sym.is_empty() && s.starts_with(sym.as_str()))
            .max_by_key(|sym| sym.as_str().len())
    }

    /// Split `s` into symbols by repeated longest match.  On failure, returns
    /// the byte offset where no symbol matched.
    pub fn tokenize<'a>(&'a self, s: &str) -> Result<Vec<&'a Symbol>, usize> {
        let mut pos = 0;
        let mut out = vec![];

        while pos < s.len() {
            let sym = self.longest_match(&s[pos..]).ok_or(pos)?;
            pos += sym.as_str().len();
            out.push(sym);
        }

        Ok(out)
    }
}

impl<S: Into<Symbol>> FromIterator<S> for Alphabet {
    fn from_iter<I: IntoIterator<Item = S>>(it: I) -> Self {
        let mut me = Self::new();
        me.extend(it);
        me
    }
}

impl<S: Into<Symbol>> Extend<S> for Alphabet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, it: I) {
        for sym in it {
            self.insert(sym);
        }
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type IntoIter = indexmap::set::Iter<'a, Symbol>;
    type Item = &'a Symbol;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod test {
    use super::{Alphabet, Symbol};

    #[test]
    fn union_keeps_first_seen_order() {
        let a: Alphabet = ["x", "y"].into_iter().collect();
        let b: Alphabet = ["z", "x", "w"].into_iter().collect();

        let u = a.union(&b);
        assert_eq!(
            u.iter().map(Symbol::as_str).collect::<Vec<_>>(),
            ["x", "y", "z", "w"]
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut a = Alphabet::new();
        assert!(a.insert("x"));
        assert!(!a.insert("x"));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn tokenize_prefers_longest_symbol() {
        let a: Alphabet = ["a", "ab", "b"].into_iter().collect();

        let toks = a.tokenize("abba").unwrap();
        assert_eq!(
            toks.into_iter().map(Symbol::as_str).collect::<Vec<_>>(),
            ["ab", "b", "a"]
        );
        assert_eq!(a.tokenize("abc"), Err(2));
    }

    #[test]
    #[should_panic(expected = "Epsilon cannot be part of an alphabet")]
    fn epsilon_is_reserved() { Alphabet::new().insert("\0"); }
}
