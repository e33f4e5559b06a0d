//! Automaton vertices: arena handles and structural state identities

use std::{
    collections::BTreeSet,
    fmt::{self, Display, Write},
};

/// Handle to a state inside one [`Automaton`](crate::Automaton)'s arena
///
/// Handles are only meaningful for the automaton that issued them, and are
/// reissued when an automaton is pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StateId(pub(crate) usize);

impl StateId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize { self.0 }
}

impl Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("State {0} is not elementary and cannot be merged into a composite state")]
    NotElementary(usize),
}

/// Structural identity of a state
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// A fresh state made by one of the construction algorithms
    Atomic(u64),
    /// A synthesized state, e.g. from a merge or product construction
    Composite(Vec<BTreeSet<u64>>),
}

impl StateKey {
    pub fn composite<I: IntoIterator<Item = S>, S: IntoIterator<Item = u64>>(sets: I) -> Self {
        Self::Composite(
            sets.into_iter()
                .map(|s| s.into_iter().collect())
                .collect(),
        )
    }

    /// The single integer set this identity stands for, if there is exactly
    /// one
    #[must_use]
    pub fn elementary_set(&self) -> Option<BTreeSet<u64>> {
        match self {
            Self::Atomic(t) => Some([*t].into_iter().collect()),
            Self::Composite(v) if v.len() == 1 => Some(v[0].clone()),
            Self::Composite(_) => None,
        }
    }

    /// Every integer mentioned by this identity
    pub fn tags(&self) -> Box<dyn Iterator<Item = u64> + '_> {
        match self {
            Self::Atomic(t) => Box::new(std::iter::once(*t)),
            Self::Composite(v) => Box::new(v.iter().flatten().copied()),
        }
    }

    #[must_use]
    pub(crate) fn shifted(&self, by: u64) -> Self {
        match self {
            Self::Atomic(t) => Self::Atomic(t + by),
            Self::Composite(v) => {
                Self::Composite(v.iter().map(|s| s.iter().map(|t| t + by).collect()).collect())
            },
        }
    }
}

impl From<u64> for StateKey {
    #[inline]
    fn from(tag: u64) -> Self { Self::Atomic(tag) }
}

impl From<Vec<BTreeSet<u64>>> for StateKey {
    #[inline]
    fn from(sets: Vec<BTreeSet<u64>>) -> Self { Self::Composite(sets) }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic(t) => write!(f, "{t}"),
            Self::Composite(v) => {
                f.write_char('[')?;
                for (i, set) in v.iter().enumerate() {
                    if i != 0 {
                        f.write_char(',')?;
                    }

                    f.write_char('{')?;
                    for (j, t) in set.iter().enumerate() {
                        if j != 0 {
                            f.write_char(',')?;
                        }
                        write!(f, "{t}")?;
                    }
                    f.write_char('}')?;
                }
                f.write_char(']')
            },
        }
    }
}

/// A vertex of an automaton
///
/// Finality is not stored here; it is a property of the automaton that owns
/// the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    key: StateKey,
    name: Option<String>,
}

impl State {
    #[inline]
    #[must_use]
    pub fn new(key: StateKey) -> Self { Self { key, name: None } }

    #[inline]
    #[must_use]
    pub fn atomic(tag: u64) -> Self { Self::new(StateKey::Atomic(tag)) }

    #[inline]
    #[must_use]
    pub fn composite<I: IntoIterator<Item = S>, S: IntoIterator<Item = u64>>(sets: I) -> Self {
        Self::new(StateKey::composite(sets))
    }

    /// Merge elementary states into one composite state, keeping their order
    ///
    /// # Errors
    /// Fails with the index of the first constituent that is not elementary.
    pub fn composite_of<'a, I: IntoIterator<Item = &'a State>>(parts: I) -> Result<Self, StateError> {
        parts
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.key.elementary_set().ok_or(StateError::NotElementary(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(|v| Self::new(StateKey::Composite(v)))
    }

    #[inline]
    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn set_name<S: Into<String>>(&mut self, name: S) { self.name = Some(name.into()); }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &StateKey { &self.key }

    #[inline]
    #[must_use]
    pub fn secondary_name(&self) -> Option<&str> { self.name.as_deref() }

    #[inline]
    #[must_use]
    pub fn is_elementary(&self) -> bool { self.key.elementary_set().is_some() }

    /// Canonical name derived from the structural identity.  A composite
    /// state with no sets falls back to its secondary name.
    #[must_use]
    pub fn name(&self) -> String {
        match (&self.key, &self.name) {
            (StateKey::Composite(v), Some(n)) if v.is_empty() => n.clone(),
            (k, _) => k.to_string(),
        }
    }

    /// The secondary name if one is set, otherwise [`Self::name`]
    #[must_use]
    pub fn label(&self) -> String { self.name.clone().unwrap_or_else(|| self.name()) }

    #[must_use]
    pub(crate) fn shifted(&self, by: u64) -> Self {
        Self {
            key: self.key.shifted(by),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{State, StateError, StateKey};

    #[test]
    fn names() {
        assert_eq!(State::atomic(7).name(), "7");
        assert_eq!(
            State::composite([vec![1, 2], vec![3]]).name(),
            "[{1,2},{3}]"
        );
        assert_eq!(State::composite([vec![4]]).name(), "[{4}]");
        assert_eq!(State::composite(Vec::<Vec<u64>>::new()).name(), "[]");
        assert_eq!(
            State::composite(Vec::<Vec<u64>>::new())
                .with_name("sink")
                .name(),
            "sink"
        );
    }

    #[test]
    fn label_prefers_secondary_name() {
        let mut s = State::atomic(3);
        assert_eq!(s.label(), "3");
        s.set_name("q3");
        assert_eq!(s.label(), "q3");
        assert_eq!(s.name(), "3");
    }

    #[test]
    fn composite_of_elementary_states() {
        let merged =
            State::composite_of(&[State::atomic(1), State::composite([vec![2, 5]])]).unwrap();
        assert_eq!(merged.key(), &StateKey::composite([vec![1], vec![2, 5]]));
        assert!(!merged.is_elementary());

        assert_eq!(
            State::composite_of(&[State::atomic(0), merged]),
            Err(StateError::NotElementary(1))
        );
    }

    #[test]
    fn shifting_preserves_shape() {
        let s = State::composite([vec![0, 2], vec![1]]).with_name("x");
        let t = s.shifted(10);
        assert_eq!(t.key(), &StateKey::composite([vec![10, 12], vec![11]]));
        assert_eq!(t.secondary_name(), Some("x"));
    }
}
