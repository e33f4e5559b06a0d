use std::{borrow::BorrowMut, collections::BTreeSet, hash::Hash};

use hashbrown::HashSet;

pub trait SetInsert<T> {
    fn insert(&mut self, t: T) -> bool;
}

impl<T: Eq + Hash> SetInsert<T> for HashSet<T> {
    #[inline]
    fn insert(&mut self, t: T) -> bool { HashSet::insert(self, t) }
}

impl<T: Ord> SetInsert<T> for BTreeSet<T> {
    #[inline]
    fn insert(&mut self, t: T) -> bool { BTreeSet::insert(self, t) }
}

/// Depth-first worklist for computing the closure of a seed set under a
/// successor function
///
/// Callers only observe the finished set, never the visiting order, so the
/// worklist is a plain stack.  Epsilon closures follow the stack-based
/// traversal of the conversion algorithm, and the Mealy output search keys
/// its set on `(state, output)` pairs, where order cannot matter either.
#[derive(Debug)]
pub struct ClosureBuilder<T>(Vec<T>);

impl<T> Default for ClosureBuilder<T> {
    #[inline]
    fn default() -> Self { Self(Vec::new()) }
}

impl<T> ClosureBuilder<T> {
    #[inline]
    pub fn init<I: IntoIterator<Item = T>>(&mut self, it: I) {
        assert!(self.0.is_empty());
        self.extend(it);
    }
}

impl<T: Clone> ClosureBuilder<T> {
    pub fn solve<S: BorrowMut<U>, U: SetInsert<T>, I: IntoIterator<Item = T>>(
        &mut self,
        mut set: S,
        f: impl Fn(T) -> I,
    ) -> S {
        {
            let set = set.borrow_mut();

            while let Some(el) = self.0.pop() {
                if set.insert(el.clone()) {
                    self.0.extend(f(el));
                }
            }
        }

        set
    }
}

impl<T> Extend<T> for ClosureBuilder<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, it: I) { self.0.extend(it); }
}
