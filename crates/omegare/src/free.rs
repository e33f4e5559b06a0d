use std::mem;

/// Monotonic source of fresh state tags, scoped to one [`Converter`]
///
/// [`Converter`]: crate::re::Converter
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct Free(u64);

impl From<u64> for Free {
    fn from(val: u64) -> Self { Self(val) }
}

impl Free {
    #[must_use]
    pub fn fresh(&mut self) -> u64 {
        let succ = self
            .0
            .checked_add(1)
            .unwrap_or_else(|| unreachable!("State tag space exhausted"));
        mem::replace(&mut self.0, succ)
    }

    #[inline]
    #[must_use]
    pub fn peek(&self) -> u64 { self.0 }

    /// Advance past every tag in `used`, never moving backwards
    pub fn rebase<I: IntoIterator<Item = u64>>(&mut self, used: I) {
        if let Some(max) = used.into_iter().max() {
            self.0 = self.0.max(max.saturating_add(1));
        }
    }
}

#[cfg(test)]
mod test {
    use super::Free;

    #[test]
    fn fresh_is_monotonic() {
        let mut free = Free::default();
        assert_eq!(free.fresh(), 0);
        assert_eq!(free.fresh(), 1);
        assert_eq!(free.peek(), 2);
    }

    #[test]
    fn rebase_only_moves_forward() {
        let mut free = Free::from(10);
        free.rebase([3, 4]);
        assert_eq!(free.peek(), 10);
        free.rebase([3, 17, 4]);
        assert_eq!(free.fresh(), 18);
        free.rebase([]);
        assert_eq!(free.peek(), 19);
    }
}
