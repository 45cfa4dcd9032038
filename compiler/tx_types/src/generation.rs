//! Append-only arena whose handle space survives resets.

use crate::{cache::fatal, ContractViolation};

/// One generation of wrappers.
///
/// Handles are `base + offset`. A reset advances `base` past every handle
/// handed out so far, so a wrapper from an earlier generation never compares
/// equal to one from a later generation.
#[derive(Debug)]
pub(crate) struct Generation<T> {
    base: u32,
    items: Vec<T>,
}

impl<T> Generation<T> {
    pub(crate) fn starting_at(base: u32) -> Self {
        Self {
            base,
            items: Vec::new(),
        }
    }

    /// Append an item and return its raw handle.
    pub(crate) fn push(&mut self, item: T) -> u32 {
        let raw = self.next_raw();
        self.items.push(item);
        raw
    }

    pub(crate) fn get(&self, raw: u32) -> Option<&T> {
        self.items.get(self.offset(raw)?)
    }

    pub(crate) fn get_mut(&mut self, raw: u32) -> Option<&mut T> {
        let offset = self.offset(raw)?;
        self.items.get_mut(offset)
    }

    /// Drop every item; handles issued so far become stale.
    pub(crate) fn reset(&mut self) {
        self.base = self.next_raw();
        self.items.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    fn offset(&self, raw: u32) -> Option<usize> {
        raw.checked_sub(self.base).map(|o| o as usize)
    }

    fn next_raw(&self) -> u32 {
        u32::try_from(self.items.len())
            .ok()
            .and_then(|len| self.base.checked_add(len))
            .unwrap_or_else(|| {
                fatal(&ContractViolation::HandleSpaceExhausted { base: self.base })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Generation;

    #[test]
    fn reset_never_reuses_handles() {
        let mut arena = Generation::starting_at(2);
        let a = arena.push("a");
        let b = arena.push("b");
        assert_eq!((a, b), (2, 3));
        assert_eq!(arena.get(b), Some(&"b"));

        arena.reset();
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 0);
        let c = arena.push("c");
        assert_eq!(c, 4);
        assert_eq!(arena.get(c), Some(&"c"));
    }

    #[test]
    #[should_panic(expected = "binding cache contract violation")]
    fn exhausted_handle_space_is_a_contract_violation() {
        let mut arena = Generation::starting_at(u32::MAX);
        assert_eq!(arena.push(()), u32::MAX);
        arena.push(());
    }

    #[test]
    fn handles_below_base_are_absent() {
        let arena: Generation<u8> = Generation::starting_at(10);
        assert_eq!(arena.get(3), None);
    }
}
