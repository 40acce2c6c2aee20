//! Side-by-side comparison list.

use serde::{Deserialize, Serialize};

use crate::types::ShoeId;

/// Outcome of [`CompareList::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareToggle {
    Added,
    Removed,
    /// The list was full and the shoe was not added.
    Full,
}

/// Up to [`CompareList::MAX`] shoes, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompareList {
    ids: Vec<ShoeId>,
}

impl CompareList {
    pub const MAX: usize = 3;

    #[must_use]
    pub fn ids(&self) -> &[ShoeId] {
        &self.ids
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= Self::MAX
    }

    /// Remove `id` if present, otherwise append it unless the list is full.
    pub fn toggle(&mut self, id: ShoeId) -> CompareToggle {
        if self.remove(id) {
            CompareToggle::Removed
        } else if self.is_full() {
            CompareToggle::Full
        } else {
            self.ids.push(id);
            CompareToggle::Added
        }
    }

    /// Returns `false` if `id` was not in the list.
    pub fn remove(&mut self, id: ShoeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|c| *c != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_respects_limit() {
        let mut compare = CompareList::default();
        for id in 1..=3 {
            assert_eq!(compare.toggle(ShoeId::new(id)), CompareToggle::Added);
        }
        assert_eq!(compare.toggle(ShoeId::new(4)), CompareToggle::Full);
        assert_eq!(
            compare.ids(),
            &[ShoeId::new(1), ShoeId::new(2), ShoeId::new(3)]
        );

        assert_eq!(compare.toggle(ShoeId::new(2)), CompareToggle::Removed);
        assert_eq!(compare.toggle(ShoeId::new(4)), CompareToggle::Added);
        assert_eq!(
            compare.ids(),
            &[ShoeId::new(1), ShoeId::new(3), ShoeId::new(4)]
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let mut compare = CompareList::default();
        compare.toggle(ShoeId::new(7));
        assert!(!compare.remove(ShoeId::new(8)));
        assert!(compare.remove(ShoeId::new(7)));
        compare.toggle(ShoeId::new(9));
        compare.clear();
        assert!(compare.ids().is_empty());
    }
}
