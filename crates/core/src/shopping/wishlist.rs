//! Wishlist of saved shoes.

use serde::{Deserialize, Serialize};

use crate::types::ShoeId;

/// Saved shoes, most recently added first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    ids: Vec<ShoeId>,
}

impl Wishlist {
    #[must_use]
    pub fn ids(&self) -> &[ShoeId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: ShoeId) -> bool {
        self.ids.contains(&id)
    }

    /// Add `id` at the front, or remove it if already saved.
    ///
    /// Returns `true` if the shoe is saved afterwards.
    pub fn toggle(&mut self, id: ShoeId) -> bool {
        if self.contains(id) {
            self.ids.retain(|saved| *saved != id);
            false
        } else {
            self.ids.insert(0, id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_prepends_and_removes() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.toggle(ShoeId::new(1)));
        assert!(wishlist.toggle(ShoeId::new(2)));
        assert_eq!(wishlist.ids(), &[ShoeId::new(2), ShoeId::new(1)]);

        assert!(!wishlist.toggle(ShoeId::new(1)));
        assert!(!wishlist.contains(ShoeId::new(1)));
        assert_eq!(wishlist.ids(), &[ShoeId::new(2)]);

        wishlist.clear();
        assert!(wishlist.ids().is_empty());
    }
}
