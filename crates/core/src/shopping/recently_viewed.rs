//! Recently viewed shoes.

use serde::{Deserialize, Serialize};

use crate::types::ShoeId;

/// Most recently viewed first, at most [`RecentlyViewed::MAX`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyViewed {
    ids: Vec<ShoeId>,
}

impl RecentlyViewed {
    pub const MAX: usize = 12;

    #[must_use]
    pub fn ids(&self) -> &[ShoeId] {
        &self.ids
    }

    /// Move `id` to the front, dropping the oldest entry past the limit.
    pub fn track(&mut self, id: ShoeId) {
        self.ids.retain(|seen| *seen != id);
        self.ids.insert(0, id);
        self.ids.truncate(Self::MAX);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
