//! In-memory set of favorite product ids.

use foldhash::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: HashSet<String>,
}

impl Favorites {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Removes `id` if present, adds it otherwise. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Value form of [`Favorites::toggle`].
pub fn toggle(mut set: Favorites, id: &str) -> Favorites {
    set.toggle(id);
    set
}
