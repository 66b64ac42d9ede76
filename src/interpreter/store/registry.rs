use std::collections::HashMap;

/// Anything stored in a [`Registry`] is keyed by its own name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A name-keyed collection that remembers insertion order.
///
/// Lookups go through a hash index; iteration follows declaration order so
/// listings and class dumps are stable. A name is unique within a registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry<T> {
    entries: Vec<T>,
    index:   HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { entries: Vec::new(),
               index:   HashMap::new(), }
    }
}

impl<T: Named> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.index.get(name).map(|&i| &mut self.entries[i])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts `item`, replacing and returning an entry with the same name.
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, item: T) -> Option<T> {
        if let Some(&i) = self.index.get(item.name()) {
            return Some(std::mem::replace(&mut self.entries[i], item));
        }
        self.index.insert(item.name().to_string(), self.entries.len());
        self.entries.push(item);
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let position = self.index.remove(name)?;
        let item = self.entries.remove(position);
        self.reindex();
        Some(item)
    }

    /// Keeps only the entries for which `keep` returns true and returns how
    /// many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|item| keep(item));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            self.reindex();
        }
        dropped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }

    /// Registered names in alphabetical order.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(Named::name).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn reindex(&mut self) {
        self.index = self.entries
                         .iter()
                         .enumerate()
                         .map(|(i, item)| (item.name().to_string(), i))
                         .collect();
    }
}
