//! Insertion-ordered map of absolute URL to link text

use std::collections::HashMap;

/// Links found while walking, keyed by absolute URL
///
/// Keys are unique. Re-inserting a URL replaces its name but keeps the
/// position of the first insertion, so iteration follows discovery order.
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or renames an entry
    pub fn insert(&mut self, url: impl Into<String>, name: impl Into<String>) {
        let url = url.into();
        let name = name.into();
        match self.positions.get(&url) {
            Some(&pos) => self.entries[pos].1 = name,
            None => {
                self.positions.insert(url.clone(), self.entries.len());
                self.entries.push((url, name));
            }
        }
    }

    /// Removes the first entry whose name equals `name` and returns its URL
    pub fn take_by_name(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(_, n)| n == name)?;
        let (url, _) = self.entries.remove(pos);
        self.positions.remove(&url);
        for (_, p) in self.positions.iter_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Some(url)
    }

    /// Inserts every entry of `other` in its order
    pub fn merge(&mut self, other: LinkMap) {
        for (url, name) in other.entries {
            self.insert(url, name);
        }
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.positions
            .get(url)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.positions.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs in discovery order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(url, _)| url.as_str())
    }
}
