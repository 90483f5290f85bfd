//! Found files keyed by their file name, for selection and batch actions.

use crate::error::ValidationError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A found file and the name it is shown and selected by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Maps file names (basenames) to the absolute paths found by the latest search.
///
/// Entries iterate in the order they were first inserted. Two matches sharing a
/// basename collapse into one entry: the later path replaces the earlier one but
/// keeps its position. Callers who need every match should keep the search
/// result itself.
#[derive(Debug, Clone, Default)]
pub struct ResultIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}

impl ResultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from search matches, in traversal order.
    pub fn build<P: AsRef<Path>>(matches: &[P]) -> Self {
        let mut index = Self::new();
        for path in matches {
            index.insert(path.as_ref().to_path_buf());
        }
        index
    }

    /// Inserts a path under its basename, returning the path it replaced.
    ///
    /// Paths without a file name component are ignored.
    pub fn insert(&mut self, path: PathBuf) -> Option<PathBuf> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        if let Some(&position) = self.positions.get(&name) {
            return Some(std::mem::replace(&mut self.entries[position].path, path));
        }
        self.positions.insert(name.clone(), self.entries.len());
        self.entries.push(IndexEntry { name, path });
        None
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.positions
            .get(name)
            .map(|&position| self.entries[position].path.as_path())
    }

    /// Like [`get`](Self::get), but a missing name is a [`ValidationError::NotFound`].
    pub fn lookup(&self, name: &str) -> Result<&Path, ValidationError> {
        self.get(name)
            .ok_or_else(|| ValidationError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PathBuf> {
        let position = self.positions.remove(name)?;
        let removed = self.entries.remove(position);
        for entry in &self.entries[position..] {
            if let Some(slot) = self.positions.get_mut(&entry.name) {
                *slot -= 1;
            }
        }
        Some(removed.path)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

impl<'a> IntoIterator for &'a ResultIndex {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keys_by_basename() {
        let index = ResultIndex::build(&["/x/a.txt", "/y/b.txt"]);

        assert_eq!(index.count(), 2);
        assert_eq!(index.get("a.txt"), Some(Path::new("/x/a.txt")));
        assert_eq!(index.get("b.txt"), Some(Path::new("/y/b.txt")));
    }

    #[test]
    fn test_duplicate_basename_last_writer_wins_in_first_position() {
        let index = ResultIndex::build(&["/r/a/dup.txt", "/r/other.txt", "/r/b/dup.txt"]);

        assert_eq!(index.count(), 2);
        assert_eq!(index.get("dup.txt"), Some(Path::new("/r/b/dup.txt")));
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["dup.txt", "other.txt"]);
    }

    #[test]
    fn test_lookup_missing_is_not_found() {
        let index = ResultIndex::new();
        assert!(matches!(
            index.lookup("nope.txt"),
            Err(ValidationError::NotFound(name)) if name == "nope.txt"
        ));
    }

    #[test]
    fn test_remove_keeps_order_and_positions() {
        let mut index = ResultIndex::build(&["/a/1.txt", "/a/2.txt", "/a/3.txt"]);

        assert_eq!(index.remove("1.txt"), Some(PathBuf::from("/a/1.txt")));
        assert_eq!(index.remove("1.txt"), None);
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["2.txt", "3.txt"]);
        assert_eq!(index.get("3.txt"), Some(Path::new("/a/3.txt")));

        index.insert(PathBuf::from("/b/3.txt"));
        assert_eq!(index.get("3.txt"), Some(Path::new("/b/3.txt")));
        assert_eq!(index.count(), 2);
    }

    #[test]
    fn test_clear_empties_index() {
        let mut index = ResultIndex::build(&["/a/1.txt"]);
        index.clear();
        assert!(index.is_empty());
        assert!(!index.contains("1.txt"));
    }
}
