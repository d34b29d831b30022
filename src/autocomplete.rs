use std::collections::HashMap;

use crate::models::Entry;

/// Normalize a name or prefix into an index key.
pub fn normalize_key(s: &str) -> String {
    s.to_lowercase()
}

/// Trie node. Every node is owned by its parent; `entry` is set iff the
/// node terminates a key.
#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
    entry: Option<Entry>,
}

/// In-memory character trie over lowercased catalog names.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    root: Node,
    len: usize,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from entries in order. Later entries with the same key
    /// replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut idx = Self::new();
        for e in entries {
            idx.insert(e);
        }
        idx
    }

    /// Insert an entry at its lowercased name. An existing entry at the same
    /// key is overwritten, frequency included.
    pub fn insert(&mut self, entry: Entry) {
        let key = normalize_key(&entry.name);
        let node = key
            .chars()
            .fold(&mut self.root, |node, c| node.children.entry(c).or_default());

        if node.entry.replace(entry).is_none() {
            self.len += 1;
        }
    }

    /// Return every entry whose key starts with the lowercased prefix, in
    /// depth-first discovery order. A prefix that walks off the trie yields
    /// no matches. The empty prefix yields all entries.
    pub fn search(&self, prefix: &str) -> Vec<Entry> {
        let key = normalize_key(prefix);
        let start = match self.walk(&key) {
            Some(n) => n,
            None => return Vec::new(),
        };

        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if let Some(e) = &node.entry {
                out.push(e.clone());
            }
            stack.extend(node.children.values());
        }

        out
    }

    /// Bump the frequency of the entry at `name` by one and return the new
    /// value. Returns None if `name` isn't a stored key.
    pub fn increment(&mut self, name: &str) -> Option<u64> {
        let key = normalize_key(name);
        let node = key
            .chars()
            .try_fold(&mut self.root, |node, c| node.children.get_mut(&c))?;

        let entry = node.entry.as_mut()?;
        entry.frequency += 1;
        Some(entry.frequency)
    }

    /// Exact lookup of a stored entry.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.walk(&normalize_key(name))?.entry.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn walk(&self, key: &str) -> Option<&Node> {
        key.chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }
}

/// Order matches by descending frequency. The sort is stable: entries with
/// equal frequency keep their discovery order.
pub fn rank(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
}
