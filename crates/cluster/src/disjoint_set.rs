//! Disjoint-set forest over opaque record keys.
//!
//! Keys are inserted lazily: the first `find` or `union` that mentions a key
//! makes it its own root. Only keys that were mentioned ever appear in
//! [`DisjointSet::groups`].

use std::collections::HashMap;
use std::hash::Hash;

/// Union-find forest with full path compression.
///
/// `union(a, b)` always re-parents the root of `a` under the root of `b`.
/// There is no rank or size balancing; compression on every `find` keeps
/// later lookups short.
#[derive(Debug, Clone)]
pub struct DisjointSet<K> {
    /// parent[k] == k means k is a root.
    parent: HashMap<K, K>,
    /// Keys in first-insertion order, for deterministic group enumeration.
    order: Vec<K>,
}

impl<K: Copy + Eq + Hash> Default for DisjointSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> DisjointSet<K> {
    pub fn new() -> Self {
        Self {
            parent: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Resolve `key` to its root, inserting it as a singleton if unseen.
    ///
    /// Iterative: the first pass walks up to the root, the second rewrites
    /// every node on the path to point at the root directly. After the call,
    /// `parent_of(key) == Some(root)`.
    pub fn find(&mut self, key: K) -> K {
        if !self.parent.contains_key(&key) {
            self.parent.insert(key, key);
            self.order.push(key);
            return key;
        }

        let mut root = key;
        loop {
            match self.parent.get(&root) {
                Some(&p) if p != root => root = p,
                _ => break,
            }
        }

        let mut node = key;
        while node != root {
            match self.parent.insert(node, root) {
                Some(next) => node = next,
                None => break,
            }
        }

        root
    }

    /// Merge the groups containing `a` and `b`.
    ///
    /// Returns true if they were in different groups (and are now merged).
    pub fn union(&mut self, a: K, b: K) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return false;
        }

        self.parent.insert(root_a, root_b);
        true
    }

    pub fn connected(&mut self, a: K, b: K) -> bool {
        self.find(a) == self.find(b)
    }

    /// Whether `key` has entered the forest. Never inserts.
    pub fn contains(&self, key: &K) -> bool {
        self.parent.contains_key(key)
    }

    /// Current parent link of `key`, without resolving or compressing.
    pub fn parent_of(&self, key: &K) -> Option<K> {
        self.parent.get(key).copied()
    }

    /// Bucket every key under its root.
    ///
    /// Groups come out in the order their earliest-inserted member entered
    /// the forest; members keep insertion order within a group.
    pub fn groups(&mut self) -> Vec<Vec<K>> {
        let mut slot_by_root: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<Vec<K>> = Vec::new();

        for i in 0..self.order.len() {
            let key = self.order[i];
            let root = self.find(key);
            let slot = *slot_by_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(key);
        }

        groups
    }

    /// Number of keys in the forest.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
