use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A map from a key to many values. Unlike a map of sets, values keep the order they were
/// inserted in and may repeat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiMap<K: Ord, V> {
    map: BTreeMap<K, Vec<V>>,
}

impl<K: Ord, V> MultiMap<K, V> {
    pub fn new() -> MultiMap<K, V> {
        MultiMap {
            map: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.map.entry(key).or_insert_with(Vec::new).push(value);
    }

    pub fn get(&self, key: &K) -> &[V] {
        self.map.get(key).map(|values| values.as_slice()).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Vec<V>)> {
        self.map.iter()
    }

    pub fn consume(self) -> BTreeMap<K, Vec<V>> {
        self.map
    }
}

impl<K: Ord, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        MultiMap::new()
    }
}
