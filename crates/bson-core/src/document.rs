//! Ordered document with unique keys.
//!
//! Entries live in an insertion-ordered arena; a side index maps each key
//! to its arena position so lookups stay O(1) without giving up order.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::oid::ObjectId;
use crate::value::Bson;

/// An ordered collection of key/value pairs with unique keys.
///
/// Insertion order is observable everywhere: iteration, equality, and the
/// binary encoding all follow it. Re-inserting an existing key replaces
/// the value but keeps the key's original position.
#[derive(Clone, Default)]
pub struct Document {
    entries: Vec<(String, Bson)>,
    index: HashMap<String, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Bson> {
        let pos = *self.index.get(key)?;
        Some(&self.entries[pos].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Bson> {
        let pos = *self.index.get(key)?;
        Some(&mut self.entries[pos].1)
    }

    /// Inserts or replaces. Returns the previous value when the key was
    /// already present; the key keeps its original position in that case.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Bson>) -> Option<Bson> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes a key, shifting later entries down one position.
    pub fn remove(&mut self, key: &str) -> Option<Bson> {
        let pos = self.index.remove(key)?;
        let (_, value) = self.entries.remove(pos);
        for (shifted, _) in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(shifted) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Bson> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    // Typed lookups: `get` plus a narrowing accessor, no coercion.

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_document(&self, key: &str) -> Option<&Document> {
        self.get(key)?.as_document()
    }

    pub fn get_array(&self, key: &str) -> Option<&[Bson]> {
        self.get(key)?.as_array()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key)?.as_i32()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    pub fn get_object_id(&self, key: &str) -> Option<ObjectId> {
        self.get(key)?.as_object_id()
    }

    /// Equality that ignores entry order: same key set, equal values.
    pub fn eq_unordered(&self, other: &Document) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }

    /// Rebuilds a document from entries whose keys are already unique,
    /// preserving their order. Internal constructor for the sequence
    /// operations, which only ever narrow an existing key set.
    pub(crate) fn from_disjoint_entries(entries: Vec<(String, Bson)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, (key, _))| (key.clone(), pos))
            .collect();
        Document { entries, index }
    }

    pub(crate) fn entries(&self) -> &[(String, Bson)] {
        &self.entries
    }
}

/// Borrowing iterator over `(key, value)` pairs in insertion order.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Bson)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Bson);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a str, &'a Bson);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, Bson);
    type IntoIter = std::vec::IntoIter<(String, Bson)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Bson>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

impl<K: Into<String>, V: Into<Bson>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Order-sensitive: documents with the same pairs in a different order
/// are unequal. Use [`Document::eq_unordered`] for set-like comparison.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.entries.len());
        for (key, value) in &self.entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut doc = Document::new();
        doc.insert("b", 1);
        doc.insert("a", 2);
        doc.insert("c", 3);
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn upsert_keeps_position_and_returns_old() {
        let mut doc = Document::new();
        doc.insert("a", 1);
        doc.insert("b", 2);
        let old = doc.insert("a", "replaced");
        assert_eq!(old, Some(Bson::Int32(1)));
        assert_eq!(doc.len(), 2);
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(doc.get_str("a"), Some("replaced"));
    }

    #[test]
    fn remove_shifts_and_lookups_stay_valid() {
        let mut doc = Document::new();
        doc.insert("a", 1);
        doc.insert("b", 2);
        doc.insert("c", 3);
        assert_eq!(doc.remove("b"), Some(Bson::Int32(2)));
        assert_eq!(doc.remove("b"), None);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get_i32("c"), Some(3));
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let ab: Document = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: Document = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert!(ab.eq_unordered(&ba));
        assert!(!ab.eq_unordered(&[("a", 1)].into_iter().collect()));
    }

    #[test]
    fn typed_lookups_do_not_coerce() {
        let mut doc = Document::new();
        doc.insert("n", 5i64);
        assert_eq!(doc.get_i64("n"), Some(5));
        assert_eq!(doc.get_i32("n"), None);
        assert_eq!(doc.get_str("n"), None);
        assert_eq!(doc.get_i64("missing"), None);
    }

    #[test]
    fn cross_numeric_value_equality_applies_to_documents() {
        let a: Document = [("n", Bson::Int32(5))].into_iter().collect();
        let b: Document = [("n", Bson::Int64(5))].into_iter().collect();
        assert_eq!(a, b);
    }
}
