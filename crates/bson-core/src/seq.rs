//! Sequence operations over documents.
//!
//! Every operation here is pure: it reads the receiver, clones the
//! entries it keeps, and returns a fresh document. Counts clamp to the
//! document length instead of panicking.

use crate::document::Document;
use crate::value::Bson;

impl Document {
    /// Entries satisfying the predicate, in their original order.
    pub fn filter(&self, mut predicate: impl FnMut(&str, &Bson) -> bool) -> Document {
        let kept = self
            .entries()
            .iter()
            .filter(|(key, value)| predicate(key, value))
            .cloned()
            .collect();
        Document::from_disjoint_entries(kept)
    }

    /// Same keys in the same order, each value rewritten by `transform`.
    pub fn map_values(&self, mut transform: impl FnMut(&str, &Bson) -> Bson) -> Document {
        let mapped = self
            .entries()
            .iter()
            .map(|(key, value)| (key.clone(), transform(key, value)))
            .collect();
        Document::from_disjoint_entries(mapped)
    }

    /// Everything after the first `count` entries.
    pub fn drop_first(&self, count: usize) -> Document {
        let start = count.min(self.len());
        Document::from_disjoint_entries(self.entries()[start..].to_vec())
    }

    /// Everything before the last `count` entries.
    pub fn drop_last(&self, count: usize) -> Document {
        let end = self.len() - count.min(self.len());
        Document::from_disjoint_entries(self.entries()[..end].to_vec())
    }

    /// Skips the longest prefix satisfying the predicate, keeps the rest.
    /// The predicate stops being consulted at the first failure.
    pub fn drop_while(&self, mut predicate: impl FnMut(&str, &Bson) -> bool) -> Document {
        let start = self.prefix_len(&mut predicate);
        Document::from_disjoint_entries(self.entries()[start..].to_vec())
    }

    /// At most the first `max_length` entries.
    pub fn prefix(&self, max_length: usize) -> Document {
        let end = max_length.min(self.len());
        Document::from_disjoint_entries(self.entries()[..end].to_vec())
    }

    /// The longest prefix satisfying the predicate. Together with
    /// [`drop_while`](Self::drop_while) this partitions the document.
    pub fn prefix_while(&self, mut predicate: impl FnMut(&str, &Bson) -> bool) -> Document {
        let end = self.prefix_len(&mut predicate);
        Document::from_disjoint_entries(self.entries()[..end].to_vec())
    }

    /// At most the last `max_length` entries.
    pub fn suffix(&self, max_length: usize) -> Document {
        let start = self.len() - max_length.min(self.len());
        Document::from_disjoint_entries(self.entries()[start..].to_vec())
    }

    /// Splits around entries matching `is_separator`. Separator entries
    /// are not part of any piece. After `max_splits` separators have been
    /// consumed the remainder, separators included, becomes the final
    /// piece. With `omit_empty`, empty pieces are dropped.
    pub fn split(
        &self,
        max_splits: usize,
        omit_empty: bool,
        mut is_separator: impl FnMut(&str, &Bson) -> bool,
    ) -> Vec<Document> {
        let mut pieces = Vec::new();
        let mut current: Vec<(String, Bson)> = Vec::new();
        let mut splits = 0;
        for (key, value) in self.entries() {
            if splits < max_splits && is_separator(key, value) {
                if !omit_empty || !current.is_empty() {
                    pieces.push(Document::from_disjoint_entries(std::mem::take(
                        &mut current,
                    )));
                }
                splits += 1;
            } else {
                current.push((key.clone(), value.clone()));
            }
        }
        if !omit_empty || !current.is_empty() {
            pieces.push(Document::from_disjoint_entries(current));
        }
        pieces
    }

    /// [`split`](Self::split) with no split limit and empty pieces
    /// omitted.
    pub fn split_where(&self, is_separator: impl FnMut(&str, &Bson) -> bool) -> Vec<Document> {
        self.split(usize::MAX, true, is_separator)
    }

    fn prefix_len(&self, predicate: &mut impl FnMut(&str, &Bson) -> bool) -> usize {
        self.entries()
            .iter()
            .position(|(key, value)| !predicate(key, value))
            .unwrap_or(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        [
            ("a", Bson::Int32(1)),
            ("b", Bson::Int32(2)),
            ("c", Bson::Int32(3)),
            ("d", Bson::Int32(4)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn drop_and_prefix_clamp() {
        let doc = sample();
        assert_eq!(doc.drop_first(0), doc);
        assert!(doc.drop_first(10).is_empty());
        assert!(doc.drop_last(99).is_empty());
        assert_eq!(doc.prefix(99), doc);
        assert_eq!(doc.suffix(99), doc);
        assert!(doc.prefix(0).is_empty());
    }

    #[test]
    fn prefix_and_suffix_take_from_the_right_end() {
        let doc = sample();
        let front: Vec<_> = doc.prefix(2).keys().map(str::to_owned).collect();
        assert_eq!(front, ["a", "b"]);
        let back: Vec<_> = doc.suffix(2).keys().map(str::to_owned).collect();
        assert_eq!(back, ["c", "d"]);
        let middle: Vec<_> = doc
            .drop_first(1)
            .drop_last(1)
            .keys()
            .map(str::to_owned)
            .collect();
        assert_eq!(middle, ["b", "c"]);
    }

    #[test]
    fn while_variants_partition_and_short_circuit() {
        let doc = sample();
        let small = |_: &str, v: &Bson| v.to_i32().is_some_and(|n| n < 3);
        let head = doc.prefix_while(small);
        let tail = doc.drop_while(small);
        assert_eq!(head.len() + tail.len(), doc.len());
        let head_keys: Vec<_> = head.keys().map(str::to_owned).collect();
        assert_eq!(head_keys, ["a", "b"]);
        assert_eq!(tail.get_i32("c"), Some(3));

        // Predicate is not consulted past the first failure.
        let mut calls = 0;
        doc.prefix_while(|_, v| {
            calls += 1;
            v.to_i32() == Some(1)
        });
        assert_eq!(calls, 2);
    }

    #[test]
    fn filter_and_map_preserve_order() {
        let doc = sample();
        let odd = doc.filter(|_, v| v.to_i32().is_some_and(|n| n % 2 == 1));
        let keys: Vec<_> = odd.keys().map(str::to_owned).collect();
        assert_eq!(keys, ["a", "c"]);

        let doubled = doc.map_values(|_, v| match v.to_i32() {
            Some(n) => Bson::Int32(n * 2),
            None => v.clone(),
        });
        assert_eq!(doubled.get_i32("d"), Some(8));
        let mapped_keys: Vec<_> = doubled.keys().map(str::to_owned).collect();
        assert_eq!(mapped_keys, ["a", "b", "c", "d"]);
    }

    #[test]
    fn split_removes_separators() {
        let doc: Document = [
            ("a", Bson::Int32(1)),
            ("sep1", Bson::Null),
            ("b", Bson::Int32(2)),
            ("sep2", Bson::Null),
            ("c", Bson::Int32(3)),
        ]
        .into_iter()
        .collect();
        let pieces = doc.split_where(|_, v| v.is_null());
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|p| p.len() == 1));
        assert!(pieces.iter().flat_map(|p| p.values()).all(|v| !v.is_null()));
    }

    #[test]
    fn split_with_limit_keeps_remainder_intact() {
        let doc: Document = [
            ("a", Bson::Int32(1)),
            ("sep1", Bson::Null),
            ("b", Bson::Int32(2)),
            ("sep2", Bson::Null),
            ("c", Bson::Int32(3)),
        ]
        .into_iter()
        .collect();
        let pieces = doc.split(1, true, |_, v| v.is_null());
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].len(), 1);
        // Remainder keeps the second separator entry.
        assert_eq!(pieces[1].len(), 3);
        assert!(pieces[1].contains_key("sep2"));
    }

    #[test]
    fn split_empty_piece_handling() {
        let doc: Document = [
            ("sep", Bson::Null),
            ("a", Bson::Int32(1)),
            ("sep2", Bson::Null),
        ]
        .into_iter()
        .collect();
        let kept = doc.split(usize::MAX, false, |_, v| v.is_null());
        assert_eq!(kept.len(), 3);
        assert!(kept[0].is_empty());
        assert!(kept[2].is_empty());
        let omitted = doc.split_where(|_, v| v.is_null());
        assert_eq!(omitted.len(), 1);

        let empty = Document::new();
        assert_eq!(empty.split(usize::MAX, false, |_, _| true).len(), 1);
        assert!(empty.split_where(|_, _| true).is_empty());
    }
}
