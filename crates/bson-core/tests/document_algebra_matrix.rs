//! Document sequence algebra across a matrix of inputs.

use bson_core::{doc, Bson, Document};

fn is_int(_: &str, value: &Bson) -> bool {
    value.to_int().is_some()
}

fn sample() -> Document {
    doc! {
        "a": 1,
        "b": "hi",
        "c": [1, 2],
        "d": false,
        "e": null,
        "f": (Bson::MinKey),
        "g": 10,
    }
}

#[test]
fn drop_first_leaves_tail() {
    let tail = sample().drop_first(4);
    let expected = doc! { "e": null, "f": (Bson::MinKey), "g": 10 };
    assert_eq!(tail, expected);
}

#[test]
fn prefix_while_stops_at_first_non_match() {
    let head = sample().prefix_while(is_int);
    assert_eq!(head, doc! { "a": 1 });
}

#[test]
fn split_omits_empty_boundary_pieces() {
    // "a" and "g" are separators at the edges; both boundary pieces are
    // empty and get dropped, leaving a single middle piece.
    let pieces = sample().split_where(is_int);
    let expected = doc! {
        "b": "hi",
        "c": [1, 2],
        "d": false,
        "e": null,
        "f": (Bson::MinKey),
    };
    assert_eq!(pieces, vec![expected]);
}

#[test]
fn split_without_omission_keeps_boundary_pieces() {
    let pieces = sample().split(usize::MAX, false, is_int);
    assert_eq!(pieces.len(), 3);
    assert!(pieces[0].is_empty());
    assert_eq!(pieces[1].len(), 5);
    assert!(pieces[2].is_empty());
}

#[test]
fn split_piece_count_matches_separator_count() {
    let doc = sample();
    let separators = doc.filter(is_int).len();
    let pieces = doc.split(usize::MAX, false, is_int);
    assert_eq!(pieces.len(), separators + 1);

    // Concatenating the pieces reproduces the non-separator entries in
    // order.
    let survivors: Vec<String> = pieces
        .iter()
        .flat_map(|p| p.keys().map(str::to_owned))
        .collect();
    let expected: Vec<String> = doc
        .filter(|k, v| !is_int(k, v))
        .keys()
        .map(str::to_owned)
        .collect();
    assert_eq!(survivors, expected);
}

#[test]
fn empty_document_identities() {
    let empty = Document::new();
    assert_eq!(empty.drop_first(1), empty);
    assert_eq!(empty.drop_last(1), empty);
    assert_eq!(empty.prefix(1), empty);
    assert_eq!(empty.suffix(1), empty);
    assert!(empty.split_where(|_, _| true).is_empty());
    assert_eq!(empty.split(usize::MAX, false, |_, _| true), vec![empty.clone()]);
}

#[test]
fn operations_preserve_relative_order() {
    let doc = sample();
    for derived in [
        doc.drop_first(2),
        doc.drop_last(2),
        doc.suffix(5),
        doc.filter(|_, v| !v.is_null()),
        doc.drop_while(is_int),
    ] {
        let original_positions: Vec<usize> = derived
            .keys()
            .map(|k| doc.keys().position(|o| o == k).unwrap())
            .collect();
        assert!(
            original_positions.windows(2).all(|w| w[0] < w[1]),
            "{derived:?}"
        );
    }
}

#[test]
fn operations_never_mutate_the_receiver() {
    let doc = sample();
    let before = doc.clone();
    let _ = doc.drop_first(3);
    let _ = doc.map_values(|_, _| Bson::Null);
    let _ = doc.split_where(is_int);
    assert_eq!(doc, before);
}

#[test]
fn map_values_touches_values_only() {
    let doc = sample();
    let nulled = doc.map_values(|_, _| Bson::Null);
    assert_eq!(nulled.len(), doc.len());
    let keys: Vec<_> = nulled.keys().collect();
    let original: Vec<_> = doc.keys().collect();
    assert_eq!(keys, original);
    assert!(nulled.values().all(Bson::is_null));
}
