//! Literal-style construction macros for documents and values.
//!
//! Multi-token value expressions need parentheses: `doc! { "n": (base * 2) }`.

/// Builds a [`Document`](crate::Document) from `key: value` pairs.
///
/// Keys may be string literals, bare identifiers, or parenthesized
/// expressions. Values go through [`bson!`], so nested `{ .. }` and
/// `[ .. ]` literals work, as does `null`.
///
/// ```
/// use bson_core::doc;
///
/// let person = doc! {
///     "name": "Ada",
///     "age": 36,
///     "tags": ["math", "engines"],
///     "address": { "city": "London" },
///     "nickname": null,
/// };
/// assert_eq!(person.get_str("name"), Some("Ada"));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ($($key:tt : $value:tt),* $(,)?) => {{
        let mut doc = $crate::Document::new();
        $(
            doc.insert($crate::doc_key!($key), $crate::bson!($value));
        )*
        doc
    }};
}

/// Converts a literal-ish token into a [`Bson`](crate::Bson) value.
///
/// `null` becomes [`Bson::Null`](crate::Bson::Null); `{ .. }` and
/// `[ .. ]` nest; anything else goes through `Bson::from`.
#[macro_export]
macro_rules! bson {
    (null) => {
        $crate::Bson::Null
    };
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::Bson::Document($crate::doc! { $($key : $value),* })
    };
    ([ $($value:tt),* $(,)? ]) => {
        $crate::Bson::Array(vec![ $($crate::bson!($value)),* ])
    };
    ($other:expr) => {
        $crate::Bson::from($other)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! doc_key {
    ($key:literal) => {
        $key
    };
    ($key:ident) => {
        stringify!($key)
    };
    ($key:expr) => {
        $key
    };
}

#[cfg(test)]
mod tests {
    use crate::{Bson, Document};

    #[test]
    fn literal_forms() {
        let doc = doc! {
            "s": "text",
            "i": 7,
            "wide": 7i64,
            "f": 1.5,
            "yes": true,
            "nothing": null,
            "nested": { "inner": [1, 2, 3] },
        };
        assert_eq!(doc.len(), 7);
        assert_eq!(doc.get("i"), Some(&Bson::Int32(7)));
        assert_eq!(doc.get("wide"), Some(&Bson::Int64(7)));
        assert_eq!(doc.get("nothing"), Some(&Bson::Null));
        let inner = doc.get_document("nested").and_then(|d| d.get_array("inner"));
        assert_eq!(inner.map(<[Bson]>::len), Some(3));
    }

    #[test]
    fn identifier_keys_and_expression_values() {
        let base = 21;
        let doc = doc! { answer: (base * 2) };
        assert_eq!(doc.get_i32("answer"), Some(42));
    }

    #[test]
    fn empty_forms() {
        assert!(doc! {}.is_empty());
        assert_eq!(bson!([]), Bson::Array(vec![]));
        assert_eq!(bson!({}), Bson::Document(Document::new()));
    }
}
