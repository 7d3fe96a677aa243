//! Property-based tests for key compaction

use fiche_format::keymap::{compact, expand, KEY_TABLE};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn table_key() -> impl Strategy<Value = String> {
    prop::sample::select(KEY_TABLE.iter().map(|(long, _)| long.to_string()).collect::<Vec<_>>())
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z {}]{0,12}".prop_map(Value::String),
    ]
}

/// Documents whose object keys all come from the compaction table.
fn known_key_document() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((table_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn expand_inverts_compact(doc in known_key_document()) {
        let compacted = compact(&doc);
        prop_assert_eq!(expand(&compacted), doc);
    }

    #[test]
    fn compaction_is_idempotent_through_expand(doc in known_key_document()) {
        let compacted = compact(&doc);
        prop_assert_eq!(compact(&expand(&compacted)), compacted);
    }

    #[test]
    fn unknown_key_survives_both_directions(doc in known_key_document(), n in any::<i64>()) {
        let mut root = Map::new();
        root.insert("foo".to_string(), Value::from(n));
        root.insert("meta".to_string(), doc);
        let compacted = compact(&Value::Object(root));
        prop_assert_eq!(&compacted["foo"], &Value::from(n));
        prop_assert_eq!(&expand(&compacted)["foo"], &Value::from(n));
    }

    #[test]
    fn compaction_never_grows_key_count(doc in known_key_document()) {
        fn count(v: &Value) -> usize {
            match v {
                Value::Object(m) => m.len() + m.values().map(count).sum::<usize>(),
                Value::Array(a) => a.iter().map(count).sum(),
                _ => 0,
            }
        }
        prop_assert_eq!(count(&compact(&doc)), count(&doc));
    }
}
