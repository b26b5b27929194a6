//! Property-based tests for schema repair.

use super::Repairer;
use crate::policy::{ExtraKeyAction, MissingKeyAction, Policy};
use crate::schema::DefaultSchema;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::path::Path;

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
        prop::collection::vec(any::<u8>().prop_map(Value::from), 0..3).prop_map(Value::Array),
    ]
}

fn map_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(("[a-f]{1,2}", scalar_strategy()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn schema_strategy() -> impl Strategy<Value = DefaultSchema> {
    map_strategy().prop_map(|defaults| DefaultSchema::from_map(defaults).unwrap())
}

fn policy_strategy() -> impl Strategy<Value = Policy> {
    (
        prop_oneof![
            Just(MissingKeyAction::UseDefault),
            Just(MissingKeyAction::UseDefaultSorted),
            Just(MissingKeyAction::Reset),
        ],
        prop_oneof![
            Just(ExtraKeyAction::Delete),
            Just(ExtraKeyAction::DeleteSorted),
            Just(ExtraKeyAction::Reset),
            Just(ExtraKeyAction::Keep),
        ],
    )
        .prop_map(|(missing, extra)| {
            Policy::default()
                .with_missing_key(missing)
                .with_extra_key(extra)
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // A second repair never finds anything left to change
    #[test]
    fn repair_is_idempotent(
        schema in schema_strategy(),
        policy in policy_strategy(),
        data in map_strategy()
    ) {
        let repairer = Repairer::new(&schema, &policy, Path::new("prop.json"));
        let first = repairer.repair(data).unwrap();
        let second = repairer.repair(first.data.clone()).unwrap();

        prop_assert!(!second.dirty);
        prop_assert_eq!(second.data, first.data);
    }

    // Every schema key exists after repair
    #[test]
    fn repair_fills_every_schema_key(
        schema in schema_strategy(),
        policy in policy_strategy(),
        data in map_strategy()
    ) {
        let repaired = Repairer::new(&schema, &policy, Path::new("prop.json"))
            .repair(data)
            .unwrap();

        for entry in schema.entries() {
            let value = repaired.data.get(entry.key());
            prop_assert!(value.is_some());
            let kind = crate::schema::ValueKind::of(value.unwrap());
            prop_assert!(entry.kind().accepts(kind));
        }
    }

    // Data that already matches the defaults is never dirty
    #[test]
    fn defaults_are_clean(schema in schema_strategy(), policy in policy_strategy()) {
        let repaired = Repairer::new(&schema, &policy, Path::new("prop.json"))
            .repair(schema.defaults())
            .unwrap();

        prop_assert!(!repaired.dirty);
        prop_assert!(repaired.report.is_empty());
    }
}
