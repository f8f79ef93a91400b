use super::*;

use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Set(Vec<u8>, Vec<u8>),
    Pop(Vec<u8>),
    Get(Vec<u8>),
    Clear,
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Short keys over small bytes. Their sums land in a narrow band of
    // buckets, which keeps the clusters long and the probing honest.
    prop::collection::vec(0u8..16, 0..=3)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(any::<u8>(), 0..=4)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), value_strategy()).prop_map(|(k, v)| Op::Set(k, v)),
        30 => key.clone().prop_map(Op::Pop),
        19 => key.clone().prop_map(Op::Get),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=200)
}

/// Distinct entries, plus the same entries in some other order.
fn shuffled_entries_strategy(
) -> impl Strategy<Value = (Vec<(Vec<u8>, Vec<u8>)>, Vec<(Vec<u8>, Vec<u8>)>)> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..40)
        .prop_map(|m| m.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|entries| {
            let shuffled = Just(entries.clone()).prop_shuffle();
            (Just(entries), shuffled)
        })
}

fn validate_map(map: &LinkedHashMap<'_>) {
    assert!(map.capacity().is_power_of_two());
    assert!(map.capacity() >= MIN_CAPACITY);
    assert!(map.len() <= map.capacity());

    let forward: Vec<Entry<'_>> = map.iter().collect();
    let mut backward: Vec<Entry<'_>> = map.iter().rev().collect();
    backward.reverse();
    assert_eq!(forward, backward, "links disagree walking backwards");

    for (i, entry) in forward.iter().enumerate() {
        assert_eq!(Some(*entry), map.get(entry.key));
        assert_eq!(Some(*entry), map.get_by_index(i));
        assert_eq!(Some(i), map.get_index(entry.key));
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_ordered_model(ops in ops_strategy()) {
        let mut map = LinkedHashMap::new();
        let mut model: Vec<(&[u8], &[u8])> = Vec::new();

        for op in &ops {
            match op {
                Op::Set(key, value) => {
                    let previous = map.set(key, value).map(|e| e.value);
                    match model.iter_mut().find(|(k, _)| *k == key.as_slice()) {
                        Some(pair) => {
                            prop_assert_eq!(Some(pair.1), previous);
                            pair.1 = value.as_slice();
                        }
                        None => {
                            prop_assert_eq!(None, previous);
                            model.push((key.as_slice(), value.as_slice()));
                        }
                    }
                }
                Op::Pop(key) => {
                    let popped = map.pop(key).map(|e| e.value);
                    let expected = model
                        .iter()
                        .position(|(k, _)| *k == key.as_slice())
                        .map(|i| model.remove(i).1);
                    prop_assert_eq!(expected, popped);
                }
                Op::Get(key) => {
                    let position =
                        model.iter().position(|(k, _)| *k == key.as_slice());
                    prop_assert_eq!(
                        position.map(|i| model[i].1),
                        map.get(key).map(|e| e.value)
                    );
                    prop_assert_eq!(position, map.get_index(key));
                    prop_assert_eq!(position.is_some(), map.contains(key));
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                    prop_assert_eq!(MIN_CAPACITY, map.capacity());
                }
            }

            prop_assert_eq!(model.len(), map.len());
        }

        validate_map(&map);
        let got: Vec<(&[u8], &[u8])> =
            map.iter().map(|e| (e.key, e.value)).collect();
        prop_assert_eq!(model, got);
    }

    #[test]
    fn prop_order_only_matters_for_ordered_equality(
        (entries, shuffled) in shuffled_entries_strategy()
    ) {
        let a: LinkedHashMap = entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        let b: LinkedHashMap = shuffled
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();

        validate_map(&a);
        validate_map(&b);
        prop_assert!(a.equal(&b));
        prop_assert!(b.equal(&a));
        prop_assert_eq!(entries == shuffled, a.equal_ordered(&b));
        prop_assert!(a.equal_ordered(&a.copy()));
    }

    #[test]
    fn prop_updates_never_reorder(
        (entries, shuffled) in shuffled_entries_strategy()
    ) {
        let mut map: LinkedHashMap = entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        let before = map.keys();

        // rewrite every value, in a different order than they went in
        for (k, v) in shuffled.iter().rev() {
            prop_assert!(map.set(k, v).is_some());
        }

        prop_assert_eq!(before, map.keys());
        validate_map(&map);
    }

    #[test]
    fn prop_extend_appends_in_source_order(
        (left, right) in shuffled_entries_strategy(),
        split in 0usize..40,
    ) {
        let split = split.min(left.len());
        let mut dst: LinkedHashMap = left[..split]
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        let src: LinkedHashMap = right
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        let original = dst.keys();

        dst.extend(&src);

        // the old keys keep the front, everything new follows in src order
        let keys = dst.keys();
        prop_assert_eq!(&original[..], &keys[..original.len()]);
        let appended: Vec<&[u8]> = src
            .keys()
            .into_iter()
            .filter(|k| !original.contains(k))
            .collect();
        prop_assert_eq!(&appended[..], &keys[original.len()..]);
        prop_assert!(dst.equal(&src));
        validate_map(&dst);
    }
}
