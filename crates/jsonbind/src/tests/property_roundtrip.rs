use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::QuickCheck;

use crate::{
    OwnedEvent, Serialize, Value, from_events,
    tests::utils::bind,
    to_string, to_value,
};

fn tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: serializing a document into the builder reproduces it exactly.
#[test]
fn document_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        to_value(&value) == value
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: a recorded stream replays onto an equal document.
#[test]
fn recorded_events_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let mut recorded: Vec<OwnedEvent> = Vec::new();
        if value.serialize(&mut recorded).is_err() {
            return false;
        }
        let mut rebuilt = Value::Null;
        from_events(&mut rebuilt, &recorded).is_ok() && rebuilt == value
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: compact output is always valid JSON.
#[test]
fn writer_output_is_json_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        serde_json::from_str::<serde_json::Value>(&value.to_string()).is_ok()
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: typed containers survive a trip through JSON text.
#[test]
fn typed_text_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: BTreeMap<String, Vec<Option<i64>>>) -> bool {
        bind::<BTreeMap<String, Vec<Option<i64>>>>(&to_string(&value)).is_ok_and(|v| v == value)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(BTreeMap<String, Vec<Option<i64>>>) -> bool);
}

/// Property: a fixed array binds only from a stream of exactly its length.
#[test]
fn fixed_array_length_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(items: Vec<u16>) -> bool {
        let text = to_string(&items);
        match bind::<[u16; 3]>(&text) {
            Ok(array) => items.len() == 3 && array[..] == items[..],
            Err(errors) => items.len() != 3 && errors.len() == 1,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u16>) -> bool);
}

#[quickcheck_macros::quickcheck]
fn narrow_integers_accept_exactly_their_range(n: i64) -> bool {
    let mut value = 0u8;
    let result = from_events(&mut value, &[OwnedEvent::Int64(n)]);
    match u8::try_from(n) {
        Ok(expected) => result.is_ok() && value == expected,
        Err(_) => result.is_err() && value == 0,
    }
}
