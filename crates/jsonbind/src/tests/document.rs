use alloc::{string::ToString, vec, vec::Vec};
use core::time::Duration;

use rstest::*;

use crate::{
    Bound, DocumentBuilder, ErrorKind, Event, EventSink, Handler, Map, Number, OwnedEvent,
    ParseError, Value, from_events, from_value, replay,
    tests::{
        fixtures::{Date, USER_ARRAY, User},
        utils::{bind, events, minify},
    },
    to_value,
};

#[rstest]
#[timeout(Duration::from_millis(1_000))]
fn builds_complex_document_tree() {
    let value: Value = bind(USER_ARRAY).unwrap();
    assert_eq!(value.to_string(), minify(USER_ARRAY));

    let first = &value.as_array().unwrap()[0];
    assert_eq!(
        first.get("ID").and_then(Value::as_number),
        Some(&Number::PosInt(7_947_402_710_862_746_952))
    );
    assert!(first.get("block_event").is_some_and(Value::is_object));
}

#[test]
fn keeps_number_representations_apart() {
    let value: Value = bind("[1, -1, 1.5, 18446744073709551615, -9223372036854775808]").unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Number(Number::PosInt(1)),
            Value::Number(Number::NegInt(-1)),
            Value::Number(Number::Float(1.5)),
            Value::Number(Number::PosInt(u64::MAX)),
            Value::Number(Number::NegInt(i64::MIN)),
        ])
    );
}

#[test]
fn scalar_root() {
    let value: Value = bind("\"only\"").unwrap();
    assert_eq!(value, Value::from("only"));
}

#[test]
fn repeated_key_replaces_in_place() {
    let stream = vec![
        OwnedEvent::StartObject,
        OwnedEvent::Key("a".into()),
        OwnedEvent::Uint(1),
        OwnedEvent::Key("b".into()),
        OwnedEvent::Uint(2),
        OwnedEvent::Key("a".into()),
        OwnedEvent::Uint(3),
        OwnedEvent::EndObject(3),
    ];
    let mut value = Value::Null;
    from_events(&mut value, &stream).unwrap();
    assert_eq!(value.to_string(), r#"{"a":3,"b":2}"#);
}

#[rstest]
#[case::key_at_root(vec![OwnedEvent::Key("k".into())])]
#[case::key_in_array(vec![OwnedEvent::StartArray, OwnedEvent::Key("k".into())])]
#[case::value_without_key(vec![OwnedEvent::StartObject, OwnedEvent::Uint(1)])]
#[case::two_keys(vec![
    OwnedEvent::StartObject,
    OwnedEvent::Key("a".into()),
    OwnedEvent::Key("b".into()),
])]
#[case::wrong_end(vec![OwnedEvent::StartArray, OwnedEvent::EndObject(0)])]
#[case::end_after_key(vec![
    OwnedEvent::StartObject,
    OwnedEvent::Key("a".into()),
    OwnedEvent::EndObject(0),
])]
#[case::end_at_root(vec![OwnedEvent::EndArray(0)])]
#[timeout(Duration::from_millis(250))]
fn corrupted_streams_are_fatal(#[case] stream: Vec<OwnedEvent>) {
    let mut value = Value::Null;
    let mut bound = Bound::new(&mut value);
    assert!(replay(&stream, &mut bound).is_err());
    assert!(bound.null().is_err());

    let errors = bound.finish().unwrap_err();
    assert_eq!(errors.kinds(), [ErrorKind::CorruptedDom]);
    assert_eq!(value, Value::Null);
}

#[test]
fn builder_recovers_after_reset() {
    let mut builder = DocumentBuilder::new();
    let mut value = Value::Null;
    assert!(builder.handle(&mut value, Event::EndObject(0)).is_err());
    assert!(builder.has_error());

    builder.reset();
    assert!(!builder.has_error());
    for event in &events(r#"{"a": [true]}"#) {
        builder.handle(&mut value, event.as_event()).unwrap();
    }
    assert_eq!(builder.depth(), 0);
    assert_eq!(value.to_string(), r#"{"a":[true]}"#);
}

#[test]
fn corrupted_dom_message() {
    let mut value = Value::Null;
    let errors = from_events(&mut value, &[OwnedEvent::Key("k".into())]).unwrap_err();
    assert_eq!(
        errors.cause(),
        Some(&ParseError::CorruptedDom {
            message: "key outside of an object"
        })
    );
    insta::assert_snapshot!(errors.to_string(), @"corrupted document: key outside of an object");
}

#[test]
fn typed_values_convert_to_documents_and_back() {
    let users: Vec<User> = bind(USER_ARRAY).unwrap();
    let document = to_value(&users);
    assert_eq!(document.to_string(), minify(USER_ARRAY));

    let mut again: Vec<User> = Vec::new();
    from_value(&mut again, &document).unwrap();
    assert_eq!(again, users);
}

#[test]
fn from_value_reports_typed_errors() {
    let mut map = Map::default();
    map.insert("year".into(), Value::from(2020u64));
    map.insert("month".into(), Value::from("May"));
    let mut date = Date::default();

    let errors = from_value(&mut date, &Value::Object(map)).unwrap_err();
    assert_eq!(errors.path().len(), 1);
    assert_eq!(errors.path()[0].as_key(), Some("month"));
    assert_eq!(errors.cause().map(ParseError::kind), Some(ErrorKind::TypeMismatch));
    assert_eq!(date.year, 2020);
}

#[test]
fn value_kind_names() {
    assert_eq!(Value::Null.kind_name(), "null");
    assert_eq!(Value::from(1.5).kind_name(), "double");
    assert_eq!(Value::from(-1i64).kind_name(), "integer");
    assert_eq!(Value::from(vec![]).kind_name(), "array");
    assert_eq!(Value::from(Map::default()).to_string(), "{}");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(Value::from(f64::NAN).to_string(), "null");
    assert_eq!(Number::from(-0i64), Number::PosInt(0));
    assert_eq!(Number::PosInt(u64::MAX).as_i64(), None);
    assert_eq!(Number::NegInt(-2).as_f64(), -2.0);
}

#[test]
fn event_classification() {
    let key = Event::Key {
        name: "k",
        may_reference: false,
    };
    assert!(Event::StartObject.is_start());
    assert!(Event::EndArray(0).is_end());
    assert!(Event::Double(1.0).is_scalar());
    assert!(!key.is_scalar());
    assert_eq!(key.kind_name(), "key");
    assert_eq!(Event::EndObject(0).kind_name(), "object");
    assert_eq!(OwnedEvent::from(key), OwnedEvent::Key("k".into()));
}

#[rstest]
#[timeout(Duration::from_millis(2_000))]
fn every_proper_prefix_is_incomplete() {
    let stream = events(USER_ARRAY);
    for end in 0..stream.len() {
        let mut users: Vec<User> = Vec::new();
        let errors = from_events(&mut users, &stream[..end]).unwrap_err();
        assert_eq!(errors.kinds(), [ErrorKind::UnexpectedEnd], "typed, {end} events");

        let mut value = Value::Null;
        let errors = from_events(&mut value, &stream[..end]).unwrap_err();
        assert_eq!(errors.kinds(), [ErrorKind::UnexpectedEnd], "document, {end} events");
    }

    let mut value = Value::Null;
    from_events(&mut value, &stream).unwrap();
}

#[test]
fn builder_completes_at_root() {
    let mut builder = DocumentBuilder::new();
    let mut value = Value::Null;
    assert!(!builder.is_complete());
    builder.handle(&mut value, Event::StartArray).unwrap();
    builder.handle(&mut value, Event::Null).unwrap();
    assert!(!builder.is_complete());
    builder.handle(&mut value, Event::EndArray(1)).unwrap();
    assert!(builder.is_complete());

    builder.handle(&mut value, Event::StartObject).unwrap();
    assert!(!builder.is_complete());
}
