use alloc::{string::String, vec::Vec};
use core::time::Duration;

use rstest::*;

use crate::{
    Bound, ErrorKind, Event, EventSink, Handler, LeafHandler, OwnedEvent, ParseError, from_events,
    tests::utils::{bind, bind_err},
};

#[rstest]
#[case::uint_into_i8("127", 127)]
#[case::int_into_i8("-128", -128)]
#[timeout(Duration::from_millis(250))]
fn i8_accepts_in_range(#[case] text: &str, #[case] expected: i8) {
    assert_eq!(bind::<i8>(text).unwrap(), expected);
}

#[rstest]
#[case::i8_high("128", "i8")]
#[case::i8_low("-129", "i8")]
#[case::u8_negative("-1", "u8")]
#[case::i32_from_uint64("5000000000", "i32")]
#[case::u32_from_int64("-5000000000", "u32")]
#[timeout(Duration::from_millis(250))]
fn integers_report_out_of_range(#[case] text: &str, #[case] type_name: &'static str) {
    let errors = match type_name {
        "i8" => bind_err::<i8>(text),
        "u8" => bind_err::<u8>(text),
        "i32" => bind_err::<i32>(text),
        _ => bind_err::<u32>(text),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.cause(),
        Some(&ParseError::NumberOutOfRange { type_name })
    );
}

#[test]
fn u64_accepts_full_range() {
    assert_eq!(bind::<u64>("18446744073709551615").unwrap(), u64::MAX);
    assert_eq!(bind::<i64>("-9223372036854775808").unwrap(), i64::MIN);
}

#[test]
fn integer_events_of_any_width_fit() {
    let mut value = 0u16;
    let mut bound = Bound::new(&mut value);
    bound.int64(300).unwrap();
    bound.finish().unwrap();
    assert_eq!(value, 300);
}

#[test]
fn integers_reject_doubles() {
    let errors = bind_err::<i32>("1.5");
    assert_eq!(
        errors.cause(),
        Some(&ParseError::TypeMismatch {
            expected: "i32",
            actual: "double"
        })
    );
}

#[test]
fn floats_accept_every_number() {
    assert_eq!(bind::<f64>("1.5").unwrap(), 1.5);
    assert_eq!(bind::<f64>("-3").unwrap(), -3.0);
    assert_eq!(bind::<f32>("4294967296").unwrap(), 4_294_967_296.0);
}

#[test]
fn f32_rejects_finite_overflow() {
    let errors = bind_err::<f32>("1e300");
    assert_eq!(errors.kinds(), [ErrorKind::NumberOutOfRange]);
}

#[rstest]
#[case::string_into_bool("\"true\"", "string")]
#[case::null_into_bool("null", "null")]
#[case::array_into_bool("[]", "array")]
#[case::object_into_bool("{}", "object")]
#[timeout(Duration::from_millis(250))]
fn bool_reports_mismatch(#[case] text: &str, #[case] actual: &'static str) {
    let errors = bind_err::<bool>(text);
    assert_eq!(
        errors.cause(),
        Some(&ParseError::TypeMismatch {
            expected: "bool",
            actual
        })
    );
}

#[test]
fn strings_are_copied() {
    let source = String::from("borrowed");
    let mut value = String::new();
    let mut bound = Bound::new(&mut value);
    bound.string(&source, true).unwrap();
    bound.finish().unwrap();
    drop(source);
    assert_eq!(value, "borrowed");
}

#[test]
fn failed_leaf_leaves_destination_untouched() {
    let mut value = 42i32;
    let mut bound = Bound::new(&mut value);
    assert!(bound.uint64(u64::MAX).is_err());
    assert!(bound.has_error());
    drop(bound);
    assert_eq!(value, 42);
}

#[test]
fn leaf_halts_until_reset() {
    let mut handler = LeafHandler::<bool>::default();
    let mut value = false;
    assert!(handler.handle(&mut value, Event::Null).is_err());
    assert!(handler.handle(&mut value, Event::Bool(true)).is_err());
    assert!(!value);

    handler.reset();
    assert!(!handler.has_error());
    handler.handle(&mut value, Event::Bool(true)).unwrap();
    assert!(value);
}

#[rstest]
#[case::key(OwnedEvent::Key("a".into()), "key")]
#[case::end_array(OwnedEvent::EndArray(0), "array")]
#[case::end_object(OwnedEvent::EndObject(0), "object")]
#[timeout(Duration::from_millis(250))]
fn structural_events_are_type_mismatches(#[case] event: OwnedEvent, #[case] actual: &'static str) {
    let mut value = 9u8;
    let errors = from_events(&mut value, &[event]).unwrap_err();
    assert_eq!(
        errors.cause(),
        Some(&ParseError::TypeMismatch {
            expected: "u8",
            actual
        })
    );
    assert_eq!(value, 9);
}

#[test]
fn empty_stream_leaves_leaf_incomplete() {
    let mut value = 9u8;
    let stream: Vec<OwnedEvent> = Vec::new();
    let errors = from_events(&mut value, &stream).unwrap_err();
    assert_eq!(errors.kinds(), [ErrorKind::UnexpectedEnd]);
    assert_eq!(value, 9);
}

#[test]
fn leaf_completes_after_one_value() {
    let mut handler = LeafHandler::<u8>::default();
    let mut value = 0;
    assert!(!handler.is_complete());
    handler.handle(&mut value, Event::Uint(4)).unwrap();
    assert!(handler.is_complete());

    handler.reset();
    assert!(!handler.is_complete());
}
