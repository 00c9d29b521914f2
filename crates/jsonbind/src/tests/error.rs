use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    ErrorKind, ErrorStack, Halt, ParseError, PathComponent, path,
    tests::{fixtures::User, utils::bind_err},
};

fn nested_stack() -> ErrorStack {
    let mut errors = ErrorStack::from(ParseError::MissingRequiredField { member: "year" });
    errors.push(ParseError::ObjectMember {
        name: "date".into(),
    });
    errors.push(ParseError::ArrayElement { index: 0 });
    errors
}

#[test]
fn empty_stack() {
    let errors = ErrorStack::new();
    assert!(errors.is_empty());
    assert_eq!(errors.cause(), None);
    assert!(errors.path().is_empty());
    assert_eq!(errors.to_string(), "no error");
}

#[test]
fn cause_comes_first_and_path_is_root_first() {
    let errors = nested_stack();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.cause().map(ParseError::kind), Some(ErrorKind::MissingRequiredField));
    assert_eq!(errors.path(), path![0, "date"]);
    assert_eq!(
        (&errors).into_iter().filter(|e| e.is_context()).count(),
        2
    );
}

#[test]
fn cause_without_context_has_no_location() {
    let errors = ErrorStack::from(ParseError::NumberOutOfRange { type_name: "u8" });
    insta::assert_snapshot!(errors.to_string(), @r#"number out of range for type "u8""#);
}

#[test]
fn pointer_escapes_reserved_characters() {
    let mut errors = ErrorStack::from(ParseError::UnknownField {
        name: "x".into(),
    });
    errors.push(ParseError::ObjectMember {
        name: "a/b~c".into(),
    });
    insta::assert_snapshot!(errors.to_string(), @r#"unknown field "x" at /a~1b~0c"#);
}

#[test]
fn messages() {
    let mismatch = ParseError::TypeMismatch {
        expected: "string",
        actual: "uint",
    };
    insta::assert_snapshot!(
        mismatch.to_string(),
        @r#"type mismatch between expected type "string" and actual type "uint""#
    );

    let length = ParseError::ArrayLengthMismatch {
        expected: 3,
        actual: 2,
    };
    insta::assert_snapshot!(length.to_string(), @"array length mismatch: expected 3 elements, found 2");

    let duplicate = ParseError::DuplicateKey { key: "k".into() };
    insta::assert_snapshot!(duplicate.to_string(), @r#"duplicate key "k""#);

    insta::assert_snapshot!(Halt.to_string(), @"event stream halted");
}

#[test]
fn only_context_frames_have_path_components() {
    assert_eq!(
        ParseError::ArrayElement { index: 4 }.as_path_component(),
        Some(PathComponent::Index(4))
    );
    assert_eq!(
        ParseError::ObjectMember { name: "k".into() }.as_path_component(),
        Some(PathComponent::Key("k".into()))
    );
    assert_eq!(
        ParseError::CorruptedDom { message: "x" }.as_path_component(),
        None
    );
}

#[test]
fn clearing_empties_the_stack() {
    let mut errors = nested_stack();
    errors.clear();
    assert!(errors.is_empty());
    assert!(errors.kinds().is_empty());
}

#[test]
fn stack_serializes_as_frame_list() {
    let json = serde_json::to_string(&nested_stack()).unwrap();
    insta::assert_snapshot!(
        json,
        @r#"[{"MissingRequiredField":{"member":"year"}},{"ObjectMember":{"name":"date"}},{"ArrayElement":{"index":0}}]"#
    );
}

#[test]
fn path_serializes_as_plain_components() {
    let errors = bind_err::<Vec<User>>(r#"[{"ID": 1, "nickname": "x", "dark_history": [{}]}]"#);
    let json = serde_json::to_string(&errors.path()).unwrap();
    assert_eq!(json, r#"[0,"dark_history",0]"#);

    let back: Vec<PathComponent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, errors.path());
}

#[test]
fn negative_index_is_not_a_path_component() {
    assert!(serde_json::from_str::<PathComponent>("-1").is_err());
    assert!(serde_json::from_str::<PathComponent>("true").is_err());
    assert_eq!(
        serde_json::from_str::<PathComponent>(r#""k""#).unwrap(),
        PathComponent::from(String::from("k"))
    );
}
