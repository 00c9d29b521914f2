#![no_main]
use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use jsonbind::{
    Bind, ErrorStack, OwnedEvent, Value, from_events, impl_record, to_string, to_value,
};
use libfuzzer_sys::fuzz_target;
use serde_json::Map;

#[derive(Debug, Default)]
struct Item {
    id: u64,
    label: String,
    children: Vec<Item>,
    extra: Option<Box<Value>>,
    weights: [f32; 2],
}

impl_record! {
    Item {
        id: u64 [required],
        label: String ["item label"],
        children: Vec<Item>,
        extra: Option<Box<Value>>,
        weights: [f32; 2],
    }
}

/// Raw producer calls, not necessarily well formed.
#[derive(Debug, Arbitrary)]
enum RawEvent {
    Null,
    Bool(bool),
    Int(i32),
    Uint(u32),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(String),
    Key(String),
    StartArray,
    EndArray(u8),
    StartObject,
    EndObject(u8),
}

impl From<RawEvent> for OwnedEvent {
    fn from(event: RawEvent) -> Self {
        match event {
            RawEvent::Null => OwnedEvent::Null,
            RawEvent::Bool(b) => OwnedEvent::Bool(b),
            RawEvent::Int(i) => OwnedEvent::Int(i),
            RawEvent::Uint(u) => OwnedEvent::Uint(u),
            RawEvent::Int64(i) => OwnedEvent::Int64(i),
            RawEvent::Uint64(u) => OwnedEvent::Uint64(u),
            RawEvent::Double(d) => OwnedEvent::Double(d),
            RawEvent::String(s) => OwnedEvent::String(s),
            RawEvent::Key(k) => OwnedEvent::Key(k),
            RawEvent::StartArray => OwnedEvent::StartArray,
            RawEvent::EndArray(n) => OwnedEvent::EndArray(n.into()),
            RawEvent::StartObject => OwnedEvent::StartObject,
            RawEvent::EndObject(n) => OwnedEvent::EndObject(n.into()),
        }
    }
}

#[derive(Debug)]
struct ArbitraryValue(serde_json::Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => serde_json::Value::Null,
            1 => serde_json::Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                serde_json::Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => serde_json::Value::from(u.arbitrary::<i64>()?),
            4 => serde_json::Value::from(u.arbitrary::<u64>()?),
            5..=10 => serde_json::Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                serde_json::Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                serde_json::Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(Vec<RawEvent>),
    Document(ArbitraryValue),
}

fn push_events(json: &serde_json::Value, out: &mut Vec<OwnedEvent>) {
    match json {
        serde_json::Value::Null => out.push(OwnedEvent::Null),
        serde_json::Value::Bool(b) => out.push(OwnedEvent::Bool(*b)),
        serde_json::Value::Number(n) => out.push(if let Some(u) = n.as_u64() {
            u32::try_from(u).map_or(OwnedEvent::Uint64(u), OwnedEvent::Uint)
        } else if let Some(i) = n.as_i64() {
            i32::try_from(i).map_or(OwnedEvent::Int64(i), OwnedEvent::Int)
        } else {
            OwnedEvent::Double(n.as_f64().unwrap_or(f64::NAN))
        }),
        serde_json::Value::String(s) => out.push(OwnedEvent::String(s.clone())),
        serde_json::Value::Array(items) => {
            out.push(OwnedEvent::StartArray);
            for item in items {
                push_events(item, out);
            }
            out.push(OwnedEvent::EndArray(items.len()));
        }
        serde_json::Value::Object(members) => {
            out.push(OwnedEvent::StartObject);
            for (key, value) in members {
                out.push(OwnedEvent::Key(key.clone()));
                push_events(value, out);
            }
            out.push(OwnedEvent::EndObject(members.len()));
        }
    }
}

fn bind<T: Bind + Default>(events: &[OwnedEvent]) -> Result<T, ErrorStack> {
    let mut dest = T::default();
    from_events(&mut dest, events)?;
    Ok(dest)
}

fn check_errors(result: Result<(), ErrorStack>, well_formed: bool) {
    if let Err(errors) = result {
        assert!(!errors.is_empty());
        assert!(!errors.cause().is_some_and(jsonbind::ParseError::is_context));
        if well_formed {
            assert_ne!(errors.cause(), Some(&jsonbind::ParseError::UnexpectedEnd));
        }
        let _ = errors.to_string();
    }
}

fn run(input: Input) {
    match input {
        Input::Raw(raw) => {
            let events: Vec<OwnedEvent> = raw.into_iter().map(OwnedEvent::from).collect();
            let mut document = Value::Null;
            check_errors(from_events(&mut document, &events), false);
            check_errors(bind::<Item>(&events).map(drop), false);
            check_errors(bind::<Vec<Option<i64>>>(&events).map(drop), false);
            check_errors(bind::<BTreeMap<String, Value>>(&events).map(drop), false);
        }
        Input::Document(value) => {
            let mut events = Vec::new();
            push_events(&value.0, &mut events);

            let document: Value = bind(&events).expect("well-formed streams build documents");
            assert_eq!(to_value(&document), document);
            let reparsed: serde_json::Value =
                serde_json::from_str(&to_string(&document)).expect("writer output is JSON");
            assert_eq!(reparsed.is_object(), document.is_object());

            check_errors(bind::<Item>(&events).map(drop), true);
            check_errors(bind::<Vec<Option<i64>>>(&events).map(drop), true);
            check_errors(bind::<BTreeMap<String, Value>>(&events).map(drop), true);
            check_errors(bind::<[Item; 1]>(&events).map(drop), true);
        }
    }
}

fuzz_target!(|input: Input| run(input));
