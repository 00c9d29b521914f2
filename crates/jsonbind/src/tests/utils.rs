use alloc::{string::String, vec::Vec};

use crate::{Bind, ErrorStack, OwnedEvent, from_events};

/// Tokenizes `text` with `serde_json` and replays it the way a SAX reader
/// reports numbers: non-negative integers as `Uint`/`Uint64`, negative ones
/// as `Int`/`Int64`, everything else as `Double`.
pub fn events(text: &str) -> Vec<OwnedEvent> {
    let json: serde_json::Value = serde_json::from_str(text).expect("test documents are valid JSON");
    let mut out = Vec::new();
    push_events(&json, &mut out);
    out
}

fn push_events(json: &serde_json::Value, out: &mut Vec<OwnedEvent>) {
    match json {
        serde_json::Value::Null => out.push(OwnedEvent::Null),
        serde_json::Value::Bool(b) => out.push(OwnedEvent::Bool(*b)),
        serde_json::Value::Number(n) => out.push(number_event(n)),
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

fn number_event(n: &serde_json::Number) -> OwnedEvent {
    if let Some(u) = n.as_u64() {
        u32::try_from(u).map_or(OwnedEvent::Uint64(u), OwnedEvent::Uint)
    } else if let Some(i) = n.as_i64() {
        i32::try_from(i).map_or(OwnedEvent::Int64(i), OwnedEvent::Int)
    } else {
        OwnedEvent::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Binds `text` onto a default-constructed `T`.
pub fn bind<T: Bind + Default>(text: &str) -> Result<T, ErrorStack> {
    let mut dest = T::default();
    from_events(&mut dest, &events(text))?;
    Ok(dest)
}

/// Binds `text` and returns the error stack, panicking if binding succeeds.
pub fn bind_err<T: Bind + Default>(text: &str) -> ErrorStack {
    match bind::<T>(text) {
        Ok(_) => panic!("binding {text} unexpectedly succeeded"),
        Err(errors) => errors,
    }
}

/// The compact `serde_json` rendering of `text`, members kept in order.
pub fn minify(text: &str) -> String {
    let json: serde_json::Value = serde_json::from_str(text).expect("test documents are valid JSON");
    serde_json::to_string(&json).expect("serializing a serde_json::Value cannot fail")
}
