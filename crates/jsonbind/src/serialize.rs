//! The write path: emitting events from typed values.
use alloc::{
    boxed::Box,
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::hash::BuildHasher;

use indexmap::IndexMap;

use crate::{
    error::Flow,
    event::EventSink,
    handler::Bound,
    options::WriterOptions,
    value::{Number, Value},
    writer::JsonWriter,
};

/// A value that can describe itself as an event stream.
///
/// Serialization has no failure of its own; the only error is a halt from
/// the sink.
pub trait Serialize {
    /// Emits the events of `self` into `out`.
    ///
    /// # Errors
    ///
    /// Propagates a halt from `out`.
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow;
}

impl Serialize for bool {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        out.bool(*self)
    }
}

macro_rules! impl_serialize_widened {
    ($($t:ty => $method:ident($wide:ty)),+ $(,)?) => {
        $(
            impl Serialize for $t {
                fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
                    out.$method(<$wide>::from(*self))
                }
            }
        )+
    };
}

impl_serialize_widened!(
    i8 => int(i32),
    i16 => int(i32),
    i32 => int(i32),
    i64 => int64(i64),
    u8 => uint(u32),
    u16 => uint(u32),
    u32 => uint(u32),
    u64 => uint64(u64),
    f32 => double(f64),
    f64 => double(f64),
);

impl Serialize for isize {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        out.int64(*self as i64)
    }
}

impl Serialize for usize {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        out.uint64(*self as u64)
    }
}

impl Serialize for str {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        out.string(self, false)
    }
}

impl Serialize for String {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        out.string(self, false)
    }
}

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        (**self).serialize(out)
    }
}

impl<T: Serialize> Serialize for Option<T> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        match self {
            Some(value) => value.serialize(out),
            None => out.null(),
        }
    }
}

macro_rules! impl_serialize_pointer {
    ($($p:ident),+) => {
        $(
            impl<T: Serialize + ?Sized> Serialize for $p<T> {
                fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
                    (**self).serialize(out)
                }
            }
        )+
    };
}

impl_serialize_pointer!(Box, Rc, Arc);

fn serialize_elements<'a, T, I, S>(elements: I, out: &mut S) -> Flow
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
    S: EventSink + ?Sized,
{
    out.start_array()?;
    let mut count = 0;
    for element in elements {
        element.serialize(out)?;
        count += 1;
    }
    out.end_array(count)
}

impl<T: Serialize> Serialize for [T] {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_elements(self, out)
    }
}

impl<T: Serialize, const N: usize> Serialize for [T; N] {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_elements(self, out)
    }
}

impl<T: Serialize> Serialize for Vec<T> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_elements(self, out)
    }
}

impl<T: Serialize> Serialize for VecDeque<T> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_elements(self, out)
    }
}

fn serialize_entries<'a, T, I, S>(entries: I, out: &mut S) -> Flow
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (&'a String, &'a T)>,
    S: EventSink + ?Sized,
{
    out.start_object()?;
    let mut count = 0;
    for (key, value) in entries {
        out.key(key, false)?;
        value.serialize(out)?;
        count += 1;
    }
    out.end_object(count)
}

impl<T: Serialize> Serialize for BTreeMap<String, T> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_entries(self, out)
    }
}

impl<T: Serialize, H: BuildHasher> Serialize for IndexMap<String, T, H> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_entries(self, out)
    }
}

impl<T: Serialize, H: BuildHasher> Serialize for hashbrown::HashMap<String, T, H> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_entries(self, out)
    }
}

#[cfg(feature = "std")]
impl<T: Serialize, H: BuildHasher> Serialize for std::collections::HashMap<String, T, H> {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        serialize_entries(self, out)
    }
}

impl Serialize for Number {
    /// Emits the narrowest integer event that holds the value.
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        match *self {
            Number::PosInt(u) => match u32::try_from(u) {
                Ok(narrow) => out.uint(narrow),
                Err(_) => out.uint64(u),
            },
            Number::NegInt(i) => match i32::try_from(i) {
                Ok(narrow) => out.int(narrow),
                Err(_) => out.int64(i),
            },
            Number::Float(f) => out.double(f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow {
        match self {
            Value::Null => out.null(),
            Value::Bool(b) => out.bool(*b),
            Value::Number(n) => n.serialize(out),
            Value::String(s) => out.string(s, false),
            Value::Array(array) => serialize_elements(array, out),
            Value::Object(object) => serialize_entries(object, out),
        }
    }
}

/// Renders `value` as compact JSON text.
///
/// ```
/// use std::collections::BTreeMap;
///
/// let mut counts = BTreeMap::new();
/// counts.insert(String::from("b"), vec![1u8, 2]);
/// counts.insert(String::from("a"), vec![]);
/// assert_eq!(jsonbind::to_string(&counts), r#"{"a":[],"b":[1,2]}"#);
/// ```
#[must_use]
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> String {
    to_string_with(value, WriterOptions::default())
}

/// Renders `value` as indented JSON text.
#[must_use]
pub fn to_string_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    to_string_with(
        value,
        WriterOptions {
            pretty: true,
            ..WriterOptions::default()
        },
    )
}

/// Renders `value` with explicit writer options.
#[must_use]
pub fn to_string_with<T: Serialize + ?Sized>(value: &T, options: WriterOptions) -> String {
    let mut out = String::new();
    let mut writer = JsonWriter::with_options(&mut out, options);
    value
        .serialize(&mut writer)
        .expect("writing to a String cannot fail");
    out
}

/// Converts `value` into a free-form document.
#[must_use]
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    let mut document = Value::Null;
    {
        let mut bound = Bound::new(&mut document);
        let _ = value.serialize(&mut bound);
        let built = bound.finish();
        // Only a hand-written `Record::write_members` can emit a malformed stream.
        debug_assert!(built.is_ok(), "serializer emitted a malformed stream: {built:?}");
    }
    document
}
