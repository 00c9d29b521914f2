//! The SAX-style event vocabulary shared by every handler and sink.
//!
//! A well-formed stream describes exactly one JSON value: scalars are single
//! events, arrays are `StartArray`, the element values, then `EndArray`, and
//! objects are `StartObject`, alternating `Key` and value, then `EndObject`.
//! The producer of the stream (a tokenizer, a DOM walker, or
//! [`crate::Serialize`]) is responsible for that grammar.
//!
//! Integers use the narrowest signed/unsigned representation the producer
//! chose. Handlers must accept a value regardless of which of the four integer
//! events carries it.
//!
//! # Examples
//!
//! ```
//! use jsonbind::{Event, EventSink, Flow};
//!
//! #[derive(Default)]
//! struct Count(usize);
//!
//! impl EventSink for Count {
//!     fn event(&mut self, _event: Event<'_>) -> Flow {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut count = Count::default();
//! count.start_array()?;
//! count.uint(1)?;
//! count.string("two", false)?;
//! count.end_array(2)?;
//! assert_eq!(count.0, 4);
//! # Ok::<(), jsonbind::Halt>(())
//! ```
use alloc::{string::String, vec::Vec};

use crate::error::Flow;

/// One step of a JSON event stream.
///
/// String payloads are borrowed for the duration of the call. The
/// `may_reference` flag tells the receiver the producer guarantees the bytes
/// outlive the stream, so a zero-copy consumer could keep a reference. Owned
/// destinations always copy.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    Null,
    Bool(bool),
    Int(i32),
    Uint(u32),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String { value: &'a str, may_reference: bool },
    Key { name: &'a str, may_reference: bool },
    StartArray,
    /// Carries the element count observed by the producer.
    EndArray(usize),
    StartObject,
    /// Carries the member count observed by the producer.
    EndObject(usize),
}

impl Event<'_> {
    /// The name used for this event in [`crate::ParseError::TypeMismatch`].
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::Null => "null",
            Event::Bool(_) => "bool",
            Event::Int(_) => "int",
            Event::Uint(_) => "uint",
            Event::Int64(_) => "int64",
            Event::Uint64(_) => "uint64",
            Event::Double(_) => "double",
            Event::String { .. } => "string",
            Event::Key { .. } => "key",
            Event::StartArray | Event::EndArray(_) => "array",
            Event::StartObject | Event::EndObject(_) => "object",
        }
    }

    /// `true` for the events that open a container.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Event::StartArray | Event::StartObject)
    }

    /// `true` for the events that close a container.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Event::EndArray(_) | Event::EndObject(_))
    }

    /// `true` for the events that form a complete value on their own.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !self.is_start() && !self.is_end() && !matches!(self, Event::Key { .. })
    }
}

/// A consumer of JSON events.
///
/// Implementors only provide [`event`](EventSink::event); the per-kind methods
/// are conveniences for producers. Returning `Err(Halt)` asks the producer to
/// stop feeding events.
pub trait EventSink {
    /// Consumes one event.
    fn event(&mut self, event: Event<'_>) -> Flow;

    fn null(&mut self) -> Flow {
        self.event(Event::Null)
    }

    fn bool(&mut self, value: bool) -> Flow {
        self.event(Event::Bool(value))
    }

    fn int(&mut self, value: i32) -> Flow {
        self.event(Event::Int(value))
    }

    fn uint(&mut self, value: u32) -> Flow {
        self.event(Event::Uint(value))
    }

    fn int64(&mut self, value: i64) -> Flow {
        self.event(Event::Int64(value))
    }

    fn uint64(&mut self, value: u64) -> Flow {
        self.event(Event::Uint64(value))
    }

    fn double(&mut self, value: f64) -> Flow {
        self.event(Event::Double(value))
    }

    fn string(&mut self, value: &str, may_reference: bool) -> Flow {
        self.event(Event::String {
            value,
            may_reference,
        })
    }

    fn key(&mut self, name: &str, may_reference: bool) -> Flow {
        self.event(Event::Key {
            name,
            may_reference,
        })
    }

    fn start_array(&mut self) -> Flow {
        self.event(Event::StartArray)
    }

    fn end_array(&mut self, count: usize) -> Flow {
        self.event(Event::EndArray(count))
    }

    fn start_object(&mut self) -> Flow {
        self.event(Event::StartObject)
    }

    fn end_object(&mut self, count: usize) -> Flow {
        self.event(Event::EndObject(count))
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn event(&mut self, event: Event<'_>) -> Flow {
        (**self).event(event)
    }
}

/// An [`Event`] that owns its string payload.
///
/// Recording a stream into a `Vec<OwnedEvent>` and replaying it with
/// [`replay`] is how documents are fed to handlers more than once.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedEvent {
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
    EndArray(usize),
    StartObject,
    EndObject(usize),
}

impl OwnedEvent {
    /// Borrows this event. Payloads are flagged `may_reference` since they
    /// live as long as the recording.
    #[must_use]
    pub fn as_event(&self) -> Event<'_> {
        match self {
            OwnedEvent::Null => Event::Null,
            OwnedEvent::Bool(b) => Event::Bool(*b),
            OwnedEvent::Int(i) => Event::Int(*i),
            OwnedEvent::Uint(u) => Event::Uint(*u),
            OwnedEvent::Int64(i) => Event::Int64(*i),
            OwnedEvent::Uint64(u) => Event::Uint64(*u),
            OwnedEvent::Double(d) => Event::Double(*d),
            OwnedEvent::String(value) => Event::String {
                value,
                may_reference: true,
            },
            OwnedEvent::Key(name) => Event::Key {
                name,
                may_reference: true,
            },
            OwnedEvent::StartArray => Event::StartArray,
            OwnedEvent::EndArray(n) => Event::EndArray(*n),
            OwnedEvent::StartObject => Event::StartObject,
            OwnedEvent::EndObject(n) => Event::EndObject(*n),
        }
    }
}

impl From<Event<'_>> for OwnedEvent {
    fn from(event: Event<'_>) -> Self {
        match event {
            Event::Null => OwnedEvent::Null,
            Event::Bool(b) => OwnedEvent::Bool(b),
            Event::Int(i) => OwnedEvent::Int(i),
            Event::Uint(u) => OwnedEvent::Uint(u),
            Event::Int64(i) => OwnedEvent::Int64(i),
            Event::Uint64(u) => OwnedEvent::Uint64(u),
            Event::Double(d) => OwnedEvent::Double(d),
            Event::String { value, .. } => OwnedEvent::String(value.into()),
            Event::Key { name, .. } => OwnedEvent::Key(name.into()),
            Event::StartArray => OwnedEvent::StartArray,
            Event::EndArray(n) => OwnedEvent::EndArray(n),
            Event::StartObject => OwnedEvent::StartObject,
            Event::EndObject(n) => OwnedEvent::EndObject(n),
        }
    }
}

impl EventSink for Vec<OwnedEvent> {
    fn event(&mut self, event: Event<'_>) -> Flow {
        self.push(OwnedEvent::from(event));
        Ok(())
    }
}

/// Feeds a recorded stream into `sink`, stopping at the first halt.
///
/// # Errors
///
/// Returns [`crate::Halt`] if the sink refused an event.
pub fn replay<'a, S, I>(events: I, sink: &mut S) -> Flow
where
    S: EventSink + ?Sized,
    I: IntoIterator<Item = &'a OwnedEvent>,
{
    for event in events {
        sink.event(event.as_event())?;
    }
    Ok(())
}
