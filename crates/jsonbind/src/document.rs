//! Building a free-form [`Value`] from events.
use alloc::{string::String, vec::Vec};

use crate::{
    error::{ErrorStack, Flow, ParseError},
    event::Event,
    handler::{Bind, Fault, Handler},
    value::{Map, Number, Value},
};

/// Where a completed value goes.
#[derive(Debug)]
enum Slot {
    /// It becomes the document.
    Root,
    /// It is appended to the array below.
    Element,
    /// It is inserted into the object below.
    Member(String),
}

#[derive(Debug)]
struct Frame {
    slot: Slot,
    value: Value,
}

/// Handler that accepts any well-formed stream and stores it verbatim.
///
/// Open containers live on a working stack, each frame owning its
/// in-progress value and knowing where the value goes once it completes.
/// The destination is written when the root value completes. Its only
/// failure is [`ParseError::CorruptedDom`], after which every event is
/// rejected until [`reset`](Handler::reset).
///
/// Repeated keys replace the earlier member in place.
///
/// # Examples
///
/// ```
/// use jsonbind::{Bound, EventSink, Value};
///
/// let mut doc = Value::Null;
/// let mut bound = Bound::new(&mut doc);
/// bound.start_object()?;
/// bound.key("tags", false)?;
/// bound.start_array()?;
/// bound.string("a", false)?;
/// bound.end_array(1)?;
/// bound.end_object(1)?;
/// bound.finish().unwrap();
///
/// assert_eq!(doc.to_string(), r#"{"tags":["a"]}"#);
/// # Ok::<(), jsonbind::Halt>(())
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    stack: Vec<Frame>,
    key: Option<String>,
    complete: bool,
    fault: Fault,
}

impl DocumentBuilder {
    /// Creates an idle builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn corrupted(&mut self, message: &'static str) -> Flow {
        self.fault.record(ParseError::CorruptedDom { message })
    }

    /// Decides where the value that starts with the current event goes.
    fn next_slot(&mut self) -> Result<Slot, &'static str> {
        let Some(top) = self.stack.last() else {
            self.complete = false;
            return Ok(Slot::Root);
        };
        match &top.value {
            Value::Array(_) => Ok(Slot::Element),
            Value::Object(_) => self
                .key
                .take()
                .map(Slot::Member)
                .ok_or("object member without a key"),
            _ => Err("scalar on the working stack"),
        }
    }

    fn complete(&mut self, dest: &mut Value, slot: Slot, value: Value) -> Flow {
        match slot {
            Slot::Root => {
                trace!(kind = value.kind_name(), "document complete");
                *dest = value;
                self.complete = true;
                Ok(())
            }
            Slot::Element => match self.stack.last_mut().map(|top| &mut top.value) {
                Some(Value::Array(array)) => {
                    array.push(value);
                    Ok(())
                }
                _ => self.corrupted("array element without an open array"),
            },
            Slot::Member(key) => match self.stack.last_mut().map(|top| &mut top.value) {
                Some(Value::Object(object)) => {
                    object.insert(key, value);
                    Ok(())
                }
                _ => self.corrupted("object member without an open object"),
            },
        }
    }

    fn close(&mut self, dest: &mut Value, array: bool) -> Flow {
        let matches = match self.stack.last() {
            Some(Frame {
                value: Value::Array(_),
                ..
            }) => array,
            Some(Frame {
                value: Value::Object(_),
                ..
            }) => !array && self.key.is_none(),
            _ => false,
        };
        if !matches {
            return self.corrupted(if array {
                "end of array without an open array"
            } else {
                "end of object without an open object"
            });
        }
        match self.stack.pop() {
            Some(Frame { slot, value }) => self.complete(dest, slot, value),
            None => self.corrupted("working stack underflow"),
        }
    }
}

fn scalar(event: &Event<'_>) -> Option<Value> {
    Some(match *event {
        Event::Null => Value::Null,
        Event::Bool(b) => Value::Bool(b),
        Event::Int(i) => Value::Number(i64::from(i).into()),
        Event::Uint(u) => Value::Number(Number::PosInt(u64::from(u))),
        Event::Int64(i) => Value::Number(i.into()),
        Event::Uint64(u) => Value::Number(Number::PosInt(u)),
        Event::Double(d) => Value::Number(Number::Float(d)),
        Event::String { value, .. } => Value::String(value.into()),
        _ => return None,
    })
}

impl Handler<Value> for DocumentBuilder {
    fn handle(&mut self, dest: &mut Value, event: Event<'_>) -> Flow {
        self.fault.check()?;

        match event {
            Event::Key { name, .. } => match self.stack.last() {
                Some(Frame {
                    value: Value::Object(_),
                    ..
                }) if self.key.is_none() => {
                    self.key = Some(name.into());
                    Ok(())
                }
                _ => self.corrupted("key outside of an object"),
            },
            Event::EndArray(_) => self.close(dest, true),
            Event::EndObject(_) => self.close(dest, false),
            Event::StartArray | Event::StartObject => {
                let slot = match self.next_slot() {
                    Ok(slot) => slot,
                    Err(message) => return self.corrupted(message),
                };
                let value = if let Event::StartArray = event {
                    Value::Array(Vec::new())
                } else {
                    Value::Object(Map::default())
                };
                self.stack.push(Frame { slot, value });
                Ok(())
            }
            _ => {
                let slot = match self.next_slot() {
                    Ok(slot) => slot,
                    Err(message) => return self.corrupted(message),
                };
                match scalar(&event) {
                    Some(value) => self.complete(dest, slot, value),
                    None => self.corrupted("unexpected event"),
                }
            }
        }
    }

    fn has_error(&self) -> bool {
        self.fault.has_error()
    }

    fn is_complete(&self) -> bool {
        self.complete && self.stack.is_empty()
    }

    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        self.fault.drain(errors, |_| {})
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.key = None;
        self.complete = false;
        self.fault.clear();
    }
}

impl Bind for Value {
    type Handler = DocumentBuilder;
}
