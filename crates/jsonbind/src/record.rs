//! Handlers for user-defined aggregates described by a [`Record`] table.
//!
//! The descriptor is normally produced by [`impl_record!`](crate::impl_record):
//!
//! ```
//! use jsonbind::{impl_record, to_string, Bound, EventSink};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: Option<String>,
//! }
//!
//! impl_record! {
//!     #[strict]
//!     Point {
//!         x: i32 [required],
//!         y: i32 [required],
//!         label: Option<String> ["name"],
//!     }
//! }
//!
//! let mut point = Point::default();
//! let mut bound = Bound::new(&mut point);
//! bound.start_object()?;
//! bound.key("y", false)?;
//! bound.int(2)?;
//! bound.key("x", false)?;
//! bound.int(1)?;
//! bound.end_object(2)?;
//! bound.finish().unwrap();
//!
//! assert_eq!(point, Point { x: 1, y: 2, label: None });
//! assert_eq!(to_string(&point), r#"{"x":1,"y":2,"name":null}"#);
//! # Ok::<(), jsonbind::Halt>(())
//! ```
use alloc::{boxed::Box, vec, vec::Vec};

use crate::{
    error::{ErrorStack, Flow, ParseError},
    event::{Event, EventSink},
    handler::{Bind, Fault, Handler},
    scope::{Markers, Scope},
};

/// One row of a record descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberInfo {
    /// The Rust field name.
    pub name: &'static str,
    /// The key used in JSON documents.
    pub key: &'static str,
    /// Whether the key must appear in every object.
    pub required: bool,
}

/// What a record does with keys its descriptor does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Unknown keys are an [`ParseError::UnknownField`] error.
    Strict,
    /// Unknown keys and their values are skipped.
    #[default]
    Lenient,
}

/// The reflection descriptor of an aggregate.
///
/// `members`, `slots` and `write_members` must agree on the number and order
/// of members. Keys must be unique.
pub trait Record: Default + 'static {
    /// The members in declaration order.
    fn members() -> &'static [MemberInfo];

    /// The policy for undeclared keys.
    fn policy() -> FieldPolicy {
        FieldPolicy::Lenient
    }

    /// One handler per member, in declaration order.
    fn slots() -> Vec<Box<dyn Handler<Self>>>;

    /// Emits `Key` followed by the value of every member, in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates a halt from `out`.
    fn write_members<S: EventSink + ?Sized>(&self, out: &mut S) -> Flow;
}

/// A record member: the handler of the field's type plus a projection from
/// the record onto the field.
pub struct Member<R, T: Bind> {
    handler: T::Handler,
    field: fn(&mut R) -> &mut T,
}

impl<R, T: Bind> Member<R, T> {
    /// Creates the slot for the field selected by `field`.
    pub fn new(field: fn(&mut R) -> &mut T) -> Self {
        Self {
            handler: T::Handler::default(),
            field,
        }
    }
}

impl<R, T: Bind> Handler<R> for Member<R, T> {
    fn handle(&mut self, dest: &mut R, event: Event<'_>) -> Flow {
        self.handler.handle((self.field)(dest), event)
    }

    fn has_error(&self) -> bool {
        self.handler.has_error()
    }

    fn is_complete(&self) -> bool {
        self.handler.is_complete()
    }

    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        self.handler.drain_errors_into(errors)
    }

    fn reset(&mut self) {
        self.handler.reset();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Idle,
    Member(usize),
    Skip,
}

/// Handler for any [`Record`].
///
/// Slots and the sorted key index are built on the first object, so a record
/// that contains itself through `Option<Box<_>>` or a sequence terminates.
pub struct RecordHandler<R: Record> {
    slots: Vec<Box<dyn Handler<R>>>,
    index: Vec<(&'static str, usize)>,
    seen: Vec<bool>,
    markers: Markers,
    active: Active,
    failed: Option<usize>,
    complete: bool,
    fault: Fault,
}

impl<R: Record> Default for RecordHandler<R> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: Vec::new(),
            seen: Vec::new(),
            markers: Markers::default(),
            active: Active::Idle,
            failed: None,
            complete: false,
            fault: Fault::default(),
        }
    }
}

impl<R: Record> RecordHandler<R> {
    fn ensure_slots(&mut self) {
        if !self.slots.is_empty() || R::members().is_empty() {
            return;
        }
        self.slots = R::slots();
        debug_assert_eq!(self.slots.len(), R::members().len());
        self.index = R::members()
            .iter()
            .enumerate()
            .map(|(i, member)| (member.key, i))
            .collect();
        self.index.sort_unstable_by_key(|&(key, _)| key);
        self.seen = vec![false; self.slots.len()];
    }

    fn lookup(&self, key: &str) -> Option<usize> {
        self.index
            .binary_search_by(|&(candidate, _)| candidate.cmp(key))
            .ok()
            .map(|at| self.index[at].1)
    }

    fn first_missing(&self) -> Option<&'static MemberInfo> {
        R::members()
            .iter()
            .zip(&self.seen)
            .find(|(member, seen)| member.required && !**seen)
            .map(|(member, _)| member)
    }

    fn on_key(&mut self, name: &str) -> Flow {
        if let Some(i) = self.lookup(name) {
            self.slots[i].reset();
            self.active = Active::Member(i);
            return Ok(());
        }
        match R::policy() {
            FieldPolicy::Strict => self
                .fault
                .record(ParseError::UnknownField { name: name.into() }),
            FieldPolicy::Lenient => {
                debug!(key = name, "skipping unknown field");
                self.active = Active::Skip;
                Ok(())
            }
        }
    }
}

impl<R: Record> Handler<R> for RecordHandler<R> {
    fn handle(&mut self, dest: &mut R, event: Event<'_>) -> Flow {
        self.fault.check()?;

        if self.markers.is_empty() {
            return match event {
                Event::StartObject => {
                    self.ensure_slots();
                    self.seen.fill(false);
                    self.active = Active::Idle;
                    self.complete = false;
                    self.markers.open(Scope::Object);
                    Ok(())
                }
                other => self.fault.record(ParseError::TypeMismatch {
                    expected: "object",
                    actual: other.kind_name(),
                }),
            };
        }

        if self.markers.depth() == 1 && self.active == Active::Idle {
            return match event {
                Event::Key { name, .. } => self.on_key(name),
                Event::EndObject(_) => {
                    self.markers.close();
                    if let Some(missing) = self.first_missing() {
                        return self.fault.record(ParseError::MissingRequiredField {
                            member: missing.key,
                        });
                    }
                    trace!("record complete");
                    self.complete = true;
                    Ok(())
                }
                other => self.fault.record(ParseError::TypeMismatch {
                    expected: "key",
                    actual: other.kind_name(),
                }),
            };
        }

        self.markers.track(&event);
        let done = self.markers.depth() == 1;
        match self.active {
            Active::Member(i) => {
                if self.slots[i].handle(dest, event).is_err() {
                    self.failed = Some(i);
                    let name = R::members()[i].key.into();
                    return self.fault.record(ParseError::ObjectMember { name });
                }
                if done {
                    trace!(member = R::members()[i].name, "record member complete");
                    self.seen[i] = true;
                    self.active = Active::Idle;
                }
            }
            Active::Skip => {
                if done {
                    self.active = Active::Idle;
                }
            }
            Active::Idle => {}
        }
        Ok(())
    }

    fn has_error(&self) -> bool {
        self.fault.has_error()
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        let slot = self.failed.and_then(|i| self.slots.get_mut(i));
        self.fault.drain(errors, |errors| {
            if let Some(slot) = slot {
                slot.drain_errors_into(errors);
            }
        })
    }

    fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
        self.seen.fill(false);
        self.markers.clear();
        self.active = Active::Idle;
        self.failed = None;
        self.complete = false;
        self.fault.clear();
    }
}

/// Emits a whole record: `StartObject`, the members, `EndObject`.
///
/// # Errors
///
/// Propagates a halt from `out`.
pub fn serialize_record<R: Record, S: EventSink + ?Sized>(record: &R, out: &mut S) -> Flow {
    out.start_object()?;
    record.write_members(out)?;
    out.end_object(R::members().len())
}

/// Implements [`Record`], [`Bind`] and [`Serialize`](crate::Serialize) for a
/// struct with named fields.
///
/// Each field may carry options in brackets: a string literal overriding the
/// JSON key, and `required`. A leading `#[strict]` rejects unknown keys;
/// records are lenient otherwise. The struct must implement `Default`.
///
/// ```
/// # use jsonbind::impl_record;
/// #[derive(Default)]
/// struct BlockEvent {
///     serial_number: u64,
///     admin_id: u64,
/// }
///
/// impl_record! {
///     BlockEvent {
///         serial_number: u64 [required],
///         admin_id: u64 ["administrator ID"],
///     }
/// }
///
/// use jsonbind::Record;
/// assert_eq!(BlockEvent::members()[1].key, "administrator ID");
/// ```
#[macro_export]
macro_rules! impl_record {
    (@key $field:ident) => { stringify!($field) };
    (@key $field:ident required) => { stringify!($field) };
    (@key $field:ident $key:literal $(, required)?) => { $key };

    (@required) => { false };
    (@required required) => { true };
    (@required $key:literal) => { false };
    (@required $key:literal, required) => { true };

    (@policy) => { $crate::FieldPolicy::Lenient };
    (@policy lenient) => { $crate::FieldPolicy::Lenient };
    (@policy strict) => { $crate::FieldPolicy::Strict };

    (
        $(#[$policy:ident])?
        $name:ident {
            $( $field:ident : $fty:ty $([ $($opt:tt)* ])? ),* $(,)?
        }
    ) => {
        impl $crate::Record for $name {
            fn members() -> &'static [$crate::MemberInfo] {
                const MEMBERS: &[$crate::MemberInfo] = &[
                    $(
                        $crate::MemberInfo {
                            name: stringify!($field),
                            key: $crate::impl_record!(@key $field $($($opt)*)?),
                            required: $crate::impl_record!(@required $($($opt)*)?),
                        },
                    )*
                ];
                MEMBERS
            }

            fn policy() -> $crate::FieldPolicy {
                $crate::impl_record!(@policy $($policy)?)
            }

            fn slots() -> $crate::__private::Vec<
                $crate::__private::Box<dyn $crate::Handler<Self>>,
            > {
                $crate::__private::vec![
                    $(
                        $crate::__private::Box::new(
                            $crate::Member::<Self, $fty>::new(|record| &mut record.$field),
                        ) as $crate::__private::Box<dyn $crate::Handler<Self>>,
                    )*
                ]
            }

            fn write_members<S: $crate::EventSink + ?Sized>(&self, out: &mut S) -> $crate::Flow {
                $(
                    out.key($crate::impl_record!(@key $field $($($opt)*)?), true)?;
                    $crate::Serialize::serialize(&self.$field, out)?;
                )*
                Ok(())
            }
        }

        impl $crate::Bind for $name {
            type Handler = $crate::RecordHandler<Self>;
        }

        impl $crate::Serialize for $name {
            fn serialize<S: $crate::EventSink + ?Sized>(&self, out: &mut S) -> $crate::Flow {
                $crate::serialize_record(self, out)
            }
        }
    };
}
