//! Handlers for string-keyed map destinations.
use alloc::{
    collections::{BTreeMap, btree_map},
    string::String,
};
use core::hash::BuildHasher;

use indexmap::IndexMap;

use crate::{
    error::{ErrorStack, Flow, ParseError},
    event::Event,
    handler::{Bind, Fault, Handler},
    scope::{Markers, Scope},
};

/// A container of values keyed by JSON member names.
pub trait Mapping {
    /// The value type.
    type Value: Bind + Default;

    /// Prepares the container for a new object.
    fn clear(&mut self);

    /// Inserts `value` unless `key` is already present.
    ///
    /// # Errors
    ///
    /// Hands the key back if it was already present. The stored value is
    /// kept.
    fn insert_new(&mut self, key: String, value: Self::Value) -> Result<(), String>;
}

impl<T: Bind + Default> Mapping for BTreeMap<String, T> {
    type Value = T;

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn insert_new(&mut self, key: String, value: T) -> Result<(), String> {
        match self.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            btree_map::Entry::Occupied(slot) => Err(slot.key().clone()),
        }
    }
}

impl<T: Bind + Default, S: BuildHasher + Default> Mapping for IndexMap<String, T, S> {
    type Value = T;

    fn clear(&mut self) {
        IndexMap::clear(self);
    }

    fn insert_new(&mut self, key: String, value: T) -> Result<(), String> {
        match self.entry(key) {
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            indexmap::map::Entry::Occupied(slot) => Err(slot.key().clone()),
        }
    }
}

impl<T: Bind + Default, S: BuildHasher + Default> Mapping for hashbrown::HashMap<String, T, S> {
    type Value = T;

    fn clear(&mut self) {
        hashbrown::HashMap::clear(self);
    }

    fn insert_new(&mut self, key: String, value: T) -> Result<(), String> {
        match self.entry(key) {
            hashbrown::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            hashbrown::hash_map::Entry::Occupied(slot) => Err(slot.key().clone()),
        }
    }
}

#[cfg(feature = "std")]
impl<T: Bind + Default, S: BuildHasher + Default> Mapping for std::collections::HashMap<String, T, S> {
    type Value = T;

    fn clear(&mut self) {
        std::collections::HashMap::clear(self);
    }

    fn insert_new(&mut self, key: String, value: T) -> Result<(), String> {
        use std::collections::hash_map::Entry;

        match self.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(slot) => Err(slot.key().clone()),
        }
    }
}

/// Handler for any [`Mapping`].
///
/// The marker stack tells the map's own braces (depth 1) apart from braces
/// that belong to a value. A `Key` at depth 1 becomes the pending key and the
/// pair is inserted once the value's last event has been consumed.
pub struct MapHandler<M: Mapping> {
    markers: Markers,
    key: Option<String>,
    pending: Option<M::Value>,
    element: Option<<M::Value as Bind>::Handler>,
    complete: bool,
    fault: Fault,
}

impl<M: Mapping> Default for MapHandler<M> {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            key: None,
            pending: None,
            element: None,
            complete: false,
            fault: Fault::default(),
        }
    }
}

impl<M: Mapping> Handler<M> for MapHandler<M> {
    fn handle(&mut self, dest: &mut M, event: Event<'_>) -> Flow {
        self.fault.check()?;

        if self.markers.is_empty() {
            return match event {
                Event::StartObject => {
                    dest.clear();
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

        if self.markers.depth() == 1 {
            match event {
                Event::EndObject(_) => {
                    self.markers.close();
                    trace!("map complete");
                    self.complete = true;
                    return Ok(());
                }
                Event::Key { name, .. } => {
                    self.key = Some(name.into());
                    return Ok(());
                }
                _ if self.key.is_none() => {
                    return self.fault.record(ParseError::TypeMismatch {
                        expected: "key",
                        actual: event.kind_name(),
                    });
                }
                _ => {}
            }
        }

        self.markers.track(&event);
        let handler = self.element.get_or_insert_with(Default::default);
        let value = self.pending.get_or_insert_with(Default::default);
        if handler.handle(value, event).is_err() {
            let name = self.key.clone().unwrap_or_default();
            return self.fault.record(ParseError::ObjectMember { name });
        }

        if self.markers.depth() == 1 {
            handler.reset();
            if let (Some(key), Some(value)) = (self.key.take(), self.pending.take()) {
                trace!(key = key.as_str(), "map member complete");
                if let Err(key) = dest.insert_new(key, value) {
                    return self.fault.record(ParseError::DuplicateKey { key });
                }
            }
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
        let element = &mut self.element;
        self.fault.drain(errors, |errors| {
            if let Some(handler) = element {
                handler.drain_errors_into(errors);
            }
        })
    }

    fn reset(&mut self) {
        self.markers.clear();
        self.key = None;
        self.pending = None;
        if let Some(handler) = &mut self.element {
            handler.reset();
        }
        self.complete = false;
        self.fault.clear();
    }
}

impl<T: Bind + Default> Bind for BTreeMap<String, T> {
    type Handler = MapHandler<Self>;
}

impl<T: Bind + Default, S: BuildHasher + Default> Bind for IndexMap<String, T, S> {
    type Handler = MapHandler<Self>;
}

impl<T: Bind + Default, S: BuildHasher + Default> Bind for hashbrown::HashMap<String, T, S> {
    type Handler = MapHandler<Self>;
}

#[cfg(feature = "std")]
impl<T: Bind + Default, S: BuildHasher + Default> Bind for std::collections::HashMap<String, T, S> {
    type Handler = MapHandler<Self>;
}
