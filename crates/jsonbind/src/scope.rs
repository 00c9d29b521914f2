use alloc::vec::Vec;

use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Array,
    Object,
}

/// Explicit stack of open brackets seen by a composite handler.
///
/// Depth 1 is the handler's own container. Anything deeper belongs to the
/// element or member currently being forwarded.
#[derive(Debug, Default)]
pub(crate) struct Markers {
    stack: Vec<Scope>,
}

impl Markers {
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub(crate) fn open(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    pub(crate) fn close(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Updates the stack for an event that is forwarded to a child.
    pub(crate) fn track(&mut self, event: &Event<'_>) {
        match event {
            Event::StartArray => self.open(Scope::Array),
            Event::StartObject => self.open(Scope::Object),
            Event::EndArray(_) | Event::EndObject(_) => {
                self.close();
            }
            _ => {}
        }
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }
}
