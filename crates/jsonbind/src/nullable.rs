//! Handlers for optional and heap-allocated destinations.
use alloc::{boxed::Box, rc::Rc, sync::Arc};

use crate::{
    error::{ErrorStack, Flow, Halt},
    event::Event,
    handler::{Bind, Handler},
};

/// Handler for `Option<T>`.
///
/// A `Null` that starts a value clears the destination. Any other starting
/// event replaces it with a fresh `Some(T::default())` and forwards the
/// value's events to the inner handler. The depth counter keeps nulls nested
/// inside the value with the inner handler.
pub struct NullableHandler<T: Bind> {
    depth: usize,
    inner: Option<T::Handler>,
    complete: bool,
    halted: bool,
}

impl<T: Bind> Default for NullableHandler<T> {
    fn default() -> Self {
        Self {
            depth: 0,
            inner: None,
            complete: false,
            halted: false,
        }
    }
}

impl<T: Bind + Default> Handler<Option<T>> for NullableHandler<T> {
    fn handle(&mut self, dest: &mut Option<T>, event: Event<'_>) -> Flow {
        if self.halted {
            return Err(Halt);
        }

        if self.depth == 0 {
            if let Event::Null = event {
                *dest = None;
                self.complete = true;
                return Ok(());
            }
            *dest = Some(T::default());
            self.complete = false;
        }

        match event {
            Event::StartArray | Event::StartObject => self.depth += 1,
            Event::EndArray(_) | Event::EndObject(_) => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }

        let inner = self.inner.get_or_insert_with(Default::default);
        let value = dest.get_or_insert_with(T::default);
        let flow = inner.handle(value, event);
        if flow.is_err() {
            self.halted = true;
        } else if self.depth == 0 {
            self.complete = inner.is_complete();
            inner.reset();
        }
        flow
    }

    fn has_error(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.has_error())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        self.inner
            .as_mut()
            .is_some_and(|inner| inner.drain_errors_into(errors))
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.complete = false;
        self.halted = false;
        if let Some(inner) = &mut self.inner {
            inner.reset();
        }
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    type Handler = NullableHandler<T>;
}

/// A pointer that owns its target and can hand out mutable access to it.
pub trait OwningRef {
    /// The pointee.
    type Target: Bind;

    /// Mutable access to the pointee, unsharing it first if needed.
    fn target_mut(&mut self) -> &mut Self::Target;
}

impl<T: Bind> OwningRef for Box<T> {
    type Target = T;

    fn target_mut(&mut self) -> &mut T {
        self
    }
}

impl<T: Bind + Clone> OwningRef for Rc<T> {
    type Target = T;

    fn target_mut(&mut self) -> &mut T {
        Rc::make_mut(self)
    }
}

impl<T: Bind + Clone> OwningRef for Arc<T> {
    type Target = T;

    fn target_mut(&mut self) -> &mut T {
        Arc::make_mut(self)
    }
}

/// Handler for [`OwningRef`] pointers. Forwards every event to the handler of
/// the pointee. Absence is expressed by wrapping the pointer in `Option`.
pub struct OwningRefHandler<P: OwningRef> {
    inner: Option<<P::Target as Bind>::Handler>,
}

impl<P: OwningRef> Default for OwningRefHandler<P> {
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<P: OwningRef> Handler<P> for OwningRefHandler<P> {
    fn handle(&mut self, dest: &mut P, event: Event<'_>) -> Flow {
        self.inner
            .get_or_insert_with(Default::default)
            .handle(dest.target_mut(), event)
    }

    fn has_error(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.has_error())
    }

    fn is_complete(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is_complete())
    }

    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        self.inner
            .as_mut()
            .is_some_and(|inner| inner.drain_errors_into(errors))
    }

    fn reset(&mut self) {
        if let Some(inner) = &mut self.inner {
            inner.reset();
        }
    }
}

impl<T: Bind + Default> Bind for Box<T> {
    type Handler = OwningRefHandler<Self>;
}

impl<T: Bind + Default + Clone> Bind for Rc<T> {
    type Handler = OwningRefHandler<Self>;
}

impl<T: Bind + Default + Clone> Bind for Arc<T> {
    type Handler = OwningRefHandler<Self>;
}
