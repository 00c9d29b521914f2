//! The handler contract and the [`Bound`] entry point.
//!
//! A handler is a small state machine that consumes the events of exactly one
//! JSON value and writes the result into a destination passed to it on every
//! call. Composite handlers own the handlers of their elements and forward the
//! events that belong to them.
use crate::{
    error::{ErrorStack, Flow, Halt, ParseError},
    event::{Event, EventSink, OwnedEvent, replay},
    serialize::Serialize,
    value::Value,
};

/// A stateful consumer of events for destinations of type `T`.
///
/// The trait is object safe; record members are stored as
/// `Box<dyn Handler<R>>`.
pub trait Handler<T: ?Sized> {
    /// Consumes one event, writing into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`Halt`] once the handler has recorded an error. Every later
    /// event is rejected the same way until [`reset`](Handler::reset).
    fn handle(&mut self, dest: &mut T, event: Event<'_>) -> Flow;

    /// `true` while an error is recorded and not yet drained.
    fn has_error(&self) -> bool;

    /// `true` once a whole value has been consumed and no other value is in
    /// progress.
    fn is_complete(&self) -> bool;

    /// Moves the recorded error, cause first, onto `errors`.
    ///
    /// Returns `false` and leaves `errors` untouched if there is nothing to
    /// drain, including when the error was already drained.
    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool;

    /// Restores the just-constructed state.
    fn reset(&mut self);
}

/// Selects the handler for a destination type.
pub trait Bind: Sized {
    /// The handler driving values of this type.
    type Handler: Handler<Self> + Default;
}

/// A handler paired with the one destination it writes into.
///
/// # Examples
///
/// ```
/// use jsonbind::{Bound, EventSink};
///
/// let mut numbers: Vec<u8> = Vec::new();
/// let mut bound = Bound::new(&mut numbers);
/// bound.start_array()?;
/// bound.uint(1)?;
/// bound.uint(2)?;
/// bound.end_array(2)?;
/// bound.finish().unwrap();
/// assert_eq!(numbers, [1, 2]);
/// # Ok::<(), jsonbind::Halt>(())
/// ```
pub struct Bound<'a, T: Bind> {
    dest: &'a mut T,
    handler: T::Handler,
}

impl<'a, T: Bind> Bound<'a, T> {
    /// Binds a fresh handler to `dest`.
    pub fn new(dest: &'a mut T) -> Self {
        Self {
            dest,
            handler: T::Handler::default(),
        }
    }

    /// The destination as written so far.
    #[must_use]
    pub fn destination(&self) -> &T {
        self.dest
    }

    /// See [`Handler::has_error`].
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.handler.has_error()
    }

    /// See [`Handler::is_complete`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.handler.is_complete()
    }

    /// See [`Handler::drain_errors_into`].
    pub fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        self.handler.drain_errors_into(errors)
    }

    /// Makes the handler ready for another document. The destination is left
    /// as it is.
    pub fn reset(&mut self) {
        self.handler.reset();
    }

    /// Ends the binding and reports the recorded error, if any.
    ///
    /// # Errors
    ///
    /// Returns the drained [`ErrorStack`] if any event failed, or
    /// [`ParseError::UnexpectedEnd`] if the stream stopped before the
    /// destination's value was complete.
    pub fn finish(mut self) -> Result<(), ErrorStack> {
        let mut errors = ErrorStack::new();
        if self.handler.drain_errors_into(&mut errors) {
            return Err(errors);
        }
        if !self.handler.is_complete() {
            debug!("event stream ended inside a value");
            return Err(ParseError::UnexpectedEnd.into());
        }
        Ok(())
    }
}

impl<T: Bind> EventSink for Bound<'_, T> {
    fn event(&mut self, event: Event<'_>) -> Flow {
        self.handler.handle(self.dest, event)
    }
}

/// Binds a recorded event stream onto `dest`.
///
/// # Errors
///
/// Returns the error stack of the first failure, or
/// [`ParseError::UnexpectedEnd`] for a truncated stream.
pub fn from_events<'e, T, I>(dest: &mut T, events: I) -> Result<(), ErrorStack>
where
    T: Bind,
    I: IntoIterator<Item = &'e OwnedEvent>,
{
    let mut bound = Bound::new(dest);
    // A halt leaves its cause in the handler tree; `finish` drains it.
    let _ = replay(events, &mut bound);
    bound.finish()
}

/// Binds a typed destination from a free-form document.
///
/// # Errors
///
/// Returns the error stack of the first failure.
pub fn from_value<T: Bind>(dest: &mut T, value: &Value) -> Result<(), ErrorStack> {
    let mut bound = Bound::new(dest);
    let _ = value.serialize(&mut bound);
    bound.finish()
}

/// Error bookkeeping shared by the handlers that record their own frames.
///
/// `frame` is the error this handler contributes (a cause or a context frame)
/// and stays set until drained. `halted` stays set until reset.
#[derive(Debug, Default)]
pub(crate) struct Fault {
    frame: Option<ParseError>,
    halted: bool,
}

impl Fault {
    /// Rejects events after a failure.
    pub(crate) fn check(&self) -> Flow {
        if self.halted { Err(Halt) } else { Ok(()) }
    }

    /// Records `error` and halts.
    pub(crate) fn record(&mut self, error: ParseError) -> Flow {
        debug!(%error, "handler failed");
        self.frame = Some(error);
        self.halted = true;
        Err(Halt)
    }

    pub(crate) fn has_error(&self) -> bool {
        self.frame.is_some()
    }

    /// Drains the frame. `inner` runs first, and only for context frames, so
    /// the child that caused the failure contributes the frames below ours.
    pub(crate) fn drain(
        &mut self,
        errors: &mut ErrorStack,
        inner: impl FnOnce(&mut ErrorStack),
    ) -> bool {
        let Some(frame) = self.frame.take() else {
            return false;
        };
        if frame.is_context() {
            inner(errors);
        }
        errors.push(frame);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.frame = None;
        self.halted = false;
    }
}
