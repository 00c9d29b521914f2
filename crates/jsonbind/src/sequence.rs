//! Handlers for array destinations.
use alloc::{collections::VecDeque, vec::Vec};

use crate::{
    error::{ErrorStack, Flow, ParseError},
    event::Event,
    handler::{Bind, Fault, Handler},
    scope::{Markers, Scope},
};

/// An ordered container filled from a JSON array.
pub trait Sequence {
    /// The element type.
    type Element: Bind + Default;

    /// `Some(n)` for containers that hold exactly `n` elements.
    const FIXED_LEN: Option<usize> = None;

    /// Prepares the container for a new array.
    fn clear(&mut self);

    /// Stores the element that arrived at position `index`.
    fn push(&mut self, index: usize, element: Self::Element);
}

impl<T: Bind + Default> Sequence for Vec<T> {
    type Element = T;

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push(&mut self, _index: usize, element: T) {
        Vec::push(self, element);
    }
}

impl<T: Bind + Default> Sequence for VecDeque<T> {
    type Element = T;

    fn clear(&mut self) {
        VecDeque::clear(self);
    }

    fn push(&mut self, _index: usize, element: T) {
        self.push_back(element);
    }
}

impl<T: Bind + Default, const N: usize> Sequence for [T; N] {
    type Element = T;

    const FIXED_LEN: Option<usize> = Some(N);

    fn clear(&mut self) {
        self.fill_with(T::default);
    }

    fn push(&mut self, index: usize, element: T) {
        if let Some(slot) = self.get_mut(index) {
            *slot = element;
        }
    }
}

/// Handler for any [`Sequence`].
///
/// One element handler is created on the first element and reset between
/// elements. Each element is built in a pending value and pushed once its
/// last event has been consumed, so a failed element never reaches the
/// container.
pub struct SequenceHandler<S: Sequence> {
    markers: Markers,
    pending: Option<S::Element>,
    element: Option<<S::Element as Bind>::Handler>,
    count: usize,
    complete: bool,
    fault: Fault,
}

impl<S: Sequence> Default for SequenceHandler<S> {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            pending: None,
            element: None,
            count: 0,
            complete: false,
            fault: Fault::default(),
        }
    }
}

impl<S: Sequence> Handler<S> for SequenceHandler<S> {
    fn handle(&mut self, dest: &mut S, event: Event<'_>) -> Flow {
        self.fault.check()?;

        if self.markers.is_empty() {
            return match event {
                Event::StartArray => {
                    dest.clear();
                    self.count = 0;
                    self.complete = false;
                    self.markers.open(Scope::Array);
                    Ok(())
                }
                other => self.fault.record(ParseError::TypeMismatch {
                    expected: "array",
                    actual: other.kind_name(),
                }),
            };
        }

        if self.markers.depth() == 1 {
            if let Event::EndArray(_) = event {
                self.markers.close();
                if let Some(expected) = S::FIXED_LEN {
                    if self.count != expected {
                        return self.fault.record(ParseError::ArrayLengthMismatch {
                            expected,
                            actual: self.count,
                        });
                    }
                }
                trace!(elements = self.count, "array complete");
                self.complete = true;
                return Ok(());
            }
            if S::FIXED_LEN.is_some_and(|expected| self.count >= expected) {
                return self.fault.record(ParseError::ArrayLengthMismatch {
                    expected: self.count,
                    actual: self.count + 1,
                });
            }
        }

        self.markers.track(&event);
        let handler = self.element.get_or_insert_with(Default::default);
        let value = self.pending.get_or_insert_with(Default::default);
        if handler.handle(value, event).is_err() {
            return self
                .fault
                .record(ParseError::ArrayElement { index: self.count });
        }

        if self.markers.depth() == 1 {
            if let Some(value) = self.pending.take() {
                dest.push(self.count, value);
            }
            trace!(index = self.count, "array element complete");
            self.count += 1;
            handler.reset();
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
        self.pending = None;
        if let Some(handler) = &mut self.element {
            handler.reset();
        }
        self.count = 0;
        self.complete = false;
        self.fault.clear();
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    type Handler = SequenceHandler<Vec<T>>;
}

impl<T: Bind + Default> Bind for VecDeque<T> {
    type Handler = SequenceHandler<VecDeque<T>>;
}

impl<T: Bind + Default, const N: usize> Bind for [T; N] {
    type Handler = SequenceHandler<[T; N]>;
}
