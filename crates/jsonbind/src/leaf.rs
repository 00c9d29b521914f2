//! Handlers for scalar destinations: booleans, integers, floats and strings.
use alloc::string::String;
use core::marker::PhantomData;

use crate::{
    error::{ErrorStack, Flow, ParseError},
    event::Event,
    handler::{Bind, Fault, Handler},
};

/// A scalar destination filled from exactly one event.
pub trait Primitive: Sized {
    /// Name reported as the expected type in errors.
    const TYPE_NAME: &'static str;

    /// Converts a scalar event.
    ///
    /// # Errors
    ///
    /// [`ParseError::TypeMismatch`] if the event kind does not fit and
    /// [`ParseError::NumberOutOfRange`] if a number is not representable.
    fn from_event(event: &Event<'_>) -> Result<Self, ParseError>;
}

fn mismatch(expected: &'static str, event: &Event<'_>) -> ParseError {
    ParseError::TypeMismatch {
        expected,
        actual: event.kind_name(),
    }
}

/// Handler for any [`Primitive`]. The destination is written only when the
/// conversion succeeds.
///
/// Structural events (`Key`, `EndArray`, `EndObject`) never start a value and
/// are reported as [`ParseError::TypeMismatch`] like any other misfit.
pub struct LeafHandler<T> {
    complete: bool,
    fault: Fault,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for LeafHandler<T> {
    fn default() -> Self {
        Self {
            complete: false,
            fault: Fault::default(),
            _marker: PhantomData,
        }
    }
}

impl<T: Primitive> Handler<T> for LeafHandler<T> {
    fn handle(&mut self, dest: &mut T, event: Event<'_>) -> Flow {
        self.fault.check()?;
        match T::from_event(&event) {
            Ok(value) => {
                *dest = value;
                self.complete = true;
                Ok(())
            }
            Err(error) => self.fault.record(error),
        }
    }

    fn has_error(&self) -> bool {
        self.fault.has_error()
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn drain_errors_into(&mut self, errors: &mut ErrorStack) -> bool {
        self.fault.drain(errors, |_| {})
    }

    fn reset(&mut self) {
        self.complete = false;
        self.fault.clear();
    }
}

impl Primitive for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_event(event: &Event<'_>) -> Result<Self, ParseError> {
        match *event {
            Event::Bool(b) => Ok(b),
            _ => Err(mismatch(Self::TYPE_NAME, event)),
        }
    }
}

// Every integer destination accepts all four integer events; the producer
// picks the narrowest one, not the destination.
macro_rules! impl_integer_primitive {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Primitive for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn from_event(event: &Event<'_>) -> Result<Self, ParseError> {
                    let converted = match *event {
                        Event::Int(i) => <$t>::try_from(i).ok(),
                        Event::Uint(u) => <$t>::try_from(u).ok(),
                        Event::Int64(i) => <$t>::try_from(i).ok(),
                        Event::Uint64(u) => <$t>::try_from(u).ok(),
                        _ => return Err(mismatch(Self::TYPE_NAME, event)),
                    };
                    converted.ok_or(ParseError::NumberOutOfRange {
                        type_name: Self::TYPE_NAME,
                    })
                }
            }
        )+
    };
}

impl_integer_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Primitive for f64 {
    const TYPE_NAME: &'static str = "f64";

    #[allow(clippy::cast_precision_loss)]
    fn from_event(event: &Event<'_>) -> Result<Self, ParseError> {
        match *event {
            Event::Int(i) => Ok(f64::from(i)),
            Event::Uint(u) => Ok(f64::from(u)),
            Event::Int64(i) => Ok(i as f64),
            Event::Uint64(u) => Ok(u as f64),
            Event::Double(d) => Ok(d),
            _ => Err(mismatch(Self::TYPE_NAME, event)),
        }
    }
}

impl Primitive for f32 {
    const TYPE_NAME: &'static str = "f32";

    #[allow(clippy::cast_possible_truncation)]
    fn from_event(event: &Event<'_>) -> Result<Self, ParseError> {
        let wide = match f64::from_event(event) {
            Ok(wide) => wide,
            Err(_) => return Err(mismatch(Self::TYPE_NAME, event)),
        };
        let narrow = wide as f32;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(ParseError::NumberOutOfRange {
                type_name: Self::TYPE_NAME,
            });
        }
        Ok(narrow)
    }
}

impl Primitive for String {
    const TYPE_NAME: &'static str = "string";

    fn from_event(event: &Event<'_>) -> Result<Self, ParseError> {
        match *event {
            Event::String { value, .. } => Ok(value.into()),
            _ => Err(mismatch(Self::TYPE_NAME, event)),
        }
    }
}

macro_rules! impl_leaf_bind {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Bind for $t {
                type Handler = LeafHandler<$t>;
            }
        )+
    };
}

impl_leaf_bind!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String,
);
