//! Errors reported while binding an event stream onto a typed destination.
//!
//! A failing handler records exactly one [`ParseError`] describing the cause.
//! Every enclosing handler then records one wrapping frame
//! ([`ParseError::ObjectMember`] or [`ParseError::ArrayElement`]) and halts in
//! turn. Draining the handlers into an [`ErrorStack`] yields the cause first,
//! followed by the wrapping frames from the innermost container outward.
//!
//! # Examples
//!
//! ```
//! use jsonbind::{ErrorStack, ParseError, path};
//!
//! let mut errors = ErrorStack::new();
//! errors.push(ParseError::MissingRequiredField { member: "year" });
//! errors.push(ParseError::ObjectMember { name: "date".into() });
//! errors.push(ParseError::ArrayElement { index: 0 });
//!
//! assert_eq!(errors.path(), path![0, "date"]);
//! assert_eq!(errors.to_string(), "missing required field \"year\" at /0/date");
//! ```
use alloc::{string::String, vec::Vec};
use core::{fmt, slice};

use bstr::BStr;
use thiserror::Error;

use crate::path_component::PathComponent;

/// Returned by a handler or sink that stopped consuming events.
///
/// The cause stays with the handler that failed until it is drained with
/// [`crate::Handler::drain_errors_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event stream halted")]
pub struct Halt;

/// Outcome of pushing one event into a handler or sink.
pub type Flow = Result<(), Halt>;

/// Fieldless discriminant of [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ParseError::TypeMismatch`].
    TypeMismatch,
    /// See [`ParseError::NumberOutOfRange`].
    NumberOutOfRange,
    /// See [`ParseError::MissingRequiredField`].
    MissingRequiredField,
    /// See [`ParseError::UnknownField`].
    UnknownField,
    /// See [`ParseError::DuplicateKey`].
    DuplicateKey,
    /// See [`ParseError::ArrayLengthMismatch`].
    ArrayLengthMismatch,
    /// See [`ParseError::CorruptedDom`].
    CorruptedDom,
    /// See [`ParseError::UnexpectedEnd`].
    UnexpectedEnd,
    /// See [`ParseError::ObjectMember`].
    ObjectMember,
    /// See [`ParseError::ArrayElement`].
    ArrayElement,
}

/// A single frame of an [`ErrorStack`].
///
/// All variants except [`ObjectMember`](ParseError::ObjectMember) and
/// [`ArrayElement`](ParseError::ArrayElement) are causes. The two wrapping
/// variants never appear alone; they are recorded by a container handler on
/// top of the cause reported by one of its children.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The event kind does not fit the destination type.
    #[error("type mismatch between expected type \"{expected}\" and actual type \"{actual}\"")]
    TypeMismatch {
        /// Name of the destination type.
        expected: &'static str,
        /// Kind of the offending event.
        actual: &'static str,
    },
    /// A number cannot be represented exactly by the destination type.
    #[error("number out of range for type \"{type_name}\"")]
    NumberOutOfRange {
        /// Name of the destination type.
        type_name: &'static str,
    },
    /// A record closed without a member flagged as required.
    #[error("missing required field {:?}", BStr::new(.member))]
    MissingRequiredField {
        /// Serialized key of the first missing member.
        member: &'static str,
    },
    /// A strictly parsed record saw a key its descriptor does not declare.
    #[error("unknown field {:?}", BStr::new(.name))]
    UnknownField {
        /// The key as it appeared in the document.
        name: String,
    },
    /// A map saw the same key twice.
    #[error("duplicate key {:?}", BStr::new(.key))]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// A fixed-size sequence received the wrong number of elements.
    #[error("array length mismatch: expected {expected} elements, found {actual}")]
    ArrayLengthMismatch {
        /// Capacity of the destination.
        expected: usize,
        /// Number of elements observed so far.
        actual: usize,
    },
    /// The document builder received events it cannot place.
    #[error("corrupted document: {message}")]
    CorruptedDom {
        /// What went wrong.
        message: &'static str,
    },
    /// The stream ended before the destination's value was complete.
    #[error("event stream ended before the value was complete")]
    UnexpectedEnd,
    /// The failure happened inside the value of an object member.
    #[error("in object member {:?}", BStr::new(.name))]
    ObjectMember {
        /// Key of the member.
        name: String,
    },
    /// The failure happened inside an array element.
    #[error("in array element {index}")]
    ArrayElement {
        /// Zero-based index of the element.
        index: usize,
    },
}

impl ParseError {
    /// Returns the fieldless discriminant of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::NumberOutOfRange { .. } => ErrorKind::NumberOutOfRange,
            Self::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            Self::UnknownField { .. } => ErrorKind::UnknownField,
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::ArrayLengthMismatch { .. } => ErrorKind::ArrayLengthMismatch,
            Self::CorruptedDom { .. } => ErrorKind::CorruptedDom,
            Self::UnexpectedEnd => ErrorKind::UnexpectedEnd,
            Self::ObjectMember { .. } => ErrorKind::ObjectMember,
            Self::ArrayElement { .. } => ErrorKind::ArrayElement,
        }
    }

    /// Returns `true` for the frames that only add location context.
    #[must_use]
    pub fn is_context(&self) -> bool {
        matches!(self, Self::ObjectMember { .. } | Self::ArrayElement { .. })
    }

    /// Returns the path component a context frame stands for.
    #[must_use]
    pub fn as_path_component(&self) -> Option<PathComponent> {
        match self {
            Self::ObjectMember { name } => Some(PathComponent::Key(name.clone())),
            Self::ArrayElement { index } => Some(PathComponent::Index(*index)),
            _ => None,
        }
    }
}

/// The trail of frames drained from a failed handler tree.
///
/// Index 0 holds the cause; later frames add one level of context each, from
/// the innermost container to the document root. The stack only grows.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[cfg_attr(any(test, feature = "serde"), serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorStack {
    frames: Vec<ParseError>,
}

impl ErrorStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one frame on the outer end of the trail.
    pub fn push(&mut self, error: ParseError) {
        self.frames.push(error);
    }

    /// Returns `true` if nothing has been drained into the stack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames, cause included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// The innermost frame, i.e. the concrete cause.
    #[must_use]
    pub fn cause(&self) -> Option<&ParseError> {
        self.frames.first()
    }

    /// Iterates from the cause outward.
    pub fn iter(&self) -> slice::Iter<'_, ParseError> {
        self.frames.iter()
    }

    /// The kinds of all frames, cause first.
    #[must_use]
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.frames.iter().map(ParseError::kind).collect()
    }

    /// Reconstructs the location of the cause, starting at the document root.
    #[must_use]
    pub fn path(&self) -> Vec<PathComponent> {
        self.frames
            .iter()
            .rev()
            .filter_map(ParseError::as_path_component)
            .collect()
    }

    /// Removes every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl<'a> IntoIterator for &'a ErrorStack {
    type Item = &'a ParseError;
    type IntoIter = slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl From<ParseError> for ErrorStack {
    fn from(error: ParseError) -> Self {
        Self {
            frames: alloc::vec![error],
        }
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(cause) = self.cause() else {
            return f.write_str("no error");
        };
        write!(f, "{cause}")?;
        let path = self.path();
        if !path.is_empty() {
            f.write_str(" at ")?;
            crate::path_component::write_pointer(&path, f)?;
        }
        Ok(())
    }
}

impl core::error::Error for ErrorStack {}
