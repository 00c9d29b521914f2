//! Event-driven binding between JSON documents and typed Rust values.
//!
//! A producer (usually a tokenizer) pushes [`Event`]s into a [`Bound`]
//! destination. The destination type selects its handler at compile time
//! through [`Bind`]: scalars, `Option`, owning pointers, sequences,
//! string-keyed maps, records described with [`impl_record!`], and the
//! free-form [`Value`]. The first failure stops the stream; draining the
//! handlers yields an [`ErrorStack`] with the cause and its path.
//!
//! The write path is symmetric: [`Serialize`] emits the same events from a
//! typed value into any [`EventSink`], such as a [`JsonWriter`].
//!
//! ```
//! use jsonbind::{Bound, ErrorKind, EventSink, impl_record, path, to_string};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: u64,
//!     nickname: String,
//!     tags: Vec<String>,
//! }
//!
//! impl_record! {
//!     User {
//!         id: u64 ["ID", required],
//!         nickname: String [required],
//!         tags: Vec<String>,
//!     }
//! }
//!
//! let mut users: Vec<User> = Vec::new();
//! let mut bound = Bound::new(&mut users);
//! bound.start_array()?;
//! bound.start_object()?;
//! bound.key("nickname", false)?;
//! bound.string("x", false)?;
//! assert!(bound.end_object(1).is_err());
//!
//! let errors = bound.finish().unwrap_err();
//! assert_eq!(errors.kinds(), [ErrorKind::MissingRequiredField, ErrorKind::ArrayElement]);
//! assert_eq!(errors.path(), path![0]);
//! assert_eq!(errors.to_string(), "missing required field \"ID\" at /0");
//!
//! let user = User { id: 7, nickname: "x".into(), tags: vec!["a".into()] };
//! assert_eq!(to_string(&user), r#"{"ID":7,"nickname":"x","tags":["a"]}"#);
//! # Ok::<(), jsonbind::Halt>(())
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod tracing_macros;

mod document;
mod error;
mod event;
mod handler;
mod leaf;
mod map;
mod nullable;
mod options;
mod path_component;
mod record;
mod scope;
mod sequence;
mod serialize;
mod value;
mod writer;

#[cfg(test)]
mod tests;

pub use document::DocumentBuilder;
pub use error::{ErrorKind, ErrorStack, Flow, Halt, ParseError};
pub use event::{Event, EventSink, OwnedEvent, replay};
pub use handler::{Bind, Bound, Handler, from_events, from_value};
pub use hashbrown::DefaultHashBuilder;
pub use leaf::{LeafHandler, Primitive};
pub use map::{MapHandler, Mapping};
pub use nullable::{NullableHandler, OwningRef, OwningRefHandler};
pub use options::WriterOptions;
pub use path_component::{PathComponent, PathComponentFrom};
pub use record::{FieldPolicy, Member, MemberInfo, Record, RecordHandler, serialize_record};
pub use sequence::{Sequence, SequenceHandler};
pub use serialize::{Serialize, to_string, to_string_pretty, to_string_with, to_value};
pub use value::{Array, Map, Number, Value};
pub use writer::JsonWriter;

#[doc(hidden)]
pub use alloc::vec;

#[doc(hidden)]
pub mod __private {
    pub use alloc::{boxed::Box, vec, vec::Vec};
}

/// Macro to build a `Vec<PathComponent>` from a heterogeneous list of keys and
/// indices.
///
/// ```rust
/// extern crate alloc;
/// # use jsonbind::{path, PathComponent};
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     vec![
///         PathComponent::Index(0),
///         PathComponent::Key("foo".into()),
///         PathComponent::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathComponentFrom;
        $crate::vec![$($crate::PathComponent::from_path_component($elem)),*]
    }};
}
