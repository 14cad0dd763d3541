//! The conversion functions handlers are built from.
//!
//! Leaf converters terminate recursion. Container converters take the functions to convert
//! their elements with, which a [`Serializer`](crate::Serializer) handler points back at the
//! serializer itself:
//!
//! ```rust
//! # use tyser::*;
//! # use tyser::convert::*;
//! let ser = Serializer::builder()
//!     .deserializer(Descriptor::INT, |_, target, value| noop_deserialization(target, value))
//!     .deserializer(Descriptor::LIST, |ser, target, value| {
//!         list_deserialization(target, value, |t, v| ser.deserialize(t, v))
//!     })
//!     .build();
//!
//! let d = Descriptor::list_of(Descriptor::INT);
//! assert_eq!(ser.deserialize(&d, &Value::from(vec![1, 2])), Ok(Value::from(vec![1, 2])));
//! assert!(ser.deserialize(&d, &Value::from(vec![1.0])).is_err());
//! ```
mod containers;
mod leaf;
mod record;
mod union;

pub use containers::{
    list_deserialization, list_serialization, map_deserialization, map_serialization,
    tuple_deserialization,
};
pub use leaf::{noop_deserialization, noop_serialization, number_coercion};
pub use record::{record_deserialization, record_serialization};
pub use union::union_deserialization;
