//! [`Encoder`] and [`Decoder`] for converting between Rust data structures and [`Value`]s.
//!
//! Requires the _encode_ feature.
//!
//! Any type that implements [`Serialize`] can be _encoded_ into a generic tree, and any type that
//! implements [`Deserialize`] can be _decoded_ back out of one. This is how plain Rust structs meet
//! the records a [`Serializer`](crate::Serializer) produces: records present themselves to the
//! [`Decoder`] as maps of their fields.
//!
//! The mapping follows the shape of the serde data model:
//!
//! | serde         | Value                          |
//! | ------------- | ------------------------------ |
//! | struct, map   | `Map`                          |
//! | tuple         | `Tuple`                        |
//! | seq           | `List`                         |
//! | `None`, unit  | `Null`                         |
//! | newtype       | the inner value                |
//! | unit variant  | `Str` of the variant name      |
//! | other variant | `Map` with a single entry      |
//!
//! [`Value`] itself implements [`Serialize`] and [`Deserialize`], which is what the JSON text codec
//! builds on.
//!
//! # Examples
//! Encoding can be done for any type that implements [`Serialize`].
//!
//! ```rust
//! # use tyser::*;
//! let data = (100, "Hello, world!", 3.14);
//!
//! let expected = Value::new_tuple(vec![
//!     Value::Int(100),
//!     Value::from("Hello, world!"),
//!     Value::Float(3.14),
//! ]);
//!
//! assert_eq!(Value::enc(&data), Ok(expected));
//! ```
//!
//! Decoding can be done for any type that implements [`Deserialize`].
//! ```rust
//! # use tyser::*;
//! let value = Value::new_tuple(vec![
//!     Value::Int(100),
//!     Value::from("Hello, world!"),
//!     Value::Float(3.14),
//! ]);
//!
//! let r = value.decode::<(u32, String, f32)>();
//! assert_eq!(r, Ok((100, "Hello, world!".to_string(), 3.14)));
//! ```
use crate::Value;

mod decoder;
mod encoder;
mod value;

pub use self::decoder::{DecodeError, Decoder};
pub use self::encoder::{EncodeError, Encoder};
pub use serde::{de::DeserializeOwned, Deserialize, Serialize};

impl Value {
    /// Encode `T` into a generic tree.
    ///
    /// Requires the _encode_ feature.
    ///
    /// Convenience function for `data.serialize(Encoder)`.
    pub fn enc<T: ?Sized + Serialize>(data: &T) -> Result<Self, EncodeError> {
        data.serialize(Encoder)
    }

    /// Attempt to decode a generic tree into type `T`.
    ///
    /// Requires the _encode_ feature.
    ///
    /// Convenience function for `<T as Deserialize>::deserialize(Decoder(self))`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        T::deserialize(Decoder(self))
    }
}
