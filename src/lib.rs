//! Type-directed serialization of records to and from generic data trees.
//!
//! `tyser` converts an object graph of [`Record`]s, containers, and leaves into a format agnostic
//! _generic tree_ (nested maps, lists, and leaf [`Value`]s) and back again. What a value decodes
//! into is driven by a [`Descriptor`] of the target type rather than by hand written per type
//! code.
//!
//! The moving parts are:
//! - [`Value`]: the dynamic value model both sides of a conversion are expressed in.
//! - [`Shape`]: the declared field list of a nominal record type, possibly generic.
//! - [`Descriptor`]: identifies a target type; leaves, parameterized generics, tuples, unions,
//! records, and the _any record_ / _any union_ markers.
//! - [`Refinement`]: a registry mapping descriptors to handlers which resolves the _most specific_
//! matching registration, failing loudly when two registrations are equally specific.
//! - [`Serializer`]: the facade owning one registry per direction, with the record and union
//! handlers installed as defaults.
//!
//! # Example
//! ```rust
//! # use tyser::*;
//! let person = Shape::builder("Person")
//!     .field("name", Descriptor::STR)
//!     .field("age", Descriptor::INT)
//!     .finish();
//!
//! let ser = formats::json::serializer();
//!
//! let tree = Value::new_map(vec![
//!     (Value::from("name"), Value::from("Fred")),
//!     (Value::from("age"), Value::from(42)),
//! ]);
//!
//! let fred = ser.deserialize(&Descriptor::record(&person), &tree).unwrap();
//! assert_eq!(fred.record().and_then(|r| r.get("name")), Some(&Value::from("Fred")));
//!
//! // and back again
//! assert_eq!(ser.serialize(&fred), Ok(tree));
//! ```
//!
//! # Features
//! | Feature  | Default | Description |
//! | -------- | ------- | ----------- |
//! | `encode` | yes     | [`serde`] bridge between Rust data structures and [`Value`]. |
//! | `json`   | yes     | JSON text codec backed by `serde_json`. |
//! | `bson`   | no      | BSON binary codec backed by the `bson` crate. |
#![warn(missing_docs)]

use indexmap::IndexMap;

pub mod convert;
pub mod desc;
mod ds;
#[cfg(feature = "encode")]
pub mod encode;
mod error;
pub mod formats;
pub mod refine;
pub mod serializer;
pub mod shape;

pub use desc::{Descriptor, Leaf, Origin};
pub use ds::{ObjectId, ParseObjectIdError, Value};
pub use error::{Error, Result};
pub use refine::Refinement;
pub use serializer::{Serializer, SerializerBuilder};
pub use shape::{Field, Record, Shape};

/// Type alias for an ordered list of values.
pub type List = Vec<Value>;

/// Type alias for a mapping of values. Insertion order is preserved.
pub type Map = IndexMap<Value, Value>;

/// Type alias for the named fields of a record. Insertion order is preserved.
pub type Fields = IndexMap<String, Value>;
