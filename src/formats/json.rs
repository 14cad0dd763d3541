//! The JSON preset.
//!
//! JSON trees are made of maps, lists, strings, integers, floats, booleans, and null. Tuples
//! serialize to lists and records to maps of their fields.
use crate::{convert::*, Descriptor, Serializer};

#[cfg(feature = "json")]
use super::{Codec, CodecSerializer};
#[cfg(feature = "json")]
use crate::{Error, Result, Value};

fn leaves() -> Descriptor {
    Descriptor::one_of(vec![
        Descriptor::STR,
        Descriptor::INT,
        Descriptor::FLOAT,
        Descriptor::BOOL,
        Descriptor::NULL,
    ])
}

/// A serializer between values and JSON trees.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// let ser = formats::json::serializer();
///
/// let d = Descriptor::tuple_of(vec![Descriptor::INT, Descriptor::optional(Descriptor::STR)]);
/// let t = ser.deserialize(&d, &Value::from(vec![Value::Int(1), Value::Null])).unwrap();
/// assert_eq!(t, Value::from((1, ())));
///
/// // tuples serialize as lists
/// assert_eq!(ser.serialize(&t), Ok(Value::from(vec![Value::Int(1), Value::Null])));
/// ```
pub fn serializer() -> Serializer {
    Serializer::builder()
        .serializer(Descriptor::MAP, |ser, v| {
            map_serialization(v, |k| ser.serialize(k), |v| ser.serialize(v))
        })
        .serializer(
            Descriptor::one_of(vec![Descriptor::LIST, Descriptor::TUPLE]),
            |ser, v| list_serialization(v, |x| ser.serialize(x)),
        )
        .serializer(leaves(), |_, v| noop_serialization(v))
        .deserializer(Descriptor::MAP, |ser, t, v| {
            map_deserialization(t, v, |t, k| ser.deserialize(t, k), |t, v| ser.deserialize(t, v))
        })
        .deserializer(Descriptor::LIST, |ser, t, v| {
            list_deserialization(t, v, |t, x| ser.deserialize(t, x))
        })
        .deserializer(Descriptor::TUPLE, |ser, t, v| {
            tuple_deserialization(t, v, |t, x| ser.deserialize(t, x))
        })
        .deserializer(leaves(), |_, t, v| noop_deserialization(t, v))
        .build()
}

/// JSON text, via `serde_json`.
///
/// Requires the _json_ feature.
#[cfg(feature = "json")]
#[derive(Debug, Default, Copy, Clone)]
pub struct JsonText;

#[cfg(feature = "json")]
impl Codec for JsonText {
    type Wire = str;

    fn encode(&self, tree: &Value) -> Result<String> {
        serde_json::to_string(tree).map_err(|e| Error::Codec(e.to_string()))
    }

    fn decode(&self, wire: &str) -> Result<Value> {
        serde_json::from_str(wire).map_err(|e| Error::Codec(e.to_string()))
    }
}

/// The JSON preset chained with [`JsonText`].
///
/// Requires the _json_ feature.
#[cfg(feature = "json")]
pub fn text_serializer() -> CodecSerializer<JsonText> {
    CodecSerializer::new(serializer(), JsonText)
}
