//! The BSON preset.
//!
//! BSON trees add byte strings, document identifiers, and UTC timestamps to the JSON leaves.
//! Documents are maps keyed by strings; keys are kept as they are.
//!
//! BSON readers may hand back a double for an integral field, so integers are read with
//! [`number_coercion`]: an integral float is accepted, a fractional one is rejected.
//!
//! ```rust
//! # use tyser::*;
//! let ser = formats::bson::serializer();
//! assert_eq!(ser.deserialize(&Descriptor::INT, &Value::Float(1.0)), Ok(Value::Int(1)));
//! assert!(ser.deserialize(&Descriptor::INT, &Value::Float(1.5)).is_err());
//! ```
use crate::{convert::*, Descriptor, Serializer};

#[cfg(feature = "bson")]
use super::{Codec, CodecSerializer};
#[cfg(feature = "bson")]
use crate::{Error, Map, ObjectId, Result, Value};
#[cfg(feature = "bson")]
use ::bson::{spec::BinarySubtype, Binary, Bson, Document};
#[cfg(feature = "bson")]
use chrono::{DateTime, Utc};

/// A serializer between values and BSON trees.
pub fn serializer() -> Serializer {
    let noop_leaves = Descriptor::one_of(vec![
        Descriptor::STR,
        Descriptor::INT,
        Descriptor::FLOAT,
        Descriptor::DATETIME,
        Descriptor::BYTES,
        Descriptor::OBJECT_ID,
        Descriptor::BOOL,
        Descriptor::NULL,
    ]);

    let noop_decoded = Descriptor::one_of(vec![
        Descriptor::STR,
        Descriptor::FLOAT,
        Descriptor::DATETIME,
        Descriptor::BYTES,
        Descriptor::OBJECT_ID,
        Descriptor::BOOL,
        Descriptor::NULL,
    ]);

    Serializer::builder()
        .serializer(Descriptor::RECORD, |ser, v| {
            ser.serialize(&record_serialization(v)?)
        })
        .serializer(Descriptor::MAP, |ser, v| {
            map_serialization(v, noop_serialization, |v| ser.serialize(v))
        })
        .serializer(
            Descriptor::one_of(vec![Descriptor::LIST, Descriptor::TUPLE]),
            |ser, v| list_serialization(v, |x| ser.serialize(x)),
        )
        .serializer(noop_leaves, |_, v| noop_serialization(v))
        .deserializer(Descriptor::MAP, |ser, t, v| {
            map_deserialization(t, v, |t, k| ser.deserialize(t, k), |t, v| ser.deserialize(t, v))
        })
        .deserializer(Descriptor::LIST, |ser, t, v| {
            list_deserialization(t, v, |t, x| ser.deserialize(t, x))
        })
        .deserializer(Descriptor::TUPLE, |ser, t, v| {
            tuple_deserialization(t, v, |t, x| ser.deserialize(t, x))
        })
        .deserializer(noop_decoded, |_, t, v| noop_deserialization(t, v))
        .deserializer(Descriptor::INT, |_, t, v| number_coercion(t, v))
        .build()
}

/// Binary BSON documents, via the `bson` crate.
///
/// The top level tree must be a map keyed by strings.
///
/// Requires the _bson_ feature.
#[cfg(feature = "bson")]
#[derive(Debug, Default, Copy, Clone)]
pub struct BsonBytes;

#[cfg(feature = "bson")]
impl Codec for BsonBytes {
    type Wire = [u8];

    fn encode(&self, tree: &Value) -> Result<Vec<u8>> {
        let doc = match to_bson(tree)? {
            Bson::Document(doc) => doc,
            _ => {
                return Err(Error::Codec(format!(
                    "a BSON document must be a map, found {}",
                    tree.type_name()
                )))
            }
        };

        let mut buf = Vec::new();
        doc.to_writer(&mut buf).map_err(codec_err)?;
        Ok(buf)
    }

    fn decode(&self, wire: &[u8]) -> Result<Value> {
        let doc = Document::from_reader(wire).map_err(codec_err)?;
        from_bson(Bson::Document(doc))
    }
}

/// The BSON preset chained with [`BsonBytes`].
///
/// Requires the _bson_ feature.
#[cfg(feature = "bson")]
pub fn binary_serializer() -> CodecSerializer<BsonBytes> {
    CodecSerializer::new(serializer(), BsonBytes)
}

#[cfg(feature = "bson")]
fn codec_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Codec(e.to_string())
}

#[cfg(feature = "bson")]
fn to_bson(value: &Value) -> Result<Bson> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(x) => Bson::Boolean(*x),
        Value::Int(x) => match i32::try_from(*x) {
            Ok(x) => Bson::Int32(x),
            Err(_) => Bson::Int64(*x),
        },
        Value::Float(x) => Bson::Double(*x),
        Value::Str(x) => Bson::String(x.clone()),
        Value::Bytes(x) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: x.clone(),
        }),
        Value::ObjectId(x) => Bson::ObjectId(::bson::oid::ObjectId::from_bytes(x.bytes())),
        Value::DateTime(x) => Bson::DateTime(::bson::DateTime::from_millis(x.timestamp_millis())),
        Value::List(xs) | Value::Tuple(xs) => {
            Bson::Array(xs.iter().map(to_bson).collect::<Result<_>>()?)
        }
        Value::Map(map) => {
            let mut doc = Document::new();
            for (k, v) in map {
                let k = k.str().ok_or_else(|| {
                    Error::Codec(format!("BSON document keys must be strings, found {}", k))
                })?;
                doc.insert(k, to_bson(v)?);
            }
            Bson::Document(doc)
        }
        Value::Record(r) => {
            return Err(Error::Codec(format!(
                "{} must be serialized to a tree before encoding",
                r.shape().name()
            )))
        }
    })
}

#[cfg(feature = "bson")]
fn from_bson(bson: Bson) -> Result<Value> {
    Ok(match bson {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(x) => Value::Bool(x),
        Bson::Int32(x) => Value::Int(i64::from(x)),
        Bson::Int64(x) => Value::Int(x),
        Bson::Double(x) => Value::Float(x),
        Bson::String(x) => Value::Str(x),
        Bson::Binary(x) => Value::Bytes(x.bytes),
        Bson::ObjectId(x) => Value::ObjectId(ObjectId::from_bytes(x.bytes())),
        Bson::DateTime(x) => {
            let ms = x.timestamp_millis();
            let dt = DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| Error::Codec(format!("timestamp {}ms is out of range", ms)))?;
            Value::DateTime(dt)
        }
        Bson::Array(xs) => Value::List(xs.into_iter().map(from_bson).collect::<Result<_>>()?),
        Bson::Document(doc) => {
            let mut map = Map::with_capacity(doc.len());
            for (k, v) in doc {
                map.insert(Value::Str(k), from_bson(v)?);
            }
            Value::Map(map)
        }
        other => {
            return Err(Error::Codec(format!(
                "unsupported BSON element type {:?}",
                other.element_type()
            )))
        }
    })
}
