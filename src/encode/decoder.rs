use crate::Value;
use chrono::SecondsFormat;
use serde::de::{
    self,
    value::{MapDeserializer, SeqDeserializer, StringDeserializer},
    IntoDeserializer, Unexpected, Visitor,
};
use serde::forward_to_deserialize_any;
use std::fmt;

type Res<T> = Result<T, DecodeError>;

/// Decoder to pass to [`Deserialize::deserialize`] to decode a [`Value`] into a type.
///
/// `Decoder` _consumes_ the value, moving strings and byte strings out of it. Since the value owns
/// its data, types that borrow from the input (such as `&str`) cannot be decoded.
///
/// Values that have no counterpart in the serde data model are presented as follows:
/// - records as maps of their fields,
/// - document identifiers as their hexadecimal string,
/// - timestamps as RFC 3339 strings.
///
/// [`Value::decode`](crate::Value::decode) can be used for convenience.
///
/// # Examples
/// ```rust
/// # use tyser::*;
/// use tyser::encode::{Decoder, Deserialize};
///
/// let s = String::deserialize(Decoder(Value::from("Hello, world!"))).unwrap();
/// assert_eq!(s, "Hello, world!");
///
/// // borrowed types fail
/// let r = <&str>::deserialize(Decoder(Value::from("Hello, world!")));
/// assert!(r.is_err());
/// ```
///
/// [`Deserialize::deserialize`]: serde::de::Deserialize::deserialize
pub struct Decoder(pub Value);

impl<'de> de::Deserializer<'de> for Decoder {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Res<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(v),
            Value::Int(v) => visitor.visit_i64(v),
            Value::Float(v) => visitor.visit_f64(v),
            Value::Str(v) => visitor.visit_string(v),
            Value::Bytes(v) => visitor.visit_byte_buf(v),
            Value::ObjectId(v) => visitor.visit_string(v.to_string()),
            Value::DateTime(v) => {
                visitor.visit_string(v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(seq) | Value::Tuple(seq) => {
                visitor.visit_seq(SeqDeserializer::new(seq.into_iter()))
            }
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map.into_iter())),
            Value::Record(record) => {
                visitor.visit_map(MapDeserializer::new(record.into_fields().into_iter()))
            }
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            x => visitor.visit_some(Decoder(x)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Res<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(de::Error::invalid_type(Unexpected::Str(&s), &"char")),
                }
            }
            x => Err(de::Error::invalid_type(unexp_err(&x), &"char")),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Res<V::Value> {
        match self.0 {
            Value::Str(variant) => {
                let variant: StringDeserializer<DecodeError> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Map(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((Value::Str(variant), value)) => {
                        visitor.visit_enum(EnumDecoder { variant, value })
                    }
                    Some((k, _)) => Err(de::Error::invalid_type(unexp_err(&k), &"variant name")),
                    None => Err(de::Error::invalid_length(0, &"a single variant entry")),
                }
            }
            x => Err(de::Error::invalid_type(
                unexp_err(&x),
                &"a variant name or a map with a single entry",
            )),
        }
    }
}

impl<'de> IntoDeserializer<'de, DecodeError> for Value {
    type Deserializer = Decoder;

    fn into_deserializer(self) -> Decoder {
        Decoder(self)
    }
}

struct EnumDecoder {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDecoder {
    type Error = DecodeError;
    type Variant = Decoder;

    fn variant_seed<V>(self, seed: V) -> Res<(V::Value, Decoder)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let EnumDecoder { variant, value } = self;
        let variant: StringDeserializer<DecodeError> = variant.into_deserializer();
        seed.deserialize(variant).map(|v| (v, Decoder(value)))
    }
}

impl<'de> de::VariantAccess<'de> for Decoder {
    type Error = DecodeError;

    fn unit_variant(self) -> Res<()> {
        unexp_matching(self.0, &"unit value", |val| match val {
            Value::Null => Ok(Ok(())),
            x => Err(x),
        })
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Res<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Res<V::Value>
    where
        V: Visitor<'de>,
    {
        unexp_matching(self.0, &"tuple variant", |val| match val {
            Value::Tuple(v) | Value::List(v) => Ok(if v.len() == len {
                visitor.visit_seq(SeqDeserializer::new(v.into_iter()))
            } else {
                let msg = format!("a tuple with {} element(s)", len);
                Err(de::Error::invalid_length(v.len(), &msg.as_str()))
            }),
            x => Err(x),
        })
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Res<V::Value>
    where
        V: Visitor<'de>,
    {
        unexp_matching(self.0, &"struct variant", |val| match val {
            Value::Map(map) => Ok(visitor.visit_map(MapDeserializer::new(map.into_iter()))),
            Value::Record(r) => Ok(visitor.visit_map(MapDeserializer::new(
                r.into_fields().into_iter(),
            ))),
            x => Err(x),
        })
    }
}

// ********* HELPERS ***********************************************************

fn unexp_err(val: &Value) -> Unexpected<'_> {
    match val {
        Value::Null => Unexpected::Unit,
        Value::Bool(v) => Unexpected::Bool(*v),
        Value::Int(v) => Unexpected::Signed(*v),
        Value::Float(v) => Unexpected::Float(*v),
        Value::Str(v) => Unexpected::Str(v),
        Value::Bytes(v) => Unexpected::Bytes(v),
        Value::ObjectId(_) => Unexpected::Other("ObjectId"),
        Value::DateTime(_) => Unexpected::Other("datetime"),
        Value::List(_) => Unexpected::Seq,
        Value::Tuple(_) => Unexpected::Other("tuple"),
        Value::Map(_) => Unexpected::Map,
        Value::Record(_) => Unexpected::Other("record"),
    }
}

fn unexp_matching<T, E, F, S>(val: Value, expected: &S, matchfn: F) -> Result<T, E>
where
    F: FnOnce(Value) -> Result<Result<T, E>, Value>,
    E: de::Error,
    S: de::Expected,
{
    match matchfn(val) {
        Ok(x) => x,
        Err(val) => Err(de::Error::invalid_type(unexp_err(&val), expected)),
    }
}

/// Deserialization error when decoding from a [`Value`].
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum DecodeError {
    /// Some `Deserialize` implementor error occurred.
    #[error("custom error: {0}")]
    Message(String),
}

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }
}
