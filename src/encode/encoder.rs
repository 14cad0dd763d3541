use crate::{List, Map, Value};
use serde::{ser, Serialize};
use std::fmt;

type Res = Result<Value, EncodeError>;

/// Encoder to pass to [`Serialize::serialize`] to encode a type into a [`Value`].
///
/// There is no data associated with the `Encoder`, instead it is used to implement `serde`'s
/// `Serializer` trait.
/// ```rust
/// # use tyser::*;
/// use tyser::encode::{Encoder, Serialize};
///
/// let data = ("Hello!", 3.14);
/// let expected = Value::new_tuple(vec![Value::from("Hello!"), Value::Float(3.14)]);
///
/// assert_eq!(data.serialize(Encoder), Ok(expected));
/// ```
///
/// Integers are stored as `i64`; wider values fail to encode.
/// ```rust
/// # use tyser::*;
/// assert!(Value::enc(&u64::MAX).is_err());
/// ```
pub struct Encoder;

impl ser::Serializer for Encoder {
    type Ok = Value;
    type Error = EncodeError;
    type SerializeSeq = SeqLike;
    type SerializeTuple = TupleLike;
    type SerializeTupleStruct = TupleLike;
    type SerializeTupleVariant = TupleLike;
    type SerializeMap = MapLike;
    type SerializeStruct = StructLike;
    type SerializeStructVariant = StructLike;

    fn serialize_bool(self, v: bool) -> Res {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Res {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Res {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| EncodeError::IntegerOverflow(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Res {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| EncodeError::IntegerOverflow(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Res {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| EncodeError::IntegerOverflow(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Res {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Res {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Res {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, v: &T) -> Res {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, variant: &'static str) -> Res {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _: &'static str, value: &T) -> Res {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Res {
        Ok(tagged(Some(variant), value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqLike, EncodeError> {
        Ok(SeqLike {
            items: List::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<TupleLike, EncodeError> {
        Ok(TupleLike {
            variant: None,
            items: List::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(self, _: &'static str, len: usize) -> Result<TupleLike, EncodeError> {
        self.serialize_tuple(len)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleLike, EncodeError> {
        Ok(TupleLike {
            variant: Some(variant),
            items: List::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapLike, EncodeError> {
        Ok(MapLike {
            key: None,
            map: Map::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_struct(self, _: &'static str, len: usize) -> Result<StructLike, EncodeError> {
        Ok(StructLike {
            variant: None,
            map: Map::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructLike, EncodeError> {
        Ok(StructLike {
            variant: Some(variant),
            map: Map::with_capacity(len),
        })
    }

    fn collect_str<T: ?Sized + fmt::Display>(self, value: &T) -> Res {
        Ok(Value::Str(value.to_string()))
    }
}

/// Serialization error when encoding into a [`Value`].
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum EncodeError {
    /// A `Serialize` implementor called `serialize_value` before `serialize_key`.
    #[error("no key was available when trying to serialize map value")]
    NoKeyAvailable,
    /// The integer does not fit in 64 signed bits.
    #[error("integer {0} does not fit in 64 bits")]
    IntegerOverflow(String),
    /// Some `Serialize` implementor error occurred.
    #[error("custom error: {0}")]
    Message(String),
}

impl ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Message(msg.to_string())
    }
}

/// Wrap `value` in a single entry map keyed by the variant name, if there is one.
fn tagged(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(variant) => Value::new_str_map(vec![(variant, value)]),
        None => value,
    }
}

pub struct SeqLike {
    items: List,
}

impl ser::SerializeSeq for SeqLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::List(self.items))
    }
}

pub struct TupleLike {
    variant: Option<&'static str>,
    items: List,
}

impl ser::SerializeTuple for TupleLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(tagged(self.variant, Value::Tuple(self.items)))
    }
}

impl ser::SerializeTupleStruct for TupleLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeTuple::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeTuple::end(self)
    }
}

impl ser::SerializeTupleVariant for TupleLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeTuple::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeTuple::end(self)
    }
}

pub struct MapLike {
    key: Option<Value>,
    map: Map,
}

impl ser::SerializeMap for MapLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.key = Some(key.serialize(Encoder)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self.key.take().ok_or(EncodeError::NoKeyAvailable)?;
        self.map.insert(key, value.serialize(Encoder)?);
        Ok(())
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), EncodeError>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        self.map
            .insert(key.serialize(Encoder)?, value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Map(self.map))
    }
}

pub struct StructLike {
    variant: Option<&'static str>,
    map: Map,
}

impl ser::SerializeStruct for StructLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.map.insert(Value::from(key), value.serialize(Encoder)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(tagged(self.variant, Value::Map(self.map)))
    }
}

impl ser::SerializeStructVariant for StructLike {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Res {
        ser::SerializeStruct::end(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_derive::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: Option<f64>,
    }

    #[derive(Serialize)]
    struct Meters(f32);

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(u8),
        Line(i8, i8),
        Rect { w: u16, h: u16 },
    }

    #[test]
    fn structs_are_maps() {
        let p = Point { x: 1, y: None };
        let expected = Value::new_str_map(vec![("x", Value::Int(1)), ("y", Value::Null)]);
        assert_eq!(Value::enc(&p), Ok(expected));

        let p = Point { x: -2, y: Some(0.5) };
        let expected = Value::new_str_map(vec![("x", Value::Int(-2)), ("y", Value::Float(0.5))]);
        assert_eq!(Value::enc(&p), Ok(expected));
    }

    #[test]
    fn newtypes_are_transparent() {
        assert_eq!(Value::enc(&Meters(1.5)), Ok(Value::Float(1.5)));
    }

    #[test]
    fn variants() {
        assert_eq!(Value::enc(&Shape::Empty), Ok(Value::from("Empty")));
        assert_eq!(
            Value::enc(&Shape::Circle(3)),
            Ok(Value::new_str_map(vec![("Circle", Value::Int(3))]))
        );
        assert_eq!(
            Value::enc(&Shape::Line(1, -1)),
            Ok(Value::new_str_map(vec![(
                "Line",
                Value::new_tuple(vec![Value::Int(1), Value::Int(-1)])
            )]))
        );
        assert_eq!(
            Value::enc(&Shape::Rect { w: 2, h: 3 }),
            Ok(Value::new_str_map(vec![(
                "Rect",
                Value::new_str_map(vec![("w", Value::Int(2)), ("h", Value::Int(3))])
            )]))
        );
    }

    #[test]
    fn collections() {
        assert_eq!(
            Value::enc(&vec![1u8, 2]),
            Ok(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );

        let mut map = BTreeMap::new();
        map.insert(1, "a");
        assert_eq!(
            Value::enc(&map),
            Ok(Value::new_map(vec![(Value::Int(1), Value::from("a"))]))
        );

        assert_eq!(Value::enc(&()), Ok(Value::Null));
        assert_eq!(Value::enc(&'c'), Ok(Value::from("c")));
    }

    #[test]
    fn integer_overflow() {
        assert_eq!(Value::enc(&(i64::MAX as u64)), Ok(Value::Int(i64::MAX)));
        assert_eq!(
            Value::enc(&u64::MAX),
            Err(EncodeError::IntegerOverflow(u64::MAX.to_string()))
        );
        assert_eq!(
            Value::enc(&i128::MIN).map_err(|e| e.to_string()),
            Err(format!("integer {} does not fit in 64 bits", i128::MIN))
        );
    }

    #[test]
    fn value_without_key() {
        use ser::{SerializeMap, Serializer};
        let mut map = Encoder.serialize_map(None).unwrap();
        assert_eq!(map.serialize_value(&1), Err(EncodeError::NoKeyAvailable));
    }
}
